use massmail_core::geom::{Point, Vector};
use massmail_core::{DropTarget, EmailId};

/// One pointer drag: start, any number of moves, end. Moves only stage a position; nothing is
/// committed to the dataset until the drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    email: EmailId,
    origin: Point,
    current: Point,
}

impl DragSession {
    pub fn begin(email: EmailId, at: Point) -> Self {
        Self {
            email,
            origin: at,
            current: at,
        }
    }

    pub fn update(&mut self, to: Point) {
        self.current = to;
    }

    pub fn email(&self) -> EmailId {
        self.email
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn displacement(&self) -> Vector {
        self.current - self.origin
    }

    pub fn finish(self, target: DropTarget) -> DragEnd {
        DragEnd {
            email: self.email,
            release: self.current,
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub email: EmailId,
    pub release: Point,
    pub target: DropTarget,
}
