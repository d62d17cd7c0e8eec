use massmail_core::geom::{Point, point};
use massmail_layout::hull::{rounded_hull, rounded_hull_contains};
use massmail_layout::vector::{signed_area2, unit_normal};
use massmail_layout::{PathCommand, convex_hull};

const EPS: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn dist(a: Point, b: Point) -> f64 {
    (a - b).length()
}

fn square() -> Vec<Point> {
    vec![
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0, 100.0),
        point(0.0, 100.0),
    ]
}

#[test]
fn empty_input_gives_empty_path() {
    let path = rounded_hull(&[], 10.0);
    assert!(path.is_empty());
    assert_eq!(path.to_svg_path_data(), "");
}

#[test]
fn single_point_gives_a_circle() {
    let path = rounded_hull(&[point(1.0, 2.0)], 10.0);
    assert_eq!(
        path.to_svg_path_data(),
        "M 1,-8 A 10,10,0,0,0,1,12 A 10,10,0,0,0,1,-8"
    );
    assert_eq!(path.start(), path.end());
}

#[test]
fn two_points_give_a_capsule() {
    let a = point(0.0, 0.0);
    let b = point(30.0, 40.0);
    let path = rounded_hull(&[a, b], 5.0);
    let cmds = path.commands();
    assert_eq!(cmds.len(), 5);

    let PathCommand::MoveTo(p0) = cmds[0] else {
        panic!("expected MoveTo, got {:?}", cmds[0]);
    };
    let PathCommand::LineTo(p1) = cmds[1] else {
        panic!("expected LineTo, got {:?}", cmds[1]);
    };
    let PathCommand::LineTo(p3) = cmds[3] else {
        panic!("expected LineTo, got {:?}", cmds[3]);
    };
    let p2 = cmds[2].end();

    // Both straight sides are parallel to a->b, `padding` away from it.
    let dir = b - a;
    assert!(close((p1 - p0).cross(dir), 0.0));
    assert!(close((p3 - p2).cross(dir), 0.0));
    assert!(close(dist(p0, a), 5.0));
    assert!(close(dist(p1, b), 5.0));
    assert!(close(dist(p2, b), 5.0));
    assert!(close(dist(p3, a), 5.0));
    assert_eq!(path.end(), Some(p0));
}

#[test]
fn coincident_pair_degrades_to_a_circle() {
    let p = point(4.0, 4.0);
    assert_eq!(rounded_hull(&[p, p], 3.0), rounded_hull(&[p], 3.0));
}

#[test]
fn polygon_outline_is_closed_and_arcs_are_centered_on_vertices() {
    let hull = convex_hull(&square());
    let padding = 10.0;
    let path = rounded_hull(&hull, padding);
    let cmds = path.commands();

    assert_eq!(cmds.len(), 1 + 2 * hull.len());
    assert_eq!(path.start(), path.end());

    let mut arcs = 0;
    for (i, cmd) in cmds.iter().enumerate() {
        let PathCommand::Arc { radius, to } = *cmd else {
            continue;
        };
        arcs += 1;
        assert_eq!(radius, padding);
        let from = cmds[i - 1].end();
        let center = hull
            .iter()
            .copied()
            .find(|v| close(dist(*v, from), padding))
            .expect("arc starts one padding away from a vertex");
        assert!(close(dist(center, to), padding));
    }
    assert_eq!(arcs, hull.len());
}

#[test]
fn polygon_outline_bulges_outwards() {
    let hull = convex_hull(&square());
    let centroid = point(50.0, 50.0);
    let path = rounded_hull(&hull, 10.0);

    // Every straight side sits 10 units outside the square.
    for cmd in path.commands() {
        if let PathCommand::LineTo(p) = *cmd {
            let outside = p.x <= -10.0 + EPS
                || p.x >= 110.0 - EPS
                || p.y <= -10.0 + EPS
                || p.y >= 110.0 - EPS;
            assert!(outside, "{p:?} is not outside the padded square");
            assert!(dist(p, centroid) > 50.0);
        }
    }
}

#[test]
fn either_winding_rounds_outwards() {
    let mut clockwise = convex_hull(&square());
    clockwise.reverse();
    assert!(signed_area2(&clockwise) > 0.0);

    let a = rounded_hull(&clockwise, 10.0);
    let b = rounded_hull(&convex_hull(&square()), 10.0);
    for path in [a, b] {
        for cmd in path.commands() {
            if let PathCommand::LineTo(p) = *cmd {
                assert!(dist(p, point(50.0, 50.0)) > 50.0);
            }
        }
    }
}

#[test]
fn convex_hull_drops_interior_duplicate_and_collinear_points() {
    let mut pts = square();
    pts.push(point(50.0, 50.0));
    pts.push(point(50.0, 0.0));
    pts.push(point(100.0, 100.0));
    let hull = convex_hull(&pts);

    assert_eq!(hull.len(), 4);
    for corner in square() {
        assert!(hull.contains(&corner));
    }
    // On-screen counter-clockwise.
    assert!(signed_area2(&hull) < 0.0);
}

#[test]
fn convex_hull_of_collinear_points_is_a_segment() {
    let hull = convex_hull(&[point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)]);
    assert_eq!(hull.len(), 2);
}

#[test]
fn convex_hull_keeps_small_inputs() {
    assert!(convex_hull(&[]).is_empty());
    assert_eq!(convex_hull(&[point(1.0, 1.0), point(1.0, 1.0)]).len(), 1);
}

#[test]
fn unit_normal_rejects_zero_length_segments() {
    assert!(unit_normal(point(1.0, 1.0), point(1.0, 1.0)).is_none());
    let n = unit_normal(point(0.0, 0.0), point(2.0, 0.0)).unwrap();
    assert!(close(n.x, 0.0) && close(n.y, 1.0));
}

#[test]
fn containment_follows_the_padded_outline() {
    let hull = convex_hull(&square());
    assert!(rounded_hull_contains(&hull, 10.0, point(50.0, 50.0)));
    assert!(rounded_hull_contains(&hull, 10.0, point(-9.0, 50.0)));
    assert!(!rounded_hull_contains(&hull, 10.0, point(-11.0, 50.0)));
    // Corners are rounded.
    assert!(!rounded_hull_contains(&hull, 10.0, point(-9.0, -9.0)));
    assert!(rounded_hull_contains(&[point(0.0, 0.0)], 5.0, point(3.0, 4.0)));
}

#[test]
fn path_numbers_use_three_decimals() {
    let path = rounded_hull(&[point(1.0 / 3.0, -2.0 / 3.0)], 1.0);
    assert_eq!(
        path.to_svg_path_data(),
        "M 0.333,-1.667 A 1,1,0,0,0,0.333,0.333 A 1,1,0,0,0,0.333,-1.667"
    );
}
