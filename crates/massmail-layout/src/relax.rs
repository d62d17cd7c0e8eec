//! Damped force relaxation of embeddings: members are pulled toward their cluster centroid and
//! every pair of emails pushes apart.

use crate::error::Result;
use massmail_core::{ClusterId, Dataset, EmailId, Embedding, reposition_emails};
use nalgebra::Vector2;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxOptions {
    pub iterations: usize,
    pub dt: f64,
    pub damping: f64,
    pub attraction: f64,
    pub repulsion: f64,
    pub max_speed: f64,
}

impl Default for RelaxOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            dt: 0.1,
            damping: 1.0,
            attraction: 1.0,
            repulsion: 0.1,
            max_speed: 10.0,
        }
    }
}

struct Sim {
    pos: Vec<Vector2<f64>>,
    vel: Vec<Vector2<f64>>,
    groups: Vec<Vec<usize>>,
}

impl Sim {
    fn step(&mut self, opts: &RelaxOptions) {
        let n = self.pos.len();
        let mut acc: Vec<Vector2<f64>> = vec![Vector2::zeros(); n];

        for group in &self.groups {
            let sum = group
                .iter()
                .fold(Vector2::<f64>::zeros(), |a, &i| a + self.pos[i]);
            let centroid = sum / group.len() as f64;
            for &i in group {
                let d = centroid - self.pos[i];
                let norm = d.norm();
                if norm > 0.0 {
                    acc[i] += d * (opts.attraction / norm);
                }
            }
        }

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let r = self.pos[j] - self.pos[i];
                let d2 = r.norm_squared();
                if d2 > 0.0 {
                    acc[i] -= r * (opts.repulsion / d2);
                }
            }
        }

        for i in 0..n {
            acc[i] -= self.vel[i] * opts.damping;

            let speed = self.vel[i].norm();
            if speed > opts.max_speed {
                self.vel[i] *= opts.max_speed / speed;
            }

            self.vel[i] += acc[i] * opts.dt;
            let step = self.vel[i] * opts.dt;
            self.pos[i] += step;
        }
    }
}

/// Runs the simulation over every email with an embedding and returns the relaxed dataset.
/// Deterministic: the same input always yields the same output.
pub fn relax(dataset: &Dataset, opts: &RelaxOptions) -> Result<Dataset> {
    let mut ids: Vec<EmailId> = Vec::new();
    let mut pos: Vec<Vector2<f64>> = Vec::new();
    let mut group_of: FxHashMap<ClusterId, usize> = FxHashMap::default();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (id, email) in dataset.email_ids().zip(dataset.emails()) {
        let Some(e) = email.embedding else {
            continue;
        };
        let idx = pos.len();
        ids.push(id);
        pos.push(Vector2::new(e.x, e.y));
        let g = *group_of.entry(email.cluster_id.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(idx);
    }

    let mut sim = Sim {
        vel: vec![Vector2::zeros(); pos.len()],
        pos,
        groups,
    };
    for _ in 0..opts.iterations {
        sim.step(opts);
    }
    tracing::debug!(
        emails = ids.len(),
        iterations = opts.iterations,
        "relaxation finished"
    );

    let updates = ids
        .into_iter()
        .zip(sim.pos)
        .map(|(id, p)| (id, Embedding::new(p.x, p.y)));
    Ok(reposition_emails(dataset, updates)?)
}
