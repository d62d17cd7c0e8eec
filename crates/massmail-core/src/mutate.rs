//! Cluster membership edits. Every operation leaves its input untouched and returns a new
//! dataset value with a fresh revision.

use crate::error::{Error, Result};
use crate::model::{Cluster, ClusterId, Dataset, EmailId, Embedding, Revision};

/// Where a dragged email was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Inside the rendered outline of a cluster.
    Cluster(ClusterId),
    EmptySpace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { from: ClusterId, to: ClusterId },
    Split { from: ClusterId, created: ClusterId },
    /// The email was the sole member of its cluster; splitting it off is refused.
    Unchanged,
}

fn derive(dataset: &Dataset) -> Dataset {
    let mut next = dataset.clone();
    next.revision = Revision::next();
    next
}

pub fn move_email_to_cluster(
    dataset: &Dataset,
    email: EmailId,
    target: &ClusterId,
) -> Result<Dataset> {
    dataset.email(email)?;
    if dataset.cluster(target).is_none() {
        return Err(Error::UnknownCluster { id: target.clone() });
    }
    let mut next = derive(dataset);
    next.emails[email.index()].cluster_id = target.clone();
    tracing::debug!(%email, cluster = %target, "email moved");
    Ok(next)
}

/// Moves `email` into a new cluster appended to the cluster sequence. The new cluster carries
/// the label of the email's previous cluster (empty if that cluster is unknown).
///
/// Returns the new dataset and the id of the created cluster.
pub fn create_singleton_cluster(dataset: &Dataset, email: EmailId) -> Result<(Dataset, ClusterId)> {
    let current = dataset.email(email)?;
    let label = dataset
        .cluster(&current.cluster_id)
        .map(|c| c.label.clone())
        .unwrap_or_default();

    let mut id = ClusterId::fresh();
    while dataset.cluster(&id).is_some() {
        id = ClusterId::fresh();
    }

    let mut next = derive(dataset);
    next.clusters.insert(id.clone(), Cluster::new(id.clone(), label));
    next.emails[email.index()].cluster_id = id.clone();
    tracing::debug!(%email, cluster = %id, "singleton cluster created");
    Ok((next, id))
}

/// Overwrites the email's embedding (drag edit in ORIGINAL mode).
pub fn reposition_email(dataset: &Dataset, email: EmailId, to: Embedding) -> Result<Dataset> {
    dataset.email(email)?;
    let mut next = derive(dataset);
    next.emails[email.index()].embedding = Some(to);
    Ok(next)
}

/// Overwrites several embeddings at once (used by layout relaxation).
pub fn reposition_emails(
    dataset: &Dataset,
    updates: impl IntoIterator<Item = (EmailId, Embedding)>,
) -> Result<Dataset> {
    let mut next = derive(dataset);
    for (email, to) in updates {
        let Some(slot) = next.emails.get_mut(email.index()) else {
            return Err(Error::unknown_email(email));
        };
        slot.embedding = Some(to);
    }
    Ok(next)
}

/// Applies the drag-and-drop membership rule.
///
/// Dropping on a cluster moves the email there. Dropping on empty space splits the email into
/// a singleton cluster, unless it is the only member of its current cluster, in which case the
/// dataset is returned unchanged.
pub fn apply_drop(
    dataset: &Dataset,
    email: EmailId,
    target: &DropTarget,
) -> Result<(Dataset, DropOutcome)> {
    let from = dataset.email(email)?.cluster_id.clone();
    match target {
        DropTarget::Cluster(to) => {
            let next = move_email_to_cluster(dataset, email, to)?;
            Ok((
                next,
                DropOutcome::Moved {
                    from,
                    to: to.clone(),
                },
            ))
        }
        DropTarget::EmptySpace => {
            if dataset.member_count(&from) > 1 {
                let (next, created) = create_singleton_cluster(dataset, email)?;
                Ok((next, DropOutcome::Split { from, created }))
            } else {
                Ok((dataset.clone(), DropOutcome::Unchanged))
            }
        }
    }
}
