use massmail_core::{
    Cluster, ClusterId, Dataset, DropOutcome, DropTarget, Email, EmailId, Embedding, apply_drop,
    create_singleton_cluster, move_email_to_cluster, reposition_email,
};

fn dataset() -> Dataset {
    Dataset::new(
        Vec::new(),
        vec![Cluster::new(1, "one"), Cluster::new(2, "two")],
        vec![
            Email::new("a", ClusterId::Int(1), Embedding::new(0.0, 0.0)),
            Email::new("b", ClusterId::Int(1), Embedding::new(1.0, 1.0)),
            Email::new("c", ClusterId::Int(2), Embedding::new(5.0, 5.0)),
        ],
    )
}

#[test]
fn move_reassigns_without_touching_the_input() {
    let before = dataset();
    let after = move_email_to_cluster(&before, EmailId::new(0), &ClusterId::Int(2)).unwrap();

    assert_eq!(before.member_count(&ClusterId::Int(2)), 1);
    assert_eq!(after.member_count(&ClusterId::Int(2)), 2);
    assert_eq!(after.member_count(&ClusterId::Int(1)), 1);
    assert_ne!(before.revision(), after.revision());
}

#[test]
fn move_into_current_cluster_keeps_membership() {
    let before = dataset();
    let after = move_email_to_cluster(&before, EmailId::new(2), &ClusterId::Int(2)).unwrap();
    assert_eq!(after.member_count(&ClusterId::Int(2)), 1);
}

#[test]
fn move_rejects_unknown_targets() {
    let before = dataset();
    assert!(move_email_to_cluster(&before, EmailId::new(0), &ClusterId::Int(9)).is_err());
    assert!(move_email_to_cluster(&before, EmailId::new(9), &ClusterId::Int(1)).is_err());
}

#[test]
fn singleton_cluster_is_appended_with_prior_label() {
    let before = dataset();
    let (after, created) = create_singleton_cluster(&before, EmailId::new(1)).unwrap();

    assert_eq!(after.cluster_count(), 3);
    assert_eq!(after.cluster_position(&created), Some(2));
    assert_eq!(after.cluster(&created).unwrap().label, "one");
    assert_eq!(after.email(EmailId::new(1)).unwrap().cluster_id, created);
    assert!(before.cluster(&created).is_none());
}

#[test]
fn dropping_one_of_two_members_on_empty_space_splits() {
    let before = dataset();
    let (after, outcome) = apply_drop(&before, EmailId::new(0), &DropTarget::EmptySpace).unwrap();

    let DropOutcome::Split { from, created } = outcome else {
        panic!("expected a split, got {outcome:?}");
    };
    assert_eq!(from, ClusterId::Int(1));
    assert!(before.cluster(&created).is_none());
    assert_eq!(after.member_count(&created), 1);
    assert_eq!(after.member_count(&ClusterId::Int(1)), 1);
}

#[test]
fn dropping_the_sole_member_on_empty_space_is_a_no_op() {
    let before = dataset();
    let (after, outcome) = apply_drop(&before, EmailId::new(2), &DropTarget::EmptySpace).unwrap();

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(after.cluster_count(), 2);
    assert_eq!(after.member_count(&ClusterId::Int(2)), 1);
}

#[test]
fn dropping_on_a_cluster_moves() {
    let before = dataset();
    let (after, outcome) = apply_drop(
        &before,
        EmailId::new(2),
        &DropTarget::Cluster(ClusterId::Int(1)),
    )
    .unwrap();

    assert_eq!(
        outcome,
        DropOutcome::Moved {
            from: ClusterId::Int(2),
            to: ClusterId::Int(1),
        }
    );
    assert_eq!(after.member_count(&ClusterId::Int(1)), 3);
    // Emptied clusters stay in the sequence; they just have no members.
    assert_eq!(after.cluster_count(), 2);
}

#[test]
fn reposition_overwrites_embedding() {
    let before = dataset();
    let after = reposition_email(&before, EmailId::new(0), Embedding::new(7.0, -3.0)).unwrap();
    assert_eq!(
        after.email(EmailId::new(0)).unwrap().embedding,
        Some(Embedding::new(7.0, -3.0))
    );
    assert_eq!(
        before.email(EmailId::new(0)).unwrap().embedding,
        Some(Embedding::new(0.0, 0.0))
    );
}
