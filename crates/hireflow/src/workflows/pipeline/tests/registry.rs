use super::common::*;
use crate::workflows::pipeline::domain::{CandidateId, Stage, StageId};
use crate::workflows::pipeline::registry::{RegistryError, StageRegistry};

#[test]
fn standard_board_has_six_ordered_stages() {
    let registry = StageRegistry::standard();
    let order: Vec<&str> = registry
        .stages()
        .iter()
        .map(|stage| stage.id.as_str())
        .collect();

    assert_eq!(
        order,
        vec!["applied", "screening", "interview", "offer", "hired", "rejected"]
    );
    assert_eq!(registry.candidate_count(), 0);
}

#[test]
fn admit_rejects_unknown_stage() {
    let mut registry = StageRegistry::standard();

    let err = registry
        .admit(candidate("x", "Lisa Wang", "archived"))
        .expect_err("unknown stage rejected");

    assert_eq!(err, RegistryError::UnknownStage(StageId::new("archived")));
    assert_eq!(registry.candidate_count(), 0);
}

#[test]
fn admit_rejects_duplicates_across_stages() {
    let mut registry = small_registry();

    let err = registry
        .admit(candidate("a", "Sarah Johnson", StageId::OFFER))
        .expect_err("duplicate rejected");

    assert_eq!(
        err,
        RegistryError::DuplicateCandidate(CandidateId("a".to_string()))
    );
    assert!(stage(&registry, StageId::OFFER).candidates.is_empty());
}

#[test]
fn stage_of_finds_the_owning_stage() {
    let registry = small_registry();

    let owner = registry
        .stage_of(&CandidateId("c".to_string()))
        .expect("c is on the board");

    assert_eq!(owner.id.as_str(), StageId::INTERVIEW);
    assert!(registry
        .stage_of(&CandidateId("missing".to_string()))
        .is_none());
}

#[test]
fn summary_counts_each_stage() {
    let registry = small_registry();
    let counts: Vec<(String, usize)> = registry
        .summary()
        .into_iter()
        .map(|entry| (entry.id.0, entry.count))
        .collect();

    assert_eq!(counts[0], ("applied".to_string(), 2));
    assert_eq!(counts[2], ("interview".to_string(), 1));
    assert_eq!(counts.iter().map(|(_, count)| count).sum::<usize>(), 3);
}

#[test]
fn from_stages_validates_membership() {
    let mut applied = Stage::new(StageId::APPLIED, "Applied", "blue");
    applied
        .candidates
        .push(candidate("a", "Sarah Johnson", StageId::SCREENING));
    let err = StageRegistry::from_stages(vec![applied]).expect_err("mismatch rejected");
    assert!(matches!(err, RegistryError::StatusMismatch { .. }));

    let duplicate_stage = vec![
        Stage::new(StageId::APPLIED, "Applied", "blue"),
        Stage::new(StageId::APPLIED, "Applied again", "blue"),
    ];
    assert_eq!(
        StageRegistry::from_stages(duplicate_stage).expect_err("duplicate stage"),
        RegistryError::DuplicateStage(StageId::new(StageId::APPLIED))
    );

    let mut applied = Stage::new(StageId::APPLIED, "Applied", "blue");
    applied
        .candidates
        .push(candidate("a", "Sarah Johnson", StageId::APPLIED));
    let mut offer = Stage::new(StageId::OFFER, "Offer", "green");
    offer
        .candidates
        .push(candidate("a", "Sarah Johnson", StageId::OFFER));
    assert_eq!(
        StageRegistry::from_stages(vec![applied, offer]).expect_err("duplicate candidate"),
        RegistryError::DuplicateCandidate(CandidateId("a".to_string()))
    );
}
