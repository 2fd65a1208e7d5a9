//! Candidate pipeline: stage registry, transition reducer, and the write-behind
//! board that keeps the remote document store in step with drag-and-drop moves.

pub mod board;
pub mod domain;
pub mod persistence;
pub mod registry;
pub mod router;
pub mod transition;

#[cfg(test)]
mod tests;

pub use board::PipelineBoard;
pub use domain::{Candidate, CandidateId, Stage, StageId, StageSummary};
pub use persistence::{PersistCommand, PersistenceQueue};
pub use registry::{RegistryError, StageRegistry};
pub use router::{pipeline_router, BoardView};
pub use transition::{apply_move, resolve_destination, MoveRequest, NoopReason, TransitionOutcome};
