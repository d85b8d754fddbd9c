pub mod assessment_store;
pub mod candidate_store;
pub mod job_store;
pub mod optimistic;

pub use assessment_store::AssessmentStore;
pub use candidate_store::CandidateStore;
pub use job_store::JobStore;

/// Fetch state machine: idle -> loading -> idle (with data or with error).
/// There is no cancellation; overlapping fetches race and the last write to
/// the store wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
}
