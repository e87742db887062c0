use crate::candidate::LoadedCandidate;
use crate::interface::descriptor::CandidateDescriptor;
use crate::prelude::PrepResult;

/// Contract for the candidate loader boundary.
///
/// An implementation resolves the descriptor's source file(s), derives and
/// applies the optional kill mask, and extracts the raw data chunk around
/// the candidate's time and DM. Failures are fatal for that candidate only.
pub trait ChunkLoader: Send + Sync {
    fn load(&self, descriptor: &CandidateDescriptor) -> PrepResult<LoadedCandidate>;
}
