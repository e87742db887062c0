pub mod artifact;
pub mod descriptor;
pub mod kill_mask;
pub mod loader;
pub mod source;

pub use artifact::{ArtifactBundle, ArtifactMetadata, ArtifactWriter};
pub use descriptor::CandidateDescriptor;
pub use kill_mask::KillMask;
pub use loader::ChunkLoader;
pub use source::resolve_source_files;
