pub mod artifact;
pub mod fil;
pub mod loader;

pub use artifact::JsonArtifactWriter;
pub use fil::SigprocFile;
pub use loader::FileChunkLoader;
