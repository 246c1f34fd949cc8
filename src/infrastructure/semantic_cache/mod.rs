//! Semantic cache store implementations

mod file_store;

pub use file_store::FileSemanticCache;
