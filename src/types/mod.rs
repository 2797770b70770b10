//! Shared request types.

pub mod generation;

pub use generation::GenerationSettings;
