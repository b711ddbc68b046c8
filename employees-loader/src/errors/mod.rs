//! Error types for the employees loader.
//!
//! A single error enum covers every stage of a run, from reading the env
//! file to running the import statements.

mod loader_error;

pub use loader_error::LoaderError;
