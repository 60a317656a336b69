//! Application ports (traits) for external dependencies.
//!
//! Adapters in `strata-adapters` implement these.
//!
//! - **Driven (Output) Ports**: called by feature processors through rules
//!   - `Filesystem`: file operations on the generated tree

pub mod output;

pub use output::Filesystem;
