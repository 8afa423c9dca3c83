//! Repograde - composite repository quality reports
//!
//! Clones a repository into an ephemeral workspace, runs independent
//! best-effort analyzers against it in bounded parallel, normalizes their
//! raw metrics onto a common 0-100 scale, and aggregates the result into
//! an immutable graded report.

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod workspace;
