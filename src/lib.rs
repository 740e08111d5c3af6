//! Measure how long pull requests take to get merged, bucketed by diff size.
//!
//! One run is a single sequential pass: paginate a repository's closed pull
//! requests newest-first, stop at the age cutoff, count each merged pull's
//! diff lines, then print nearest-rank percentile statistics for the whole
//! sample and per size bucket.

pub mod cli;
pub mod collector;
pub mod config;
pub mod diff;
pub mod github;
pub mod report;
pub mod stats;
