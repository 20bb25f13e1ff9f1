//! Prodigy: Fair Potential Ranking Library
//!
//! Scores youth athletes with user-weighted scouting attributes, re-ranks
//! them with a demographic-parity constrained random forest, and reports
//! selection rates by gender and by gender and age group.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
