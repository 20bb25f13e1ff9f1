//! Report module - ranking tables, fairness panel and JSON export

pub mod export;
pub mod ranking;
pub mod summary;

pub use export::*;
pub use ranking::*;
pub use summary::*;
