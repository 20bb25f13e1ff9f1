//! Pipeline module - scoring, fairness-constrained ranking and auditing

pub mod audit;
pub mod error;
pub mod fairness;
pub mod forest;
pub mod loader;
pub mod player;
pub mod ranker;
pub mod score;
pub mod session;
pub mod weights;

pub use audit::*;
pub use error::*;
pub use fairness::{fit_demographic_parity, lagrange_grid, Candidate, FairModel, GridSearchConfig};
pub use forest::{ForestConfig, RandomForestRegressor};
pub use loader::*;
pub use player::*;
pub use ranker::*;
pub use score::*;
pub use session::*;
pub use weights::*;
