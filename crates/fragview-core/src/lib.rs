// Public fallible APIs in this crate share one concrete error contract (`FragviewError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod highlight;
pub mod models;
pub mod searcher;
pub mod session;

pub use config::CoreConfig;
pub use controller::{FragmentFetch, HttpFetcher, LoadOutcome, LoadTicket, SessionController};
pub use debounce::Debouncer;
pub use error::{FragviewError, Result};
pub use highlight::Highlighter;
pub use models::{Direction, Fragment, Line, MatchedLine, SearchOptions, SearchToggle};
pub use searcher::Searcher;
pub use session::{FragmentStore, Generation, SearchSession};
