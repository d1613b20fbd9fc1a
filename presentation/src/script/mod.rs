//! Action scripts: a line-oriented driver for the session

mod runner;
mod step;

pub use runner::{ScriptError, ScriptRunner};
pub use step::{QueryResult, ScriptQuery, ScriptStep, ScriptSummary, StepReport};
