//! CLI subcommand implementations.

pub mod audit;
pub mod history;
pub mod replay;
pub mod report;
pub mod shift;
pub mod status;
pub mod submit;
pub mod util;
