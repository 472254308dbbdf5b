//! Multiplication flash-card drill on top of `flashloop-engine`.
//!
//! A session is a countdown, a timed drill over shuffled problems and a
//! score banner, each running as its own loop controller on a [`Stage`].

pub mod config;
pub mod problems;
pub mod score;
pub mod screens;
pub mod stage;

pub use config::{Cli, ConfigError, DrillConfig};
pub use problems::Problem;
pub use score::{DrillReport, format_time};
pub use stage::{Stage, StageHandle};
