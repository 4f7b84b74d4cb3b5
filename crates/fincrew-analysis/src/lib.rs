//! Financial analysis crews
//!
//! This crate turns user investment parameters into a crew run:
//!
//! - [`AnalysisInputs`] are validated and turned into interpolation
//!   parameters; a non-empty stock symbol selects [`AnalysisMode::Single`],
//!   otherwise [`AnalysisMode::Portfolio`]
//! - [`CrewAssembler`] picks the four specialists and tasks for the mode
//! - [`AnalysisRunner`] drives the assembled unit through an
//!   [`ExecutionEngine`](fincrew_core::ExecutionEngine) under a
//!   [`RetryPolicy`](fincrew_core::RetryPolicy), reporting every phase to a
//!   [`LogBroadcaster`](fincrew_core::LogBroadcaster)
//!
//! # Example
//!
//! ```rust,ignore
//! use fincrew_analysis::{AnalysisInputs, AnalysisRunner, CrewConfig};
//! use fincrew_core::LogBroadcaster;
//! use std::sync::Arc;
//!
//! let log = Arc::new(LogBroadcaster::new());
//! log.register_callback(|entry| println!("[{}] {}: {}", entry.time_label(), entry.agent(), entry.action()));
//!
//! let runner = AnalysisRunner::new(engine, Arc::clone(&log), CrewConfig::default());
//! let report = runner.run(&AnalysisInputs::default()).await?;
//! ```

pub mod assembler;
pub mod config;
pub mod inputs;
pub mod models;
pub mod prompts;
pub mod roster;
pub mod runner;

pub use assembler::CrewAssembler;
pub use config::{CrewConfig, CrewConfigBuilder};
pub use inputs::{
    AnalysisInputs, AnalysisMode, PORTFOLIO_TARGET, RiskTolerance, normalize_symbol,
    parse_sector_list,
};
pub use roster::{Roster, Specialist, TaskKind, roster};
pub use runner::{AnalysisRunner, MANAGER_LABEL, RunState};
