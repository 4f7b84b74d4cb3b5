//! Core orchestration primitives for fincrew
//!
//! This crate defines the building blocks shared by every crew:
//!
//! - [`LogBroadcaster`]: ordered, observable activity log
//! - [`RetryPolicy`]: bounded exponential backoff around rate-limited calls
//! - [`AgentRole`] and [`TaskTemplate`]: static crew configuration
//! - [`ExecutionUnit`]: the bundle submitted to an [`ExecutionEngine`]
//! - [`CrewError`]: the error taxonomy surfaced to callers

pub mod broadcaster;
pub mod engine;
pub mod error;
pub mod retry;
pub mod role;
pub mod task;
pub mod unit;

pub use broadcaster::{LogBroadcaster, LogEntry, SubscriptionId};
pub use engine::{CrewHooks, CrewOutput, ExecutionEngine, TaskOutput};
pub use error::{CrewError, EngineError, Result};
pub use retry::{RetryError, RetryPolicy, execute_with_retry, is_rate_limit_message};
pub use role::{AgentRole, Capability};
pub use task::{Task, TaskParams, TaskTemplate};
pub use unit::{ExecutionUnit, ManagerRole, Process};
