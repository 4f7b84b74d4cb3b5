//! LLM-backed execution engine for fincrew
//!
//! [`LlmCrewEngine`] implements [`ExecutionEngine`](fincrew_core::ExecutionEngine)
//! on top of any OpenAI-compatible chat-completions endpoint. Each task is
//! run by its bound role, which may call the web search and scrape tools
//! granted by its capabilities.

pub mod client;
pub mod engine;
pub mod error;
pub mod tools;

pub use client::{ChatClient, ChatConfig, ChatMessage, ChatModel, ChatRequest, ToolCall};
pub use engine::{EngineConfig, LlmCrewEngine};
pub use error::{LlmError, Result};
pub use tools::{ScrapeWebsiteTool, SerperSearchTool, Tool, Toolbox};
