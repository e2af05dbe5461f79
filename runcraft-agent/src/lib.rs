//! # runcraft agent
//!
//! Agents are named bundles of instructions sent alongside a user prompt:
//! 1. Pick instructions, either by hand, from a persona, or from a task type
//! 2. Hand the agent, the input and a run configuration to the [`Runner`]
//! 3. The runner makes the remote call and returns the generated text
//!
//! Batches of independent calls run concurrently, optionally under one deadline.

mod agent;
mod dynamic;
mod persona;
mod runner;
mod tasks;

pub use agent::Agent;
pub use dynamic::DynamicAgent;
pub use persona::Persona;
pub use runner::{BatchJob, BatchOutcome, RunResult, Runner};
pub use tasks::{resolve_instructions, TaskType};
