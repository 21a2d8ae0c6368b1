//! Command layer shared by the binary and integration tests

pub mod orchestration;

pub use orchestration::{run_workflow, Command, WorkflowArgs, WorkflowResult};
