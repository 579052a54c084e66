//! Application services for the task workflow.

mod workflow;

pub use workflow::{TaskView, TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService};
