//! Command-line workflow: wiring the repository, configuration and output
//! together around the domain logic.

pub mod orchestration;
pub mod output;

pub use orchestration::{
    describe_repository, generate_for, run, run_describe_workflow, DescribeWorkflowArgs,
    WorkflowResult,
};
pub use output::OutputTarget;
