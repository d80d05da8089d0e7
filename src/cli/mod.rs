pub mod orchestration;

pub use orchestration::{
    fetch_remote_tags, generate_changelog, run_workflow, WorkflowArgs, WorkflowResult,
    WorkflowStatus,
};
