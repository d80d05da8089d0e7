pub mod boundary;
pub mod changelog;
pub mod ci;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod harness;
pub mod stages;
pub mod telemetry;
pub mod ui;
pub mod workspace;

pub use error::{ReleaseError, Result};
