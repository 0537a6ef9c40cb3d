//! Service layer containing business logic orchestration.

mod setup_service;

pub use setup_service::{Plan, SetupPaths, SetupService};
