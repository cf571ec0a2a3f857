// linkdeck-common: shared types and utilities for the linkdeck workspace

pub mod metrics;
pub mod types;
pub mod validation;
