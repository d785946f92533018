//! services/app/src/lib.rs
//!
//! The application service: adapters for the generation service and the
//! on-disk profile store, configuration, and the planner session that
//! orchestrates draft schedules against the core.

pub mod adapters;
pub mod analytics;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
