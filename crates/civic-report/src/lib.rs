//! Core library for the citizen incident reporting service.
//!
//! Residents file reports with photo evidence and a map pin, an urgency
//! classifier tiers each report at intake, and staff walk reports through a
//! forward-only lifecycle until they are resolved with proof of work.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
