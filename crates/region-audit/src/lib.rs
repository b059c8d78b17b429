//! Infers which region, language and audience a website targets from
//! extracted page signals, and audits how well it is localized for them.

pub mod audit;
pub mod bundle;
pub mod config;
pub mod error;
pub mod telemetry;
