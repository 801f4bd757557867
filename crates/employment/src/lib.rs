//! Compensation accrual for managers: call processing, bonus tiers, salary, and premiums.

pub mod compensation;
pub mod config;
pub mod error;
pub mod telemetry;
