//! Translate the incoming request to an ExecutionPlan (SQL) to be run against the database.

pub mod error;
pub mod helpers;
pub mod mutation;
pub mod query;
