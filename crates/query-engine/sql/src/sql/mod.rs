//! Type definitions and helpers for the SQL we generate.

pub mod ast;
pub mod convert;
pub mod execution_plan;
pub mod helpers;
pub mod string;
