//! SQL AST, rendering of the AST to parameterised SQL strings, and execution plans.

pub mod sql;
