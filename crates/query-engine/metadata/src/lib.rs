//! Metadata about the tables the engine may query: their columns and the
//! semantic type of each column.

pub mod metadata;
