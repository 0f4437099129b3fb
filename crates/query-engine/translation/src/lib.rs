//! Translate listing requests and single-record operations to SQL execution plans.

pub mod translation;
