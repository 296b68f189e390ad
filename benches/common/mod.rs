#![allow(missing_docs, dead_code)]
//! Shared benchmark support: fixture generators and Criterion settings.

pub mod generators;
pub mod harness;
