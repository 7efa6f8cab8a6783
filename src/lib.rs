//! Avatreat
//!
//! A service that designs preprocessing treatments for tabular data:
//! fitting a treatment plan on a training table, storing it, and replaying
//! it on new tables to produce model-ready numeric columns. Structured
//! following Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
