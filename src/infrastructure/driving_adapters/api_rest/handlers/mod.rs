//! HTTP Handlers

pub mod designs;
