//! Data models for contact records and pipeline configuration.

pub mod config;
pub mod contact;
