//! Test helpers for muffin-factory integration tests.
//!
//! This module provides in-memory models that record every store event.

#[path = "helpers/models.rs"]
pub mod models;
