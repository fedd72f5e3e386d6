//! ragdesk - a terminal client for a retrieval-augmented-generation
//! document service.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod client;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod sse;
pub mod startup;
pub mod terminal;
pub mod traits;
pub mod ui;
