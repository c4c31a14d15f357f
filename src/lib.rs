//! iris-serve - Iris model serving with drift monitoring
//!
//! In-process inference serving built around three pieces of shared state:
//!
//! - [`cache`] - prediction cache with TTL expiry, keyed by model name and
//!   feature vector
//! - [`background`] - deferred task execution decoupled from the response
//!   path
//! - [`window`] - sliding-window log of served predictions feeding
//!   [`drift`] reporting against a deterministic reference dataset
//!
//! The remaining modules are the surrounding service: [`registry`] owns the
//! loaded predictors, [`server`] exposes the REST API, [`config`] carries
//! the injectable knobs.

// Core error handling
pub mod error;

// Serving core
pub mod background;
pub mod cache;
pub mod features;
pub mod window;

// Models
pub mod registry;

// Monitoring
pub mod drift;

// Services
pub mod cli;
pub mod config;
pub mod server;
