//! Client library for the PGE-QROO energy consumption platform.
//!
//! Layers, bottom up:
//! - [`traits`]: the HTTP transport and token storage seams
//! - [`adapters`]: reqwest/file implementations plus test mocks
//! - [`api`]: request plumbing bound to the REST and analytics backends
//! - [`repository`]: one typed repository per feature
//! - [`state`]: UI-independent controllers publishing snapshots
//! - [`cli`]: the `pge` command-line front end

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod state;
pub mod traits;
