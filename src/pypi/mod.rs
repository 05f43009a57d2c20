// Package index API module.
// Provides the cached client and response types for the PyPI JSON API.

pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::IndexClient;
pub use types::*;
