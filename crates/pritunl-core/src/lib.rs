//! # pritunl-core
//!
//! Core types and utilities for talking to a Pritunl VPN server's management API.
//!
//! This crate provides the error type, configuration, typed identifiers, request
//! signing and the signed HTTP client shared by the Pritunl API crates.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and response classification
//! - [`id`] - Strongly-typed identifiers for Pritunl resources
//! - [`config`] - Connection configuration (URL, credentials, TLS policy)
//! - [`auth`] - `Auth-*` header signing
//! - [`client`] - Signed HTTP service client

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod id;

// Re-export commonly used types
pub use error::{Error, Result};
