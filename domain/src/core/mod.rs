//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] — configuration and turn-accounting errors

pub mod error;
