//! Minimal AList API client.
//!
//! Only directory listing is needed: the generator walks the remote tree and
//! never downloads content.

mod client;
mod types;

pub use client::{AlistClient, DirectoryLister, ListError};
pub use types::*;
