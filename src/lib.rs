//! strm-webhook - mirror AList directories as `.strm` stream descriptors
//!
//! This library crate exposes the core functionality for integration testing.

pub mod alist;
pub mod config;
pub mod server;
pub mod strm;
