//! Sitecms: content server, editing CLI and admin tool for the site store.
//!
//! The content model and sync engine live in `sitecms-core`.

pub mod config;
pub mod server;
