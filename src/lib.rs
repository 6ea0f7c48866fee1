//! Self-hosted TV channel and VOD server. Catalogs media folders and streams files over HTTP ranges.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod http;
pub mod media;
