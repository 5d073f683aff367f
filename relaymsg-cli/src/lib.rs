//! # relaymsg-cli
//!
//! Command-line front end for `relaymsg-core`: loads a TOML config,
//! sends each message as one TLS line, and prints the status reported
//! for every message.

pub mod app;
pub mod config;
