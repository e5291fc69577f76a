//! Clipboard capture agent.
//!
//! Samples the system clipboard on a fixed period, appends every distinct
//! change to an append-only log in the user's home directory, and registers
//! itself for launch at system startup.

pub mod autostart;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod detector;
pub mod entry;
pub mod event_loop;
pub mod logger;
pub mod reporter;
pub mod runner;
pub mod state;
pub mod tracing_sub;
pub mod visibility;
