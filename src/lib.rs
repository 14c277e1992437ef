//! Shared ambient pieces of the patch relay workspace.
//!
//! - [`config`]: environment-driven settings for the binaries.
//! - [`logging`]: tracing subscriber bootstrap.
//! - [`display`]: width-aware text helpers used for transcripts and the line-numbered
//!   program listing sent to the backend.

pub mod config;
pub mod display;
pub mod logging;

pub use crate::config::EnvConfig;
pub use crate::display::{numbered_listing, render_labeled, visible_width, wrap_text};
