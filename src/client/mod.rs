//! Quiz client module.
//!
//! Plain line-oriented terminal client for the TCP quiz server.

mod client;
mod render;

pub use client::run;
pub use render::{render, resolve_choice};
