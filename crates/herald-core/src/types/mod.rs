//! Type definitions for Herald runtime configuration

mod runtime_config;

pub use runtime_config::*;
