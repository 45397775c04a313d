//! Dashboard configuration module

pub mod dashboard;

pub use dashboard::*;
