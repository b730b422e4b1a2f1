//! Multi-target build engine.
//!
//! [`settings`] holds the platform table and the immutable [`BuildConfig`];
//! [`builder`] turns a config into built, collected artifacts.

pub mod builder;
pub mod settings;
pub(crate) mod utils;

pub use builder::*;
pub use settings::*;
