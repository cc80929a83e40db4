//! Equipment: variants, stat bundles, and strike geometry.

pub mod bundle;
pub mod pattern;
pub mod types;

pub use bundle::*;
pub use pattern::*;
pub use types::*;
