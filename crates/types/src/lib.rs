//! Core data model shared by every nameservice crate.

pub mod address;
pub mod coins;
pub mod record;

pub use address::*;
pub use coins::*;
pub use record::*;
