//! # Utilities Module
//!
//! Randomization primitives shared by every generator.

pub mod random;

pub use random::*;
