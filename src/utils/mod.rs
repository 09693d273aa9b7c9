//! Utility functions for working with recordings.
//!
//! # Modules
//!
//! - [`generation`] - Synthetic tick trains with known timing

pub mod generation;
