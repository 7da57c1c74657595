//! Shared wire-level types for the Bittrex REST API
//!
//! This crate holds the enumerated values the exchange accepts on the wire,
//! across all three API generations (v1.1, v2.0 and v3). Every enum carries
//! an explicit `as_str()` mapping to the exact wire string; serialization
//! never relies on implicit name-to-string conversion.
//!
//! It has minimal dependencies and can be used independently of the client.

pub mod enums;

pub use enums::*;
