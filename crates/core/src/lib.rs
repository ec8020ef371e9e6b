//! Domain types and pure logic for the royalty platform.
//!
//! Nothing in this crate touches the database or the network.

pub mod catalog;
pub mod error;
pub mod money;
pub mod mutation;
pub mod period;
pub mod royalty;
pub mod types;
