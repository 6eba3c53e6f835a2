//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of a mocking crate?
//! - Manual mocks are more explicit and easier to debug
//! - We control exactly what they return without macro magic
//! - The recording gateway doubles as a tiny in-memory chat platform,
//!   which lets synchronization tests assert on message lifecycles

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
