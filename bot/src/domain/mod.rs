//! Domain layer
//!
//! Entities and port traits. No I/O happens here; adapters implement the
//! ports against the real database and chat platform.

pub mod entities;
pub mod ports;
