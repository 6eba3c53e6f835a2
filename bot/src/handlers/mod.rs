//! HTTP handlers
//!
//! Axum request handlers for the trigger surface.

pub mod triggers;

pub use triggers::{
    create_tournament, delete_tournament, join_tournament, leave_tournament, opt_out,
    refresh_tournament, reset_premades, set_premades,
};
