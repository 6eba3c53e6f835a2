//! SeaORM table definitions
//!
//! Both tables are document tables: the full domain entity is serialized
//! into the `doc` jsonb column, and a handful of indexed columns exist
//! only for lookups.

pub mod participants;
pub mod tournaments;
