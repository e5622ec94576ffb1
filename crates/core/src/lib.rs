//! # Catalyst Core
//!
//! Domain types and pure operations shared by the Catalyst timetable server
//! and its client: the scheme editor, round-robin timetable generation,
//! conflict aggregation, roster filtering and a typed TTL cache.

pub mod analytics;
pub mod cache;
pub mod conflicts;
pub mod errors;
pub mod generator;
pub mod models;
pub mod roster;
pub mod scheme;
