//! # Catalyst Client
//!
//! Talks to the Catalyst API and keeps the state behind the timetable editor
//! and the teacher's roster screen.
//!
//! - [`api::TimetableBackend`]: one method per endpoint, typed both ways
//! - [`http::HttpBackend`]: the reqwest implementation of it
//! - [`manager::EntryManager`]: entries and conflicts of the class being edited
//! - [`roster::RosterView`]: a cached student list with filter and sort state

pub mod api;
pub mod config;
pub mod http;
pub mod manager;
pub mod roster;
