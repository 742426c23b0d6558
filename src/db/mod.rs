//! Local storage

pub mod sqlite;
