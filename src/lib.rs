//! REST API for a school's extracurricular-activity signup board.
//!
//! Activities live in SQLite (`database`), roster rules live in
//! `services::roster_service`, and `web` exposes them over HTTP.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod web;
