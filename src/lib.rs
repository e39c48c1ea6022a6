//! Poll and voting backend.
//!
//! Authenticated users create polls and cast exactly one vote each; results
//! are public. Duplicate votes are prevented by a single conditional update
//! in the store, not by the handler's read-then-check. Authentication uses
//! short-lived access tokens plus long-lived refresh tokens carried in
//! cookies, with a `requiresRefresh` hint telling clients when to run the
//! refresh exchange.

pub mod config;
pub mod controllers;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
