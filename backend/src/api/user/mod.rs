//! Module for account management API endpoints.
//!
//! This module handles account creation, which is distinct from the core
//! authentication process: an administrator creates accounts for others.

pub mod handlers;
pub mod models;
pub mod routes;
