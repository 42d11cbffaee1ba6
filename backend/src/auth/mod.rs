//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for user authentication-related functionalities
//! such as login, password verification, session token management, and the authorization gate.

pub mod claims;
pub mod errors;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use claims::{claims_for, session_view, SessionIssuer};
pub use errors::AuthError;
pub use gate::{authorize, permits, Capability};
pub use middleware::CurrentSession;
pub use models::*;
pub use routes::auth_router;
pub use service::AuthService;
