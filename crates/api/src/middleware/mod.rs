//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller and its tenant
//!   from a JWT Bearer token.

pub mod auth;
