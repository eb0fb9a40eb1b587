//! Domain logic for the bizhub backend.
//!
//! Nothing in this crate touches the database or the network. It holds the
//! error type every service returns, the user-facing message catalogue,
//! request validation, the pagination and filter model, audit helpers, the
//! QA test-execution tracker and the traits for outbound integrations.

pub mod audit;
pub mod error;
pub mod integrations;
pub mod messages;
pub mod pagination;
pub mod qa;
pub mod types;
pub mod validation;
