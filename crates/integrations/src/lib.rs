//! Outbound collaborators for the bizhub backend.
//!
//! - [`ScheduledEmailDispatcher`] implements the message email scheduler
//!   with per-batch cancellation, delivering through [`SmtpMailer`].
//! - [`HttpShippingProvider`] registers pickup locations and places and
//!   cancels shipment orders with the shipping provider.

pub mod dispatcher;
pub mod email;
pub mod shipping;

pub use dispatcher::ScheduledEmailDispatcher;
pub use email::{EmailConfig, EmailError, MailTransport, SmtpMailer};
pub use shipping::{HttpShippingProvider, ShippingConfig, ShippingError};
