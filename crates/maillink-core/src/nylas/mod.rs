//! Aggregation service client.
//!
//! Every call made on behalf of an account returns an [`Outcome`]: a call
//! that could not get a session is `Skipped`, a call that failed is
//! `Failed`, and both are logged where they happen.

mod client;
mod connect;
mod draft;
mod error;
mod operation;
mod outcome;

pub use client::{NylasClient, Session, check_credentials, forward_request, send_message};
pub use connect::{ConnectRequest, ConnectedAccount, NYLAS_SCOPES};
pub use draft::{Draft, SentMessage};
pub use error::NylasError;
pub use operation::{Action, Filter, Operation, Resource};
pub use outcome::{Outcome, SkipReason};
