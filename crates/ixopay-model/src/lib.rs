//! Typed result models for the IxoPay payment gateway.
//!
//! These are the values produced by the XML layer (`ixopay-xml`) when it reads a
//! synchronous transaction result or an asynchronous postback. Every type is plain
//! data: owned, cloneable and serde-serializable so callers can forward parsed
//! results as JSON.

mod error;
mod extra_data;
mod result;
mod types;

pub use error::ModelError;
pub use extra_data::ExtraData;
pub use result::{CallbackResult, TransactionResult};
pub use types::{CreditcardData, GatewayError, ReturnData, ReturnType};
