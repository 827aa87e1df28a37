//! Top-level results: synchronous transaction outcomes and postbacks.

use serde::{Deserialize, Serialize};

use crate::extra_data::ExtraData;
use crate::types::{CreditcardData, GatewayError, ReturnData, ReturnType};

/// Outcome of a synchronous gateway API call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// Whether the gateway accepted the request.
    pub success: bool,
    /// Gateway-side transaction reference.
    pub reference_id: Option<String>,
    /// Registration reference for stored payment instruments.
    pub registration_id: Option<String>,
    /// Target for `ReturnType::Redirect`.
    pub redirect_url: Option<String>,
    /// Markup for `ReturnType::Html`.
    pub html_content: Option<String>,
    /// Descriptor shown on the customer's statement.
    pub payment_descriptor: Option<String>,
    /// What the merchant has to do next.
    pub return_type: Option<ReturnType>,
    /// Typed payload selected by `returnData/@type`.
    pub return_data: Option<ReturnData>,
    /// Errors in document order.
    pub errors: Vec<GatewayError>,
    /// Free-form annotations in document order.
    pub extra_data: ExtraData,
}

impl TransactionResult {
    /// First reported error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&GatewayError> {
        self.errors.first()
    }

    /// Credit card payload, when the result carries one.
    #[must_use]
    pub fn creditcard_data(&self) -> Option<&CreditcardData> {
        match &self.return_data {
            Some(ReturnData::Creditcard(cc)) => Some(cc),
            None => None,
        }
    }
}

/// Asynchronous notification sent by the gateway to the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResult {
    /// Outcome string, e.g. `OK` or `ERROR`.
    pub result: Option<String>,
    /// Merchant-side transaction id.
    pub transaction_id: Option<String>,
    /// Gateway-side transaction reference.
    pub reference_id: Option<String>,
    /// Errors in document order.
    pub errors: Vec<GatewayError>,
    /// Free-form annotations in document order.
    pub extra_data: ExtraData,
}

impl CallbackResult {
    /// Result string of a successful postback.
    pub const RESULT_OK: &'static str = "OK";

    /// Whether the postback reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.as_deref() == Some(Self::RESULT_OK)
    }

    /// First reported error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&GatewayError> {
        self.errors.first()
    }
}
