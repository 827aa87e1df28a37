//! Shared value types carried by transaction and postback results.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Outcome category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnType {
    /// The transaction completed.
    #[serde(rename = "FINISHED")]
    Finished,
    /// The customer must be redirected to `redirectUrl`.
    #[serde(rename = "REDIRECT")]
    Redirect,
    /// `htmlContent` must be rendered to the customer.
    #[serde(rename = "HTML")]
    Html,
    /// The outcome will arrive later through a postback.
    #[serde(rename = "PENDING")]
    Pending,
    /// The transaction failed; see the attached errors.
    #[serde(rename = "ERROR")]
    Error,
}

impl ReturnType {
    /// All variants, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Finished,
        Self::Redirect,
        Self::Html,
        Self::Pending,
        Self::Error,
    ];

    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "FINISHED",
            Self::Redirect => "REDIRECT",
            Self::Html => "HTML",
            Self::Pending => "PENDING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FINISHED" => Ok(Self::Finished),
            "REDIRECT" => Ok(Self::Redirect),
            "HTML" => Ok(Self::Html),
            "PENDING" => Ok(Self::Pending),
            "ERROR" => Ok(Self::Error),
            other => Err(ModelError::UnknownReturnType(other.to_owned())),
        }
    }
}

/// Typed payload attached to a transaction result.
///
/// Selected by the `type` attribute of `<returnData>`. Payload kinds the model
/// does not know yet are dropped by the parser instead of failing, so new
/// variants may appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum ReturnData {
    /// `type="creditcardData"`.
    #[serde(rename = "creditcardData")]
    Creditcard(CreditcardData),
}

impl ReturnData {
    /// The `type` attribute value that selects this payload.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Creditcard(_) => CreditcardData::TYPE_NAME,
        }
    }
}

impl From<CreditcardData> for ReturnData {
    fn from(data: CreditcardData) -> Self {
        Self::Creditcard(data)
    }
}

/// Masked credit card details returned for card transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditcardData {
    /// Card brand, e.g. `visa`.
    pub card_type: Option<String>,
    /// Card holder first name.
    pub first_name: Option<String>,
    /// Card holder last name.
    pub last_name: Option<String>,
    /// ISO country code of the issuer.
    pub country: Option<String>,
    /// Name as printed on the card.
    pub card_holder: Option<String>,
    /// `None` when absent; `Some(0)` when the gateway sent a non-numeric value.
    pub expiry_month: Option<i32>,
    /// Four-digit year, same absent/malformed rules as `expiry_month`.
    pub expiry_year: Option<i32>,
    /// Bank identification number (first six PAN digits).
    pub first_six_digits: Option<String>,
    /// Last four PAN digits.
    pub last_four_digits: Option<String>,
}

impl CreditcardData {
    /// Value of the `returnData/@type` attribute for this payload.
    pub const TYPE_NAME: &'static str = "creditcardData";
}

/// One error entry reported by the gateway or the downstream adapter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayError {
    /// Human readable message.
    pub message: Option<String>,
    /// Gateway error code.
    pub code: Option<String>,
    /// Message as reported by the payment adapter, if any.
    pub adapter_message: Option<String>,
    /// Code as reported by the payment adapter, if any.
    pub adapter_code: Option<String>,
}

impl GatewayError {
    /// Create an error entry from its four optional parts.
    #[must_use]
    pub fn new(
        message: Option<String>,
        code: Option<String>,
        adapter_message: Option<String>,
        adapter_code: Option<String>,
    ) -> Self {
        Self {
            message,
            code,
            adapter_message,
            adapter_code,
        }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(code), None) => f.write_str(code),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown gateway error"),
        }?;
        if let Some(adapter_code) = &self.adapter_code {
            write!(f, " (adapter {adapter_code})")?;
        }
        Ok(())
    }
}
