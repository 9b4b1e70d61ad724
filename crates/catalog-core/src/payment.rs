//! # Payment Vocabulary
//!
//! Shared constants for the payment-processing subsystem: transaction
//! kinds, charge statuses, transaction error codes, gateway operation types
//! and custom payment choices.
//!
//! Nothing here enforces state transitions. These are labels only; the
//! payment state machine lives with whatever consumes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A wire string did not match any member of a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {vocabulary} value: {value:?}")]
pub struct UnknownVariant {
    pub vocabulary: &'static str,
    pub value: String,
}

/// Declares a closed vocabulary enum with its wire string and display label.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident as $vocab:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// `(wire value, label)` pairs in declaration order
            pub const CHOICES: &'static [(&'static str, &'static str)] = &[
                $( ($wire, $label), )+
            ];

            /// All members in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Returns the wire value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }

            /// Returns the human-readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err(UnknownVariant {
                        vocabulary: $vocab,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// The operation a payment transaction record represents.
    ///
    /// - `Auth`: an amount reserved against the customer's funding source.
    ///   Money does not change hands until the authorization is captured.
    /// - `Capture`: transfer of the money reserved during authorization.
    /// - `Void`: cancellation of a pending authorization or capture.
    /// - `Refund`: full or partial return of captured funds.
    /// - `Confirm`: manual confirmation of a transaction by staff.
    TransactionKind as "transaction kind" {
        Auth => ("auth", "Authorization"),
        Refund => ("refund", "Refund"),
        Capture => ("capture", "Capture"),
        Void => ("void", "Void"),
        Confirm => ("confirm", "Confirm"),
    }
}

vocabulary! {
    /// How much of a payment's amount has been captured or refunded.
    ChargeStatus as "charge status" {
        /// No funds were taken off the customer's funding source yet
        NotCharged => ("not-charged", "Not charged"),
        /// Funds taken partly cover the payment amount
        PartiallyCharged => ("partially-charged", "Partially charged"),
        /// Funds taken cover the payment amount
        FullyCharged => ("fully-charged", "Fully charged"),
        /// Part of the charged funds were returned
        PartiallyRefunded => ("partially-refunded", "Partially refunded"),
        /// All charged funds were returned
        FullyRefunded => ("fully-refunded", "Fully refunded"),
    }
}

vocabulary! {
    /// Normalized transaction error codes reported by gateways.
    TransactionError as "transaction error" {
        IncorrectNumber => ("incorrect_number", "Incorrect card number"),
        InvalidNumber => ("invalid_number", "Invalid card number"),
        IncorrectCvv => ("incorrect_cvv", "Incorrect CVV"),
        InvalidCvv => ("invalid_cvv", "Invalid CVV"),
        IncorrectZip => ("incorrect_zip", "Incorrect postal code"),
        IncorrectAddress => ("incorrect_address", "Incorrect address"),
        InvalidExpiryDate => ("invalid_expiry_date", "Invalid expiry date"),
        Expired => ("expired", "Expired"),
        ProcessingError => ("processing_error", "Processing error"),
        Declined => ("declined", "Declined"),
    }
}

vocabulary! {
    /// Gateway operations a payment processor can be asked to perform.
    OperationType as "operation type" {
        ProcessPayment => ("process_payment", "Process payment"),
        Auth => ("authorize", "Authorize"),
        Capture => ("capture", "Capture"),
        Void => ("void", "Void"),
        Refund => ("refund", "Refund"),
        Confirm => ("confirm", "Confirm"),
    }
}

vocabulary! {
    /// Payment methods handled without an external gateway.
    CustomPaymentChoices as "custom payment choice" {
        Manual => ("manual", "Manual"),
    }
}

impl TransactionKind {
    /// The gateway operation that produces a transaction of this kind
    pub fn operation(&self) -> OperationType {
        match self {
            TransactionKind::Auth => OperationType::Auth,
            TransactionKind::Capture => OperationType::Capture,
            TransactionKind::Void => OperationType::Void,
            TransactionKind::Refund => OperationType::Refund,
            TransactionKind::Confirm => OperationType::Confirm,
        }
    }
}

impl Default for ChargeStatus {
    fn default() -> Self {
        ChargeStatus::NotCharged
    }
}

/// Business or validation failure while handling a payment.
///
/// Carries a message meant to be shown to the customer or operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PaymentError {
    pub message: String,
}

impl PaymentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Communication failure with an external payment gateway
#[derive(Debug, Error)]
#[error("Gateway I/O failure: {source}")]
pub struct GatewayError {
    #[from]
    source: std::io::Error,
}

impl GatewayError {
    /// Build a gateway failure from a plain message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            source: std::io::Error::other(message.into()),
        }
    }

    /// Underlying I/O error kind
    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}

/// Either failure category, for callers that handle both
#[derive(Debug, Error)]
pub enum PaymentFailure {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PaymentFailure {
    /// Gateway failures may succeed on retry; business failures will not
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentFailure::Gateway(_))
    }

    /// Returns the HTTP status code appropriate for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentFailure::Payment(_) => 402,
            PaymentFailure::Gateway(_) => 502,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_kind_choices() {
        assert_eq!(TransactionKind::CHOICES.len(), 5);
        assert_eq!(TransactionKind::CHOICES[0], ("auth", "Authorization"));
        assert_eq!(TransactionKind::Capture.as_str(), "capture");
        assert_eq!(TransactionKind::Refund.operation(), OperationType::Refund);
    }

    #[test]
    fn test_charge_status_wire_values() {
        assert_eq!(ChargeStatus::default(), ChargeStatus::NotCharged);
        assert_eq!(
            "partially-refunded".parse::<ChargeStatus>(),
            Ok(ChargeStatus::PartiallyRefunded)
        );
        assert_eq!(ChargeStatus::FullyCharged.label(), "Fully charged");
        assert_eq!(ChargeStatus::ALL.len(), 5);
    }

    #[test]
    fn test_unknown_value_rejected() {
        let err = "refunded".parse::<ChargeStatus>().unwrap_err();
        assert_eq!(err.vocabulary, "charge status");
        assert_eq!(err.value, "refunded");
    }

    #[test]
    fn test_transaction_error_codes() {
        assert_eq!(TransactionError::ALL.len(), 10);
        for code in TransactionError::ALL {
            assert_eq!(code.as_str().parse::<TransactionError>(), Ok(*code));
        }
    }

    #[test]
    fn test_operation_type_serde() {
        let json = serde_json::to_string(&OperationType::Auth).unwrap();
        assert_eq!(json, "\"authorize\"");
        let parsed: OperationType = serde_json::from_str("\"process_payment\"").unwrap();
        assert_eq!(parsed, OperationType::ProcessPayment);
    }

    #[test]
    fn test_custom_payment_choices() {
        assert_eq!(CustomPaymentChoices::CHOICES, &[("manual", "Manual")]);
        assert_eq!(CustomPaymentChoices::Manual.to_string(), "manual");
    }

    #[test]
    fn test_failure_taxonomy() {
        let payment: PaymentFailure = PaymentError::new("Card declined").into();
        assert!(!payment.is_retryable());
        assert_eq!(payment.status_code(), 402);
        assert_eq!(payment.to_string(), "Card declined");

        let gateway: PaymentFailure = GatewayError::new("connection reset").into();
        assert!(gateway.is_retryable());
        assert_eq!(gateway.status_code(), 502);
        assert!(gateway.to_string().contains("connection reset"));
    }

    #[test]
    fn test_gateway_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = GatewayError::from(io);
        assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    }
}
