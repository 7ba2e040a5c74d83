//! The transaction record, its routing channel, and the text fields
//! that sorting and searching can key on.

use crate::{error::ScopeError, types::RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One financial transaction. Immutable once created: stores copy
/// records in and hand out shared references, never aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub transaction_id:              RecordId,
    pub timestamp:                   String,
    pub sender_account:              String,
    pub receiver_account:            String,
    pub amount:                      f64,
    pub transaction_type:            String,
    pub merchant_category:           String,
    pub location:                    String,
    pub device_used:                 String,
    pub is_fraud:                    bool,
    pub fraud_type:                  String,
    pub time_since_last_transaction: String,
    pub spending_deviation_score:    String,
    pub velocity_score:              f64,
    pub geo_anomaly_score:           f64,
    pub payment_channel:             String,
    pub ip_address:                  String,
    pub device_hash:                 String,
}

impl Record {
    /// Fraud type, or `None` when the record is not flagged.
    pub fn fraud_label(&self) -> Option<&str> {
        self.is_fraud.then_some(self.fraud_type.as_str())
    }

    /// Bytes held on the heap by this record's strings.
    pub fn heap_bytes(&self) -> usize {
        [
            &self.transaction_id,
            &self.timestamp,
            &self.sender_account,
            &self.receiver_account,
            &self.transaction_type,
            &self.merchant_category,
            &self.location,
            &self.device_used,
            &self.fraud_type,
            &self.time_since_last_transaction,
            &self.spending_deviation_score,
            &self.payment_channel,
            &self.ip_address,
            &self.device_hash,
        ]
        .iter()
        .map(|s| s.capacity())
        .sum()
    }
}

/// Routing group a record is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Card,
    Ach,
    Upi,
    Wire,
}

impl Channel {
    /// Every channel, in display and storage order.
    pub const ALL: [Channel; 4] = [Channel::Card, Channel::Ach, Channel::Upi, Channel::Wire];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Ach  => "ach",
            Self::Upi  => "upi",
            Self::Wire => "wire",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::Ach  => "ACH",
            Self::Upi  => "UPI",
            Self::Wire => "Wire Transfer",
        }
    }

    /// Stable slot used to index per-channel arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Classify a raw `payment_channel` value. `None` means the record
    /// is excluded from every store.
    pub fn classify(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "card"                   => Some(Self::Card),
            "ach"                    => Some(Self::Ach),
            "upi"                    => Some(Self::Upi),
            "wire" | "wire_transfer" => Some(Self::Wire),
            _ => None,
        }
    }
}

impl FromStr for Channel {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::classify(s).ok_or_else(|| ScopeError::UnknownChannel { value: s.to_string() })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text fields a store can be ordered or searched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TransactionId,
    SenderAccount,
    ReceiverAccount,
    TransactionType,
    MerchantCategory,
    #[default]
    Location,
    DeviceUsed,
    FraudType,
    PaymentChannel,
    IpAddress,
}

impl Field {
    pub fn value<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            Self::TransactionId    => &record.transaction_id,
            Self::SenderAccount    => &record.sender_account,
            Self::ReceiverAccount  => &record.receiver_account,
            Self::TransactionType  => &record.transaction_type,
            Self::MerchantCategory => &record.merchant_category,
            Self::Location         => &record.location,
            Self::DeviceUsed       => &record.device_used,
            Self::FraudType        => &record.fraud_type,
            Self::PaymentChannel   => &record.payment_channel,
            Self::IpAddress        => &record.ip_address,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TransactionId    => "transaction_id",
            Self::SenderAccount    => "sender_account",
            Self::ReceiverAccount  => "receiver_account",
            Self::TransactionType  => "transaction_type",
            Self::MerchantCategory => "merchant_category",
            Self::Location         => "location",
            Self::DeviceUsed       => "device_used",
            Self::FraudType        => "fraud_type",
            Self::PaymentChannel   => "payment_channel",
            Self::IpAddress        => "ip_address",
        }
    }
}
