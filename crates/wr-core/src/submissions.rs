//! # Guest Submissions
//!
//! Inbound payload shapes and their mapping onto store writes.
//!
//! Every field a guest may send is optional at this layer. Presence of the
//! required columns is enforced by the record store's NOT NULL constraints,
//! so a missing `donor_name` surfaces as a write failure, not a 400.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{donation_status, PledgeStatus};

/// Values filled in when a submission leaves a field out (or sends it empty).
pub mod defaults {
    pub const CURRENCY: &str = "KES";
    pub const DONATION_STATUS: &str = super::donation_status::PENDING;
    pub const CONTACT_PREFERENCE: &str = "email";
    pub const ACCOMMODATION_NEEDED: bool = false;
    pub const TRANSPORT_NEEDED: bool = false;
}

/// Body of `POST /api/donations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationSubmission {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    #[serde(default, deserialize_with = "coerce_amount")]
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub message: Option<String>,
    pub paystack_reference: Option<String>,
    pub status: Option<String>,
}

/// Body of `POST /api/pledges`. Any status sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PledgeSubmission {
    pub pledger_name: Option<String>,
    pub pledger_email: Option<String>,
    pub pledger_phone: Option<String>,
    #[serde(default, deserialize_with = "coerce_amount")]
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub message: Option<String>,
}

/// Body of `POST /api/support-offers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupportOfferSubmission {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub support_type: Option<String>,
    pub description: Option<String>,
    pub availability: Option<String>,
    pub contact_preference: Option<String>,
    pub phone: Option<String>,
}

/// Body of `POST /api/guest-information`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestInformationSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub accessibility_needs: Option<String>,
    pub plus_one_name: Option<String>,
    pub plus_one_dietary: Option<String>,
    pub special_requests: Option<String>,
    pub accommodation_needed: Option<bool>,
    pub transport_needed: Option<bool>,
}

/// A donation ready to be written. Required columns stay `Option` so the
/// store, not this layer, decides whether the write is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: Option<i64>,
    pub currency: String,
    pub category: Option<String>,
    pub message: Option<String>,
    pub paystack_reference: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPledge {
    pub pledger_name: Option<String>,
    pub pledger_email: Option<String>,
    pub pledger_phone: Option<String>,
    pub amount: Option<i64>,
    pub currency: String,
    pub category: Option<String>,
    pub message: Option<String>,
    pub status: PledgeStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupportOffer {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub support_type: Option<String>,
    pub description: Option<String>,
    pub availability: Option<String>,
    pub contact_preference: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGuestInformation {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub accessibility_needs: Option<String>,
    pub plus_one_name: Option<String>,
    pub plus_one_dietary: Option<String>,
    pub special_requests: Option<String>,
    pub accommodation_needed: bool,
    pub transport_needed: bool,
}

impl From<DonationSubmission> for NewDonation {
    fn from(s: DonationSubmission) -> Self {
        Self {
            donor_name: s.donor_name,
            donor_email: s.donor_email,
            amount: s.amount,
            currency: or_default(s.currency, defaults::CURRENCY),
            category: s.category,
            message: s.message,
            paystack_reference: s.paystack_reference,
            status: or_default(s.status, defaults::DONATION_STATUS),
        }
    }
}

impl From<PledgeSubmission> for NewPledge {
    fn from(s: PledgeSubmission) -> Self {
        Self {
            pledger_name: s.pledger_name,
            pledger_email: s.pledger_email,
            pledger_phone: s.pledger_phone,
            amount: s.amount,
            currency: or_default(s.currency, defaults::CURRENCY),
            category: s.category,
            message: s.message,
            status: PledgeStatus::Pending,
        }
    }
}

impl From<SupportOfferSubmission> for NewSupportOffer {
    fn from(s: SupportOfferSubmission) -> Self {
        Self {
            guest_name: s.guest_name,
            guest_email: s.guest_email,
            support_type: s.support_type,
            description: s.description,
            availability: s.availability,
            contact_preference: or_default(s.contact_preference, defaults::CONTACT_PREFERENCE),
            phone: s.phone,
        }
    }
}

impl From<GuestInformationSubmission> for NewGuestInformation {
    fn from(s: GuestInformationSubmission) -> Self {
        Self {
            full_name: s.full_name,
            email: s.email,
            phone: s.phone,
            dietary_restrictions: s.dietary_restrictions,
            accessibility_needs: s.accessibility_needs,
            plus_one_name: s.plus_one_name,
            plus_one_dietary: s.plus_one_dietary,
            special_requests: s.special_requests,
            accommodation_needed: s.accommodation_needed.unwrap_or(defaults::ACCOMMODATION_NEEDED),
            transport_needed: s.transport_needed.unwrap_or(defaults::TRANSPORT_NEEDED),
        }
    }
}

/// Absent and empty strings both fall back to the default.
fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

/// Largest amount a record can carry; the store column is a 32-bit integer.
pub const MAX_AMOUNT: i64 = i32::MAX as i64;

/// Integer coercion for `amount`: integers pass through, floats are rounded,
/// numeric strings are parsed. Anything else, including values outside the
/// 32-bit column range, becomes `None` so the store rejects the write.
pub fn amount_from_json(value: &Value) -> Option<i64> {
    let amount = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_float)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(round_float))
        }
        _ => None,
    }?;
    i32::try_from(amount).ok().map(i64::from)
}

fn round_float(f: f64) -> Option<i64> {
    let rounded = f.round();
    if rounded.is_finite() && rounded.abs() <= MAX_AMOUNT as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

fn coerce_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(amount_from_json))
}
