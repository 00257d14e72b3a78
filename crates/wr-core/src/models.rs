//! # Domain Models
//!
//! These structs represent the stored entities of the wedding registry.
//! Identifiers are UUID v7 so that id order follows creation order.
//! Field names match the snake_case names guests submit, so a record
//! serializes back with the same keys it was created from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Status values observed on donations. The column is free text; only
/// `completed` donations count toward progress totals.
pub mod donation_status {
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";
}

/// One of the four wedding-expense buckets shown as progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pastry,
    PhotoVideo,
    Entertainment,
    Styling,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Pastry,
        Category::PhotoVideo,
        Category::Entertainment,
        Category::Styling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pastry => "pastry",
            Category::PhotoVideo => "photo_video",
            Category::Entertainment => "entertainment",
            Category::Styling => "styling",
        }
    }

    /// Exact, case-sensitive match against the stored tag.
    pub fn parse(raw: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed (or awaiting-confirmation) payment made through the checkout widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub donor_name: String,
    pub donor_email: String,
    /// Whole major currency units (e.g. shillings for KES)
    pub amount: i64,
    pub currency: String,
    /// Free text; only the four `Category` tags are aggregated
    pub category: String,
    pub message: Option<String>,
    /// Reference returned by the payment gateway, if any
    pub paystack_reference: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a pledge. Only `Pending` is ever written; the other states
/// exist for the follow-up process run outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PledgeStatus {
    Pending,
    Contacted,
    Fulfilled,
    Cancelled,
}

impl PledgeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PledgeStatus::Pending => "pending",
            PledgeStatus::Contacted => "contacted",
            PledgeStatus::Fulfilled => "fulfilled",
            PledgeStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PledgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PledgeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PledgeStatus::Pending),
            "contacted" => Ok(PledgeStatus::Contacted),
            "fulfilled" => Ok(PledgeStatus::Fulfilled),
            "cancelled" => Ok(PledgeStatus::Cancelled),
            other => Err(format!("unknown pledge status `{other}`")),
        }
    }
}

/// A promised future monetary contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pledge {
    pub id: Uuid,
    pub pledger_name: String,
    pub pledger_email: String,
    pub pledger_phone: Option<String>,
    /// Whole major currency units, same convention as `Donation::amount`
    pub amount: i64,
    pub currency: String,
    pub category: String,
    pub message: Option<String>,
    pub status: PledgeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A non-monetary offer of goods or services from a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportOffer {
    pub id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    /// Free-text tag chosen on the form (e.g. "decor", "transport")
    pub support_type: String,
    pub description: String,
    pub availability: Option<String>,
    pub contact_preference: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestInformation {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub accessibility_needs: Option<String>,
    pub plus_one_name: Option<String>,
    pub plus_one_dietary: Option<String>,
    pub special_requests: Option<String>,
    pub accommodation_needed: bool,
    pub transport_needed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_exact() {
        assert_eq!(Category::parse("photo_video"), Some(Category::PhotoVideo));
        assert_eq!(Category::parse("Pastry"), None);
        assert_eq!(Category::parse("flowers"), None);
    }

    #[test]
    fn pledge_status_round_trips_through_text() {
        for status in [
            PledgeStatus::Pending,
            PledgeStatus::Contacted,
            PledgeStatus::Fulfilled,
            PledgeStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<PledgeStatus>(), Ok(status));
        }
        assert!("lost".parse::<PledgeStatus>().is_err());
    }
}
