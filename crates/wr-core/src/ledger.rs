//! # Ledger Rows
//!
//! Column layouts of the spreadsheet the organisers read. The sheets already
//! carry header rows, so the order of values here is a wire format: append
//! only, never reorder.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::models::{Donation, Pledge, SupportOffer};
use crate::traits::LedgerMirror;

pub const SUPPORT_OFFER_RANGE: &str = "Pledges!A:H";
pub const DONATION_RANGE: &str = "Donations!A:I";
pub const GIFT_RANGE: &str = "Gifts!A:I";
pub const MONETARY_PLEDGE_RANGE: &str = "Pledges!A:H";

/// One row destined for a fixed range of the ledger spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub range: &'static str,
    pub values: Vec<Value>,
}

impl LedgerRow {
    /// Timestamp, guest fields in form order, contact preference last.
    pub fn support_offer(offer: &SupportOffer, at: DateTime<Utc>) -> Self {
        Self {
            range: SUPPORT_OFFER_RANGE,
            values: vec![
                timestamp(at),
                Value::from(offer.guest_name.as_str()),
                Value::from(offer.guest_email.as_str()),
                text_or_blank(&offer.phone),
                Value::from(offer.support_type.as_str()),
                Value::from(offer.description.as_str()),
                text_or_blank(&offer.availability),
                Value::from(offer.contact_preference.as_str()),
            ],
        }
    }

    pub fn donation(donation: &Donation, at: DateTime<Utc>) -> Self {
        Self {
            range: DONATION_RANGE,
            values: payment_values(donation, at, "Completed"),
        }
    }

    pub fn gift(donation: &Donation, at: DateTime<Utc>) -> Self {
        Self {
            range: GIFT_RANGE,
            values: payment_values(donation, at, "Gift"),
        }
    }

    /// Amount and currency share one cell, e.g. `"5000 KES"`.
    pub fn monetary_pledge(pledge: &Pledge, at: DateTime<Utc>) -> Self {
        Self {
            range: MONETARY_PLEDGE_RANGE,
            values: vec![
                timestamp(at),
                Value::from(pledge.pledger_name.as_str()),
                Value::from(pledge.pledger_email.as_str()),
                text_or_blank(&pledge.pledger_phone),
                Value::from(format!("{} {}", pledge.amount, pledge.currency)),
                Value::from(pledge.category.as_str()),
                text_or_blank(&pledge.message),
                Value::from("MONETARY_PLEDGE"),
            ],
        }
    }
}

fn payment_values(donation: &Donation, at: DateTime<Utc>, marker: &str) -> Vec<Value> {
    vec![
        timestamp(at),
        Value::from(donation.donor_name.as_str()),
        Value::from(donation.donor_email.as_str()),
        Value::from(donation.amount),
        Value::from(donation.currency.as_str()),
        Value::from(donation.category.as_str()),
        text_or_blank(&donation.message),
        text_or_blank(&donation.paystack_reference),
        Value::from(marker),
    ]
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::from(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn text_or_blank(value: &Option<String>) -> Value {
    Value::from(value.as_deref().unwrap_or(""))
}

/// Mirror used when the binary is built without a sheet backend.
/// Accepts every record and writes nothing.
pub struct NoopMirror;

#[async_trait]
impl LedgerMirror for NoopMirror {
    async fn record_support_offer(&self, offer: &SupportOffer) -> Result<()> {
        log::debug!("Ledger mirror disabled; skipping support offer {}", offer.id);
        Ok(())
    }

    async fn record_donation(&self, donation: &Donation) -> Result<()> {
        log::debug!("Ledger mirror disabled; skipping donation {}", donation.id);
        Ok(())
    }

    async fn record_gift(&self, donation: &Donation) -> Result<()> {
        log::debug!("Ledger mirror disabled; skipping gift {}", donation.id);
        Ok(())
    }

    async fn record_monetary_pledge(&self, pledge: &Pledge) -> Result<()> {
        log::debug!("Ledger mirror disabled; skipping pledge {}", pledge.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PledgeStatus;
    use chrono::TimeZone;
    use serde_json::json;
    use uuid::Uuid;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()
    }

    fn donation(message: Option<&str>) -> Donation {
        Donation {
            id: Uuid::now_v7(),
            donor_name: "Mwangi".into(),
            donor_email: "mwangi@example.com".into(),
            amount: 3000,
            currency: "KES".into(),
            category: "entertainment".into(),
            message: message.map(String::from),
            paystack_reference: None,
            status: "completed".into(),
            created_at: at(),
            updated_at: at(),
        }
    }

    #[test]
    fn donation_row_ends_with_completed_marker() {
        let row = LedgerRow::donation(&donation(Some("Cheers")), at());
        assert_eq!(row.range, "Donations!A:I");
        assert_eq!(
            row.values,
            vec![
                json!("2025-06-14T09:30:00.000Z"),
                json!("Mwangi"),
                json!("mwangi@example.com"),
                json!(3000),
                json!("KES"),
                json!("entertainment"),
                json!("Cheers"),
                json!(""),
                json!("Completed"),
            ]
        );
    }

    #[test]
    fn gift_row_goes_to_gift_sheet() {
        let row = LedgerRow::gift(&donation(None), at());
        assert_eq!(row.range, "Gifts!A:I");
        assert_eq!(row.values.len(), 9);
        assert_eq!(row.values[6], json!(""));
        assert_eq!(row.values[8], json!("Gift"));
    }

    #[test]
    fn monetary_pledge_row_joins_amount_and_currency() {
        let pledge = Pledge {
            id: Uuid::now_v7(),
            pledger_name: "Jane".into(),
            pledger_email: "jane@x.com".into(),
            pledger_phone: Some("+254700000000".into()),
            amount: 5000,
            currency: "KES".into(),
            category: "pastry".into(),
            message: None,
            status: PledgeStatus::Pending,
            created_at: at(),
            updated_at: at(),
        };

        let row = LedgerRow::monetary_pledge(&pledge, at());
        assert_eq!(row.range, "Pledges!A:H");
        assert_eq!(row.values[3], json!("+254700000000"));
        assert_eq!(row.values[4], json!("5000 KES"));
        assert_eq!(row.values[7], json!("MONETARY_PLEDGE"));
    }

    #[test]
    fn support_offer_row_keeps_form_order() {
        let offer = SupportOffer {
            id: Uuid::now_v7(),
            guest_name: "Njeri".into(),
            guest_email: "njeri@example.com".into(),
            support_type: "decor".into(),
            description: "Table flowers".into(),
            availability: None,
            contact_preference: "phone".into(),
            phone: None,
            created_at: at(),
            updated_at: at(),
        };

        let row = LedgerRow::support_offer(&offer, at());
        assert_eq!(row.range, "Pledges!A:H");
        assert_eq!(
            row.values[1..],
            [
                json!("Njeri"),
                json!("njeri@example.com"),
                json!(""),
                json!("decor"),
                json!("Table flowers"),
                json!(""),
                json!("phone"),
            ]
        );
    }
}
