//! CSV exports for the organisers.
//!
//! Header row is bare, every data cell is double-quoted with embedded quotes
//! doubled. Rows are joined with `\n`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use wr_core::models::{Donation, Pledge, SupportOffer};

pub const DONATION_HEADERS: [&str; 8] = [
    "Donor Name", "Email", "Amount (KSh)", "Category", "Message", "Reference", "Status", "Date",
];
pub const PLEDGE_HEADERS: [&str; 8] = [
    "Pledger Name", "Email", "Phone", "Amount (KSh)", "Category", "Message", "Status", "Date",
];
pub const SUPPORT_OFFER_HEADERS: [&str; 8] = [
    "Guest Name", "Email", "Phone", "Support Type", "Description", "Availability", "Contact Preference", "Date",
];

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn render<const N: usize>(headers: [&str; N], rows: impl Iterator<Item = [String; N]>) -> String {
    let mut out = headers.join(",");
    for row in rows {
        out.push('\n');
        let cells: Vec<String> = row.iter().map(|c| quote(c)).collect();
        out.push_str(&cells.join(","));
    }
    out
}

pub fn donations_csv(donations: &[Donation]) -> String {
    render(
        DONATION_HEADERS,
        donations.iter().map(|d| {
            [
                d.donor_name.clone(),
                d.donor_email.clone(),
                d.amount.to_string(),
                d.category.clone(),
                d.message.clone().unwrap_or_default(),
                d.paystack_reference.clone().unwrap_or_default(),
                d.status.clone(),
                date(d.created_at),
            ]
        }),
    )
}

pub fn pledges_csv(pledges: &[Pledge]) -> String {
    render(
        PLEDGE_HEADERS,
        pledges.iter().map(|p| {
            [
                p.pledger_name.clone(),
                p.pledger_email.clone(),
                p.pledger_phone.clone().unwrap_or_default(),
                p.amount.to_string(),
                p.category.clone(),
                p.message.clone().unwrap_or_default(),
                p.status.to_string(),
                date(p.created_at),
            ]
        }),
    )
}

pub fn support_offers_csv(offers: &[SupportOffer]) -> String {
    render(
        SUPPORT_OFFER_HEADERS,
        offers.iter().map(|s| {
            [
                s.guest_name.clone(),
                s.guest_email.clone(),
                s.phone.clone().unwrap_or_default(),
                s.support_type.clone(),
                s.description.clone(),
                s.availability.clone().unwrap_or_default(),
                s.contact_preference.clone(),
                date(s.created_at),
            ]
        }),
    )
}

/// `wedding_<kind>_<YYYY-MM-DD>.csv`
pub fn attachment_name(kind: &str, day: NaiveDate) -> String {
    format!("wedding_{}_{}.csv", kind, day.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wr_core::models::PledgeStatus;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 15, 30, 0).unwrap()
    }

    #[test]
    fn cells_are_quoted_and_quotes_doubled() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"cheese\", please"), "\"say \"\"cheese\"\", please\"");
    }

    #[test]
    fn empty_export_is_just_the_header() {
        assert_eq!(
            support_offers_csv(&[]),
            "Guest Name,Email,Phone,Support Type,Description,Availability,Contact Preference,Date"
        );
    }

    #[test]
    fn pledge_rows_fill_missing_optionals_with_empty_cells() {
        let pledge = Pledge {
            id: uuid::Uuid::nil(),
            pledger_name: "Jane".into(),
            pledger_email: "jane@x.com".into(),
            pledger_phone: None,
            amount: 5000,
            currency: "KES".into(),
            category: "pastry".into(),
            message: Some("Cake, \"three tiers\"".into()),
            status: PledgeStatus::Pending,
            created_at: at(),
            updated_at: at(),
        };

        let csv = pledges_csv(&[pledge]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"Jane\",\"jane@x.com\",\"\",\"5000\",\"pastry\",\"Cake, \"\"three tiers\"\"\",\"pending\",\"2025-06-14T15:30:00Z\""
        );
    }

    #[test]
    fn attachment_is_named_by_kind_and_day() {
        assert_eq!(
            attachment_name("support_offers", at().date_naive()),
            "wedding_support_offers_2025-06-14.csv"
        );
    }
}
