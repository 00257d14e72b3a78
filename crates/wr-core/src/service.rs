//! # Submission & Aggregation Services
//!
//! Orchestrates store writes, mirror side effects and progress totals.
//!
//! Ordering is fixed: the store write commits first, then the mirror is
//! awaited. A mirror failure is logged and swallowed; the store is the
//! record of truth and the caller still gets the stored entity back.

use crate::error::{AppError, Result};
use crate::models::{donation_status, Donation, GuestInformation, Pledge, PledgeStatus, SupportOffer};
use crate::submissions::{
    DonationSubmission, GuestInformationSubmission, PledgeSubmission, SupportOfferSubmission,
};
use crate::totals::CategoryTotals;
use crate::traits::{LedgerMirror, RecordStore};

/// Case-insensitive search for "gift" anywhere in the donor's message.
/// Decides whether a completed donation goes to the Gifts sheet.
pub fn is_gift(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.to_lowercase().contains("gift"))
}

pub async fn submit_donation(
    store: &dyn RecordStore,
    mirror: &dyn LedgerMirror,
    submission: DonationSubmission,
) -> Result<Donation> {
    let donation = store
        .create_donation(submission.into())
        .await
        .map_err(AppError::store)?;

    if donation.status == donation_status::COMPLETED {
        let mirrored = if is_gift(donation.message.as_deref()) {
            mirror.record_gift(&donation).await
        } else {
            mirror.record_donation(&donation).await
        };
        if let Err(e) = mirrored {
            log::warn!("Donation {} saved to database, but sheet mirror failed: {}", donation.id, e);
        }
    }

    Ok(donation)
}

pub async fn submit_pledge(
    store: &dyn RecordStore,
    mirror: &dyn LedgerMirror,
    submission: PledgeSubmission,
) -> Result<Pledge> {
    let pledge = store
        .create_pledge(submission.into())
        .await
        .map_err(AppError::store)?;

    if let Err(e) = mirror.record_monetary_pledge(&pledge).await {
        log::warn!("Pledge {} saved to database, but sheet mirror failed: {}", pledge.id, e);
    }

    Ok(pledge)
}

pub async fn submit_support_offer(
    store: &dyn RecordStore,
    mirror: &dyn LedgerMirror,
    submission: SupportOfferSubmission,
) -> Result<SupportOffer> {
    let offer = store
        .create_support_offer(submission.into())
        .await
        .map_err(AppError::store)?;

    if let Err(e) = mirror.record_support_offer(&offer).await {
        log::warn!("Support offer {} saved to database, but sheet mirror failed: {}", offer.id, e);
    }

    Ok(offer)
}

/// Guest information is never mirrored.
pub async fn submit_guest_information(
    store: &dyn RecordStore,
    submission: GuestInformationSubmission,
) -> Result<GuestInformation> {
    store
        .create_guest_information(submission.into())
        .await
        .map_err(AppError::store)
}

/// Totals over completed donations only.
pub async fn donation_totals(store: &dyn RecordStore) -> Result<CategoryTotals> {
    let donations = store
        .list_donations_with_status(donation_status::COMPLETED)
        .await
        .map_err(AppError::store)?;

    let totals = CategoryTotals::tally(donations.iter().map(|d| (d.category.as_str(), d.amount)));
    log::debug!("Donation totals over {} records: {:?}", donations.len(), totals);
    Ok(totals)
}

/// Totals over pending pledges only. Pledges moved to any later status drop
/// out of this figure.
pub async fn pledge_totals(store: &dyn RecordStore) -> Result<CategoryTotals> {
    let pledges = store
        .list_pledges_with_status(PledgeStatus::Pending)
        .await
        .map_err(AppError::store)?;

    let totals = CategoryTotals::tally(pledges.iter().map(|p| (p.category.as_str(), p.amount)));
    log::debug!("Pledge totals over {} records: {:?}", pledges.len(), totals);
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockLedgerMirror, MockRecordStore};
    use chrono::Utc;
    use uuid::Uuid;

    fn stored_donation(status: &str, message: Option<&str>, category: &str, amount: i64) -> Donation {
        let now = Utc::now();
        Donation {
            id: Uuid::now_v7(),
            donor_name: "Guest".into(),
            donor_email: "guest@example.com".into(),
            amount,
            currency: "KES".into(),
            category: category.into(),
            message: message.map(String::from),
            paystack_reference: None,
            status: status.into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn echo_store(message: Option<&'static str>, status: &'static str) -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store
            .expect_create_donation()
            .times(1)
            .returning(move |_| Ok(stored_donation(status, message, "pastry", 1000)));
        store
    }

    #[test]
    fn gift_heuristic_is_case_insensitive_substring() {
        assert!(is_gift(Some("This is our gift to you!")));
        assert!(is_gift(Some("GIFTED with love")));
        assert!(!is_gift(Some("Happy for you both")));
        assert!(!is_gift(None));
    }

    #[tokio::test]
    async fn completed_gift_message_routes_to_gift_sheet() {
        let store = echo_store(Some("This is our gift to you!"), "completed");
        let mut mirror = MockLedgerMirror::new();
        mirror.expect_record_gift().times(1).returning(|_| Ok(()));
        mirror.expect_record_donation().times(0);

        let submission = DonationSubmission {
            status: Some("completed".into()),
            ..Default::default()
        };
        submit_donation(&store, &mirror, submission).await.unwrap();
    }

    #[tokio::test]
    async fn completed_plain_message_routes_to_donation_sheet() {
        let store = echo_store(Some("Happy for you both"), "completed");
        let mut mirror = MockLedgerMirror::new();
        mirror.expect_record_donation().times(1).returning(|_| Ok(()));
        mirror.expect_record_gift().times(0);

        submit_donation(&store, &mirror, DonationSubmission::default()).await.unwrap();
    }

    #[tokio::test]
    async fn pending_donation_is_not_mirrored() {
        let store = echo_store(Some("a gift"), "pending");
        let mut mirror = MockLedgerMirror::new();
        mirror.expect_record_donation().times(0);
        mirror.expect_record_gift().times(0);

        let donation = submit_donation(&store, &mirror, DonationSubmission::default()).await.unwrap();
        assert_eq!(donation.status, "pending");
    }

    #[tokio::test]
    async fn mirror_failure_does_not_fail_submission() {
        let store = echo_store(None, "completed");
        let mut mirror = MockLedgerMirror::new();
        mirror
            .expect_record_donation()
            .times(1)
            .returning(|_| Err(AppError::Mirror("invalid credentials".into())));

        let result = submit_donation(&store, &mirror, DonationSubmission::default()).await;
        assert!(result.is_ok());
    }

    fn pledge_store() -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store.expect_create_pledge().times(1).returning(|new| {
            let now = Utc::now();
            Ok(Pledge {
                id: Uuid::now_v7(),
                pledger_name: new.pledger_name.unwrap_or_default(),
                pledger_email: new.pledger_email.unwrap_or_default(),
                pledger_phone: new.pledger_phone,
                amount: new.amount.unwrap_or_default(),
                currency: new.currency,
                category: new.category.unwrap_or_default(),
                message: new.message,
                status: new.status,
                created_at: now,
                updated_at: now,
            })
        });
        store
    }

    #[tokio::test]
    async fn stored_pledge_is_mirrored_once() {
        let store = pledge_store();
        let mut mirror = MockLedgerMirror::new();
        mirror
            .expect_record_monetary_pledge()
            .withf(|p| p.pledger_name == "Jane" && p.amount == 5000 && p.status == PledgeStatus::Pending)
            .times(1)
            .returning(|_| Ok(()));

        let submission = PledgeSubmission {
            pledger_name: Some("Jane".into()),
            pledger_email: Some("jane@x.com".into()),
            amount: Some(5000),
            category: Some("pastry".into()),
            ..Default::default()
        };
        let pledge = submit_pledge(&store, &mirror, submission).await.unwrap();
        assert_eq!(pledge.currency, "KES");
    }

    #[tokio::test]
    async fn pledge_mirror_failure_still_returns_the_pledge() {
        let store = pledge_store();
        let mut mirror = MockLedgerMirror::new();
        mirror
            .expect_record_monetary_pledge()
            .times(1)
            .returning(|_| Err(AppError::Mirror("quota exceeded".into())));

        let pledge = submit_pledge(&store, &mirror, PledgeSubmission::default()).await.unwrap();
        assert_eq!(pledge.status, PledgeStatus::Pending);
    }

    #[tokio::test]
    async fn store_failure_skips_mirror_and_surfaces() {
        let mut store = MockRecordStore::new();
        store
            .expect_create_pledge()
            .returning(|_| Err(anyhow::anyhow!("NOT NULL constraint failed: pledges.pledger_name")));
        let mut mirror = MockLedgerMirror::new();
        mirror.expect_record_monetary_pledge().times(0);

        let err = submit_pledge(&store, &mirror, PledgeSubmission::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Store(msg) if msg.contains("NOT NULL")));
    }

    #[tokio::test]
    async fn donation_totals_query_completed_records() {
        let mut store = MockRecordStore::new();
        store
            .expect_list_donations_with_status()
            .withf(|status| status.to_string() == donation_status::COMPLETED)
            .returning(|_| {
                Ok(vec![
                    stored_donation("completed", None, "styling", 1000),
                    stored_donation("completed", None, "styling", 2000),
                    stored_donation("completed", None, "flowers", 700),
                ])
            });

        let totals = donation_totals(&store).await.unwrap();
        assert_eq!(totals.styling, 3000);
        assert_eq!(totals.sum(), 3000);
    }

    #[tokio::test]
    async fn pledge_totals_query_pending_records() {
        let mut store = MockRecordStore::new();
        store
            .expect_list_pledges_with_status()
            .withf(|status| *status == PledgeStatus::Pending)
            .returning(|_| Ok(vec![]));

        assert_eq!(pledge_totals(&store).await.unwrap(), CategoryTotals::default());
    }
}
