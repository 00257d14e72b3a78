//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::error::Result;
use crate::models::{Donation, GuestInformation, Pledge, PledgeStatus, SupportOffer};
use crate::submissions::{NewDonation, NewGuestInformation, NewPledge, NewSupportOffer};

/// Data persistence contract for the four guest-facing collections.
///
/// The store owns identity and timestamps: every `create_*` assigns a fresh
/// id plus `created_at`/`updated_at` and returns the row as stored.
/// List operations return records in creation order.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    // Donation Operations
    async fn create_donation(&self, donation: NewDonation) -> anyhow::Result<Donation>;
    async fn list_donations(&self) -> anyhow::Result<Vec<Donation>>;
    async fn list_donations_with_status(&self, status: &str) -> anyhow::Result<Vec<Donation>>;

    // Pledge Operations
    async fn create_pledge(&self, pledge: NewPledge) -> anyhow::Result<Pledge>;
    async fn list_pledges(&self) -> anyhow::Result<Vec<Pledge>>;
    async fn list_pledges_with_status(&self, status: PledgeStatus) -> anyhow::Result<Vec<Pledge>>;

    // Support Offer Operations
    async fn create_support_offer(&self, offer: NewSupportOffer) -> anyhow::Result<SupportOffer>;
    async fn list_support_offers(&self) -> anyhow::Result<Vec<SupportOffer>>;

    // Guest Information (write-only)
    async fn create_guest_information(&self, guest: NewGuestInformation) -> anyhow::Result<GuestInformation>;
}

/// Best-effort replication of completed writes to the organisers' spreadsheet.
///
/// Each call appends exactly one row. Implementations report failure through
/// the returned `Result`; callers log it and carry on.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LedgerMirror: Send + Sync {
    async fn record_support_offer(&self, offer: &SupportOffer) -> Result<()>;
    async fn record_donation(&self, donation: &Donation) -> Result<()>;
    async fn record_gift(&self, donation: &Donation) -> Result<()>;
    async fn record_monetary_pledge(&self, pledge: &Pledge) -> Result<()>;
}
