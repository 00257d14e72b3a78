//! # wr-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `wr-core` domain models.

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;
use wr_core::models::{Donation, GuestInformation, Pledge, PledgeStatus, SupportOffer};
use wr_core::submissions::{NewDonation, NewGuestInformation, NewPledge, NewSupportOffer};
use wr_core::traits::RecordStore;

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Opens (creating if needed) the database and applies pending migrations.
    ///
    /// # Developer Note
    /// Every connection to `sqlite::memory:` gets its own private database, so
    /// in-memory stores are pinned to a single long-lived connection.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url `{database_url}`"))?
            .create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("connecting to sqlite")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running sqlite migrations")?;

        log::info!("SQLite record store ready at {}", database_url);
        Ok(Self { pool })
    }
}

// Helper for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Result<Uuid, sqlx::Error> {
    Uuid::from_slice(blob).map_err(|e| sqlx::Error::ColumnDecode {
        index: "id".to_string(),
        source: Box::new(e),
    })
}

fn donation_from_row(row: &SqliteRow) -> Result<Donation, sqlx::Error> {
    Ok(Donation {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        donor_name: row.try_get("donor_name")?,
        donor_email: row.try_get("donor_email")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        category: row.try_get("category")?,
        message: row.try_get("message")?,
        paystack_reference: row.try_get("paystack_reference")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn pledge_from_row(row: &SqliteRow) -> Result<Pledge, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Pledge {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        pledger_name: row.try_get("pledger_name")?,
        pledger_email: row.try_get("pledger_email")?,
        pledger_phone: row.try_get("pledger_phone")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        category: row.try_get("category")?,
        message: row.try_get("message")?,
        status: status.parse::<PledgeStatus>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: e.into(),
        })?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn support_offer_from_row(row: &SqliteRow) -> Result<SupportOffer, sqlx::Error> {
    Ok(SupportOffer {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        guest_name: row.try_get("guest_name")?,
        guest_email: row.try_get("guest_email")?,
        support_type: row.try_get("support_type")?,
        description: row.try_get("description")?,
        availability: row.try_get("availability")?,
        contact_preference: row.try_get("contact_preference")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn guest_information_from_row(row: &SqliteRow) -> Result<GuestInformation, sqlx::Error> {
    Ok(GuestInformation {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        dietary_restrictions: row.try_get("dietary_restrictions")?,
        accessibility_needs: row.try_get("accessibility_needs")?,
        plus_one_name: row.try_get("plus_one_name")?,
        plus_one_dietary: row.try_get("plus_one_dietary")?,
        special_requests: row.try_get("special_requests")?,
        accommodation_needed: row.try_get("accommodation_needed")?,
        transport_needed: row.try_get("transport_needed")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    /// Inserts and reads the row back in one statement, so the caller sees
    /// exactly what was stored.
    async fn create_donation(&self, donation: NewDonation) -> anyhow::Result<Donation> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO donations (id, donor_name, donor_email, amount, currency, category, message, paystack_reference, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(uuid_to_blob(Uuid::now_v7()))
        .bind(donation.donor_name)
        .bind(donation.donor_email)
        .bind(donation.amount)
        .bind(donation.currency)
        .bind(donation.category)
        .bind(donation.message)
        .bind(donation.paystack_reference)
        .bind(donation.status)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("inserting donation")?;

        Ok(donation_from_row(&row)?)
    }

    async fn list_donations(&self) -> anyhow::Result<Vec<Donation>> {
        let rows = sqlx::query("SELECT * FROM donations ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .context("listing donations")?;

        Ok(rows.iter().map(donation_from_row).collect::<Result<_, _>>()?)
    }

    async fn list_donations_with_status(&self, status: &str) -> anyhow::Result<Vec<Donation>> {
        let rows = sqlx::query("SELECT * FROM donations WHERE status = ? ORDER BY created_at ASC, id ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .context("listing donations by status")?;

        Ok(rows.iter().map(donation_from_row).collect::<Result<_, _>>()?)
    }

    async fn create_pledge(&self, pledge: NewPledge) -> anyhow::Result<Pledge> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO pledges (id, pledger_name, pledger_email, pledger_phone, amount, currency, category, message, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(uuid_to_blob(Uuid::now_v7()))
        .bind(pledge.pledger_name)
        .bind(pledge.pledger_email)
        .bind(pledge.pledger_phone)
        .bind(pledge.amount)
        .bind(pledge.currency)
        .bind(pledge.category)
        .bind(pledge.message)
        .bind(pledge.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("inserting pledge")?;

        Ok(pledge_from_row(&row)?)
    }

    async fn list_pledges(&self) -> anyhow::Result<Vec<Pledge>> {
        let rows = sqlx::query("SELECT * FROM pledges ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .context("listing pledges")?;

        Ok(rows.iter().map(pledge_from_row).collect::<Result<_, _>>()?)
    }

    async fn list_pledges_with_status(&self, status: PledgeStatus) -> anyhow::Result<Vec<Pledge>> {
        let rows = sqlx::query("SELECT * FROM pledges WHERE status = ? ORDER BY created_at ASC, id ASC")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .context("listing pledges by status")?;

        Ok(rows.iter().map(pledge_from_row).collect::<Result<_, _>>()?)
    }

    async fn create_support_offer(&self, offer: NewSupportOffer) -> anyhow::Result<SupportOffer> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO support_offers (id, guest_name, guest_email, support_type, description, availability, contact_preference, phone, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(uuid_to_blob(Uuid::now_v7()))
        .bind(offer.guest_name)
        .bind(offer.guest_email)
        .bind(offer.support_type)
        .bind(offer.description)
        .bind(offer.availability)
        .bind(offer.contact_preference)
        .bind(offer.phone)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("inserting support offer")?;

        Ok(support_offer_from_row(&row)?)
    }

    async fn list_support_offers(&self) -> anyhow::Result<Vec<SupportOffer>> {
        let rows = sqlx::query("SELECT * FROM support_offers ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .context("listing support offers")?;

        Ok(rows.iter().map(support_offer_from_row).collect::<Result<_, _>>()?)
    }

    async fn create_guest_information(&self, guest: NewGuestInformation) -> anyhow::Result<GuestInformation> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO guest_information (id, full_name, email, phone, dietary_restrictions, accessibility_needs, plus_one_name, plus_one_dietary, special_requests, accommodation_needed, transport_needed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(uuid_to_blob(Uuid::now_v7()))
        .bind(guest.full_name)
        .bind(guest.email)
        .bind(guest.phone)
        .bind(guest.dietary_restrictions)
        .bind(guest.accessibility_needs)
        .bind(guest.plus_one_name)
        .bind(guest.plus_one_dietary)
        .bind(guest.special_requests)
        .bind(guest.accommodation_needed)
        .bind(guest.transport_needed)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("inserting guest information")?;

        Ok(guest_information_from_row(&row)?)
    }
}
