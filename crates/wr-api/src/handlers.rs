//! # wr-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! services. Store failures become a generic 500 body; the underlying cause
//! only goes to the log.

use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use chrono::Utc;
use serde_json::json;
use wr_core::error::{AppError, Result};
use wr_core::models::{Donation, Pledge, SupportOffer};
use wr_core::service;
use wr_core::submissions::{
    DonationSubmission, GuestInformationSubmission, PledgeSubmission, SupportOfferSubmission,
};
use wr_core::totals::CategoryTotals;
use wr_core::traits::{LedgerMirror, RecordStore};
use wr_ui::AdminTemplate;

use crate::export;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub store: Box<dyn RecordStore>,
    pub mirror: Box<dyn LedgerMirror>,
}

fn failure(action: &str, err: AppError) -> HttpResponse {
    log::error!("Failed to {}: {}", action, err);
    HttpResponse::InternalServerError().json(json!({ "error": format!("Failed to {action}") }))
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "OK", "message": "Server is running" }))
}

pub async fn api_not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({ "error": "API endpoint not found" }))
}

// --- Donations ---

pub async fn list_donations(data: web::Data<AppState>) -> HttpResponse {
    match data.store.list_donations().await {
        Ok(donations) => {
            log::info!("Fetched {} donations", donations.len());
            HttpResponse::Ok().json(donations)
        }
        Err(e) => failure("fetch donations", AppError::store(e)),
    }
}

pub async fn donation_amounts(data: web::Data<AppState>) -> HttpResponse {
    match service::donation_totals(data.store.as_ref()).await {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(e) => failure("fetch donation amounts", e),
    }
}

pub async fn create_donation(
    data: web::Data<AppState>,
    body: web::Json<DonationSubmission>,
) -> HttpResponse {
    match service::submit_donation(data.store.as_ref(), data.mirror.as_ref(), body.into_inner()).await {
        Ok(donation) => {
            log::info!("Donation {} recorded ({} {}, {})", donation.id, donation.amount, donation.currency, donation.status);
            HttpResponse::Ok().json(donation)
        }
        Err(e) => failure("create donation", e),
    }
}

// --- Pledges ---

pub async fn list_pledges(data: web::Data<AppState>) -> HttpResponse {
    match data.store.list_pledges().await {
        Ok(pledges) => {
            log::info!("Fetched {} pledges", pledges.len());
            HttpResponse::Ok().json(pledges)
        }
        Err(e) => failure("fetch pledges", AppError::store(e)),
    }
}

pub async fn pledge_amounts(data: web::Data<AppState>) -> HttpResponse {
    match service::pledge_totals(data.store.as_ref()).await {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(e) => failure("fetch pledge amounts", e),
    }
}

pub async fn create_pledge(
    data: web::Data<AppState>,
    body: web::Json<PledgeSubmission>,
) -> HttpResponse {
    match service::submit_pledge(data.store.as_ref(), data.mirror.as_ref(), body.into_inner()).await {
        Ok(pledge) => {
            log::info!("Pledge {} recorded ({} {})", pledge.id, pledge.amount, pledge.currency);
            HttpResponse::Ok().json(pledge)
        }
        Err(e) => failure("create pledge", e),
    }
}

// --- Support offers ---

pub async fn list_support_offers(data: web::Data<AppState>) -> HttpResponse {
    match data.store.list_support_offers().await {
        Ok(offers) => {
            log::info!("Fetched {} support offers", offers.len());
            HttpResponse::Ok().json(offers)
        }
        Err(e) => failure("fetch support offers", AppError::store(e)),
    }
}

pub async fn create_support_offer(
    data: web::Data<AppState>,
    body: web::Json<SupportOfferSubmission>,
) -> HttpResponse {
    match service::submit_support_offer(data.store.as_ref(), data.mirror.as_ref(), body.into_inner()).await {
        Ok(offer) => {
            log::info!("Support offer {} recorded ({})", offer.id, offer.support_type);
            HttpResponse::Ok().json(offer)
        }
        Err(e) => failure("create support offer", e),
    }
}

// --- Guest information ---

pub async fn create_guest_information(
    data: web::Data<AppState>,
    body: web::Json<GuestInformationSubmission>,
) -> HttpResponse {
    match service::submit_guest_information(data.store.as_ref(), body.into_inner()).await {
        Ok(guest) => {
            log::info!("Guest information {} recorded", guest.id);
            HttpResponse::Ok().json(guest)
        }
        Err(e) => failure("create guest information", e),
    }
}

// --- Admin ---

struct Snapshot {
    donations: Vec<Donation>,
    pledges: Vec<Pledge>,
    support_offers: Vec<SupportOffer>,
    donation_totals: CategoryTotals,
    pledge_totals: CategoryTotals,
}

async fn snapshot(store: &dyn RecordStore) -> Result<Snapshot> {
    Ok(Snapshot {
        donations: store.list_donations().await.map_err(AppError::store)?,
        pledges: store.list_pledges().await.map_err(AppError::store)?,
        support_offers: store.list_support_offers().await.map_err(AppError::store)?,
        donation_totals: service::donation_totals(store).await?,
        pledge_totals: service::pledge_totals(store).await?,
    })
}

/// Renders the organisers' dashboard (`/admin`).
pub async fn admin_dashboard(data: web::Data<AppState>) -> HttpResponse {
    let snap = match snapshot(data.store.as_ref()).await {
        Ok(snap) => snap,
        Err(e) => return failure("load dashboard", e),
    };

    let page = AdminTemplate::new(
        &snap.donations,
        &snap.pledges,
        &snap.support_offers,
        snap.donation_totals,
        snap.pledge_totals,
    );

    match page.render() {
        Ok(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
        Err(e) => {
            log::error!("Template rendering failed: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn csv_attachment(kind: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export::attachment_name(
                kind,
                Utc::now().date_naive(),
            ))],
        })
        .body(body)
}

pub async fn export_donations(data: web::Data<AppState>) -> HttpResponse {
    match data.store.list_donations().await {
        Ok(donations) => csv_attachment("donations", export::donations_csv(&donations)),
        Err(e) => failure("export donations", AppError::store(e)),
    }
}

pub async fn export_pledges(data: web::Data<AppState>) -> HttpResponse {
    match data.store.list_pledges().await {
        Ok(pledges) => csv_attachment("pledges", export::pledges_csv(&pledges)),
        Err(e) => failure("export pledges", AppError::store(e)),
    }
}

pub async fn export_support_offers(data: web::Data<AppState>) -> HttpResponse {
    match data.store.list_support_offers().await {
        Ok(offers) => csv_attachment("support_offers", export::support_offers_csv(&offers)),
        Err(e) => failure("export support offers", AppError::store(e)),
    }
}
