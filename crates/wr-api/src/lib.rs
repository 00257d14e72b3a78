//! # wr-api
//!
//! The web routing and orchestration layer for the wedding registry.

pub mod export;
pub mod handlers;
pub mod middleware;

use actix_web::{error, web, HttpResponse, Resource};
use serde_json::json;

/// Malformed JSON bodies get a JSON 400 instead of actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("Rejected request body: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

/// An `/api` resource whose unmatched methods get the same JSON 404 as
/// unknown paths, rather than a bare 405.
fn api_resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(handlers::api_not_found))
}

/// Mounts `/api/*` and `/admin/*`.
///
/// # Developer Note
/// The static front-end is mounted by the binary *after* this, so any
/// `/api/*` path not matched here must be caught by the scope's default
/// service rather than falling through to `index.html`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .service(api_resource("/health").route(web::get().to(handlers::health)))
            .service(
                api_resource("/donations")
                    .route(web::get().to(handlers::list_donations))
                    .route(web::post().to(handlers::create_donation)),
            )
            .service(api_resource("/donations/amounts").route(web::get().to(handlers::donation_amounts)))
            .service(
                api_resource("/pledges")
                    .route(web::get().to(handlers::list_pledges))
                    .route(web::post().to(handlers::create_pledge)),
            )
            .service(api_resource("/pledges/amounts").route(web::get().to(handlers::pledge_amounts)))
            .service(
                api_resource("/support-offers")
                    .route(web::get().to(handlers::list_support_offers))
                    .route(web::post().to(handlers::create_support_offer)),
            )
            .service(api_resource("/guest-information").route(web::post().to(handlers::create_guest_information)))
            .default_service(web::to(handlers::api_not_found)),
    )
    .service(
        web::scope("/admin")
            .route("", web::get().to(handlers::admin_dashboard))
            .route("/", web::get().to(handlers::admin_dashboard))
            .route("/export/donations.csv", web::get().to(handlers::export_donations))
            .route("/export/pledges.csv", web::get().to(handlers::export_pledges))
            .route("/export/support-offers.csv", web::get().to(handlers::export_support_offers)),
    );
}
