//! Request logging and CORS for the registry API.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;

/// Access log: remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn standard_middleware() -> Logger {
    Logger::default()
}

// The front-end may be served from a different origin than the API
// (e.g. the Vite dev server), so any origin is accepted.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}
