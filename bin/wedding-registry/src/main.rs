//! # Wedding Registry Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use std::path::PathBuf;
use wr_api::handlers::AppState;
use wr_api::middleware::{cors_policy, standard_middleware};
use wr_config::{SheetsSettings, Settings};
use wr_core::traits::LedgerMirror;

#[cfg(feature = "db-sqlite")]
use wr_db_sqlite::SqliteRecordStore;

#[cfg(feature = "sheets-google")]
use wr_sheets_google::{GoogleSheetsMirror, ServiceAccount, SheetTarget};

#[cfg(not(feature = "db-sqlite"))]
compile_error!("a record store backend is required: enable the `db-sqlite` feature");

#[cfg(feature = "sheets-google")]
fn build_mirror(sheets: SheetsSettings) -> Box<dyn LedgerMirror> {
    match (sheets.client_email, sheets.private_key, sheets.spreadsheet_id) {
        (Some(client_email), Some(private_key), Some(spreadsheet_id)) => {
            log::info!("Mirroring submissions to spreadsheet {}", spreadsheet_id);
            Box::new(GoogleSheetsMirror::new(
                ServiceAccount {
                    client_email,
                    private_key,
                    token_uri: sheets.token_uri,
                },
                SheetTarget {
                    api_base: sheets.api_base,
                    spreadsheet_id,
                },
            ))
        }
        _ => {
            log::warn!("Google Sheets credentials incomplete; submissions will be stored but not mirrored");
            Box::new(GoogleSheetsMirror::unconfigured())
        }
    }
}

#[cfg(not(feature = "sheets-google"))]
fn build_mirror(_sheets: SheetsSettings) -> Box<dyn LedgerMirror> {
    log::info!("Built without a sheet backend; mirroring disabled");
    Box::new(wr_core::ledger::NoopMirror)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load()?;
    let server = settings.server;

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let store = SqliteRecordStore::new(&settings.database.url).await?;

    // 2. Initialize Sheet Mirror Implementation
    let mirror = build_mirror(settings.sheets);

    // 3. Wrap in AppState (dynamic dispatch over the plugin traits)
    let state = web::Data::new(AppState {
        store: Box::new(store),
        mirror,
    });

    let static_dir = PathBuf::from(&server.static_dir);
    let index = static_dir.join("index.html");

    log::info!("🚀 Wedding registry running on http://{}:{}", server.host, server.port);
    log::info!("📱 Front-end served from {}", static_dir.display());
    log::info!("🔌 API endpoints available at http://{}:{}/api/*", server.host, server.port);

    HttpServer::new(move || {
        let index = index.clone();
        App::new()
            .app_data(state.clone())
            .wrap(cors_policy())
            .wrap(standard_middleware())
            .configure(wr_api::configure_routes)
            .service(
                Files::new("/", &static_dir)
                    .index_file("index.html")
                    // Client-side routes have no file on disk.
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let index = index.clone();
                        async move {
                            let (req, _) = req.into_parts();
                            let file = NamedFile::open_async(index).await?;
                            let res = file.into_response(&req);
                            Ok(ServiceResponse::new(req, res))
                        }
                    })),
            )
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await?;

    Ok(())
}
