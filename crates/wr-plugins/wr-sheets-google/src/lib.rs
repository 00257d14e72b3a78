//! # wr-sheets-google
//!
//! Google Sheets implementation of `LedgerMirror`.
//!
//! Every append is self-contained: sign a service-account assertion, trade it
//! for an access token, append one row. No token is cached between calls;
//! mirror traffic is a handful of rows per day.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use wr_core::error::{AppError, Result};
use wr_core::ledger::LedgerRow;
use wr_core::models::{Donation, Pledge, SupportOffer};
use wr_core::traits::LedgerMirror;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("sheet mirror is not configured")]
    NotConfigured,

    #[error("signing service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("request to google failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Upstream {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
}

impl From<SheetsError> for AppError {
    fn from(err: SheetsError) -> Self {
        AppError::Mirror(err.to_string())
    }
}

/// Long-lived service-account credentials.
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: SecretString,
    pub token_uri: String,
}

/// Where rows go: the API root and the spreadsheet document id.
pub struct SheetTarget {
    pub api_base: String,
    pub spreadsheet_id: String,
}

/// Claims of the OAuth 2.0 JWT-bearer assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Signs the RS256 assertion Google's token endpoint expects.
pub fn sign_assertion(account: &ServiceAccount, now: DateTime<Utc>) -> std::result::Result<String, SheetsError> {
    let claims = AssertionClaims {
        iss: account.client_email.clone(),
        scope: SPREADSHEETS_SCOPE.to_string(),
        aud: account.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    };
    let key = EncodingKey::from_rsa_pem(account.private_key.expose_secret().as_bytes())?;
    Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

pub async fn fetch_access_token(
    client: &reqwest::Client,
    account: &ServiceAccount,
) -> std::result::Result<String, SheetsError> {
    let assertion = sign_assertion(account, Utc::now())?;

    let response = client
        .post(&account.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let token: TokenResponse = ensure_success(response, "token endpoint").await?.json().await?;
    Ok(token.access_token)
}

/// Authenticates and appends a single row with `valueInputOption=RAW`.
pub async fn append_row(
    client: &reqwest::Client,
    account: &ServiceAccount,
    target: &SheetTarget,
    row: &LedgerRow,
) -> std::result::Result<(), SheetsError> {
    let token = fetch_access_token(client, account).await?;

    let url = format!(
        "{}/spreadsheets/{}/values/{}:append",
        target.api_base.trim_end_matches('/'),
        target.spreadsheet_id,
        row.range
    );

    let response = client
        .post(url)
        .bearer_auth(token)
        .query(&[("valueInputOption", "RAW")])
        .json(&json!({ "values": [row.values] }))
        .send()
        .await?;

    ensure_success(response, "values.append").await?;
    Ok(())
}

async fn ensure_success(
    response: reqwest::Response,
    endpoint: &'static str,
) -> std::result::Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Upstream {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

pub struct GoogleSheetsMirror {
    client: reqwest::Client,
    credentials: Option<(ServiceAccount, SheetTarget)>,
}

impl GoogleSheetsMirror {
    pub fn new(account: ServiceAccount, target: SheetTarget) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials: Some((account, target)),
        }
    }

    /// A mirror with no credentials; every append reports `NotConfigured`.
    pub fn unconfigured() -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials: None,
        }
    }

    async fn append(&self, row: LedgerRow) -> Result<()> {
        let (account, target) = self.credentials.as_ref().ok_or(SheetsError::NotConfigured)?;
        append_row(&self.client, account, target, &row).await?;
        log::info!("Appended row to {}", row.range);
        Ok(())
    }
}

#[async_trait]
impl LedgerMirror for GoogleSheetsMirror {
    async fn record_support_offer(&self, offer: &SupportOffer) -> Result<()> {
        self.append(LedgerRow::support_offer(offer, Utc::now())).await
    }

    async fn record_donation(&self, donation: &Donation) -> Result<()> {
        self.append(LedgerRow::donation(donation, Utc::now())).await
    }

    async fn record_gift(&self, donation: &Donation) -> Result<()> {
        self.append(LedgerRow::gift(donation, Utc::now())).await
    }

    async fn record_monetary_pledge(&self, pledge: &Pledge) -> Result<()> {
        self.append(LedgerRow::monetary_pledge(pledge, Utc::now())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jsonwebtoken::{DecodingKey, Validation};

    const PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_service_account.pem");
    const PUBLIC_KEY: &str = include_str!("../tests/fixtures/test_service_account.pub.pem");

    fn account(private_key: &str) -> ServiceAccount {
        ServiceAccount {
            client_email: "mirror@wedding.iam.gserviceaccount.com".into(),
            private_key: SecretString::from(private_key.to_string()),
            token_uri: "https://oauth2.googleapis.com/token".into(),
        }
    }

    #[test]
    fn assertion_carries_service_account_claims() {
        let now = Utc::now();
        let jwt = sign_assertion(&account(PRIVATE_KEY), now).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://oauth2.googleapis.com/token"]);
        validation.set_issuer(&["mirror@wedding.iam.gserviceaccount.com"]);
        let decoded = jsonwebtoken::decode::<AssertionClaims>(
            &jwt,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims.scope, SPREADSHEETS_SCOPE);
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 3600);
    }

    #[test]
    fn garbage_key_is_a_signing_error() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let err = sign_assertion(&account("not a key"), at).unwrap_err();
        assert!(matches!(err, SheetsError::Signing(_)));
    }

    #[test]
    fn sheets_errors_become_mirror_errors() {
        let err: AppError = SheetsError::NotConfigured.into();
        assert!(matches!(err, AppError::Mirror(msg) if msg.contains("not configured")));
    }
}
