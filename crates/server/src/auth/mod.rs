//! Inbound request authentication.
//!
//! Each endpoint declares an ordered list of [`AuthScheme`]s; the
//! [`Authenticator`] tries them in order and the first scheme that accepts
//! the request wins. Success yields an [`AuthContext`] carrying the shop
//! domain and its offline Admin API token, which the rest of the pipeline
//! consumes and never caches.

use async_trait::async_trait;
use axum::http::HeaderMap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use crate::config::IntakeConfig;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age (and future skew) of an HMAC-signed request, in seconds.
const HMAC_WINDOW_SECS: i64 = 300;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const SIGNATURE_HEADER: &str = "x-signature";
pub const WEBHOOK_HMAC_HEADER: &str = "x-shopify-hmac-sha256";
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// Why a request failed authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid credentials")]
    BadCredential,

    /// Timestamp outside the replay window. Rejected before any HMAC work.
    #[error("Request timestamp too old")]
    StaleRequest,

    #[error("Signature mismatch")]
    BadSignature,

    /// A recognized caller supplied no shop context.
    #[error("Shop parameter is required")]
    ShopRequired,

    #[error("No access token configured for shop '{0}'")]
    UnknownShop(String),
}

/// Shop identity plus the credential to act on its behalf.
///
/// Resolved once per request and consumed by the resolver and submitter.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub shop_domain: String,
    pub access_token: SecretString,
}

/// Authentication schemes an endpoint may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Embedded-app session via the external OAuth collaborator.
    Session,
    /// Static `x-api-key` header.
    ApiKey,
    /// `x-timestamp` + `x-signature` request signing.
    Hmac,
    /// Shopify webhook `x-shopify-hmac-sha256` body signature.
    Webhook,
    /// `x-webhook-secret` shared secret.
    SharedSecret,
}

/// The parts of an inbound request that authentication inspects.
#[derive(Debug, Clone, Copy)]
pub struct RequestAuth<'a> {
    pub headers: &'a HeaderMap,
    /// Raw body bytes, exactly as received. Signatures cover these.
    pub body: &'a [u8],
    /// `?shop=` query parameter, when present.
    pub shop_param: Option<&'a str>,
}

/// Resolves a shop domain to its offline Admin API access token.
pub trait ShopTokens: Send + Sync {
    fn offline_token(&self, shop_domain: &str) -> Option<SecretString>;
}

/// Config-backed token store for a single-store deployment.
pub struct ConfigTokens {
    store: String,
    access_token: SecretString,
}

impl ConfigTokens {
    #[must_use]
    pub const fn new(store: String, access_token: SecretString) -> Self {
        Self {
            store,
            access_token,
        }
    }
}

impl ShopTokens for ConfigTokens {
    fn offline_token(&self, shop_domain: &str) -> Option<SecretString> {
        (shop_domain == self.store).then(|| self.access_token.clone())
    }
}

/// External OAuth collaborator seam for session-based authentication.
///
/// Session persistence and the OAuth dance live outside this service; the
/// default [`DisabledSessions`] rejects every request so session-capable
/// endpoints fall through to their next scheme.
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    /// Exchange request headers for an authenticated shop context.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when no valid session is present.
    async fn exchange(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError>;
}

/// Session authority that always rejects.
pub struct DisabledSessions;

#[async_trait]
impl SessionAuthority for DisabledSessions {
    async fn exchange(&self, _headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        Err(AuthError::MissingCredential("session"))
    }
}

/// Verifies inbound credentials and resolves the acting shop.
pub struct Authenticator {
    secrets: IntakeConfig,
    default_store: String,
    tokens: Box<dyn ShopTokens>,
    sessions: Box<dyn SessionAuthority>,
}

impl Authenticator {
    #[must_use]
    pub fn new(
        secrets: IntakeConfig,
        default_store: String,
        tokens: Box<dyn ShopTokens>,
        sessions: Box<dyn SessionAuthority>,
    ) -> Self {
        Self {
            secrets,
            default_store,
            tokens,
            sessions,
        }
    }

    /// Try each scheme in order; the first success wins.
    ///
    /// A missing shop context short-circuits: the caller proved who they are
    /// but the request is unusable, and trying further schemes would only
    /// mask that.
    ///
    /// # Errors
    ///
    /// Returns the last scheme's `AuthError` when every scheme rejects.
    pub async fn authenticate(
        &self,
        schemes: &[AuthScheme],
        request: &RequestAuth<'_>,
    ) -> Result<AuthContext, AuthError> {
        let mut last_error = AuthError::MissingCredential("credentials");

        for scheme in schemes {
            let outcome = match scheme {
                AuthScheme::Session => self.sessions.exchange(request.headers).await,
                AuthScheme::ApiKey => self.verify_api_key(request),
                AuthScheme::Hmac => self.verify_hmac(request),
                AuthScheme::Webhook => self.verify_webhook(request),
                AuthScheme::SharedSecret => self.verify_shared_secret(request),
            };

            match outcome {
                Ok(context) => return Ok(context),
                Err(err @ (AuthError::ShopRequired | AuthError::UnknownShop(_))) => {
                    return Err(err);
                }
                Err(err) => last_error = err,
            }
        }

        Err(last_error)
    }

    fn verify_api_key(&self, request: &RequestAuth<'_>) -> Result<AuthContext, AuthError> {
        let provided = header_str(request.headers, API_KEY_HEADER)
            .ok_or(AuthError::MissingCredential(API_KEY_HEADER))?;

        if !constant_time_compare(provided, self.secrets.api_key.expose_secret()) {
            return Err(AuthError::BadCredential);
        }

        // API-key callers must say which shop they act on
        let shop = request_shop(request).ok_or(AuthError::ShopRequired)?;
        self.context_for(shop)
    }

    fn verify_hmac(&self, request: &RequestAuth<'_>) -> Result<AuthContext, AuthError> {
        let timestamp = header_str(request.headers, TIMESTAMP_HEADER)
            .ok_or(AuthError::MissingCredential(TIMESTAMP_HEADER))?;
        let signature = header_str(request.headers, SIGNATURE_HEADER)
            .ok_or(AuthError::MissingCredential(SIGNATURE_HEADER))?;

        let ts: i64 = timestamp.parse().map_err(|_| AuthError::BadSignature)?;
        if (now_unix() - ts).abs() > HMAC_WINDOW_SECS {
            return Err(AuthError::StaleRequest);
        }

        // Signed message is the timestamp followed by the raw body bytes
        let mut mac = HmacSha256::new_from_slice(self.secrets.api_secret.expose_secret().as_bytes())
            .map_err(|_| AuthError::BadSignature)?;
        mac.update(timestamp.as_bytes());
        mac.update(request.body);
        let expected = hex::encode(mac.finalize().into_bytes());

        if !constant_time_compare(&expected, signature) {
            return Err(AuthError::BadSignature);
        }

        let shop = request_shop(request).unwrap_or(&self.default_store);
        self.context_for(shop)
    }

    fn verify_webhook(&self, request: &RequestAuth<'_>) -> Result<AuthContext, AuthError> {
        let signature = header_str(request.headers, WEBHOOK_HMAC_HEADER)
            .ok_or(AuthError::MissingCredential(WEBHOOK_HMAC_HEADER))?;

        let mut mac =
            HmacSha256::new_from_slice(self.secrets.webhook_secret.expose_secret().as_bytes())
                .map_err(|_| AuthError::BadSignature)?;
        mac.update(request.body);
        let expected = BASE64.encode(mac.finalize().into_bytes());

        if !constant_time_compare(&expected, signature) {
            return Err(AuthError::BadSignature);
        }

        let shop =
            header_str(request.headers, SHOP_DOMAIN_HEADER).unwrap_or(&self.default_store);
        self.context_for(shop)
    }

    fn verify_shared_secret(&self, request: &RequestAuth<'_>) -> Result<AuthContext, AuthError> {
        let provided = header_str(request.headers, WEBHOOK_SECRET_HEADER)
            .ok_or(AuthError::MissingCredential(WEBHOOK_SECRET_HEADER))?;

        if !constant_time_compare(provided, self.secrets.shopfunnels_secret.expose_secret()) {
            return Err(AuthError::BadCredential);
        }

        let shop = request_shop(request).unwrap_or(&self.default_store);
        self.context_for(shop)
    }

    fn context_for(&self, shop_domain: &str) -> Result<AuthContext, AuthError> {
        let access_token = self
            .tokens
            .offline_token(shop_domain)
            .ok_or_else(|| AuthError::UnknownShop(shop_domain.to_string()))?;

        Ok(AuthContext {
            shop_domain: shop_domain.to_string(),
            access_token,
        })
    }
}

/// Shop context from the `x-shopify-shop-domain` header or `?shop=` query.
fn request_shop<'a>(request: &'a RequestAuth<'_>) -> Option<&'a str> {
    header_str(request.headers, SHOP_DOMAIN_HEADER)
        .or(request.shop_param)
        .filter(|s| !s.is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
