//! HTTP application wiring (Axum router + auth core wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses
//!
//! The auth core pieces (codec, issuer, verifier, refresh, revocation,
//! aggregator) are constructed here with injected stores, so tests can run
//! the real router against in-memory fakes.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use campus_auth::{
    ClaimCodec, IdentityStore, PermissionAggregator, PermissionCache, RefreshProtocol,
    RevocationAuthority, SigningKey, TokenIssuer, TokenVerifier,
};
use campus_infra::{
    CredentialStore, InMemoryDirectoryStore, InMemoryIdentityStore, InMemoryPermissionCache,
};

use crate::config::AppConfig;
use crate::cookies::CookieConfig;
use crate::middleware;

pub mod errors;
pub mod routes;

/// Everything handlers need, behind one `Extension`.
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub refresh: Arc<RefreshProtocol>,
    pub revocation: Arc<RevocationAuthority>,
    pub aggregator: Arc<PermissionAggregator>,
    pub identities: Arc<dyn IdentityStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub permission_cache: Arc<dyn PermissionCache>,
    pub cookies: CookieConfig,
}

/// Build the full HTTP router with empty in-memory stores (dev default).
pub fn build_app(config: AppConfig) -> Router {
    let identities = Arc::new(InMemoryIdentityStore::new());
    let directory = Arc::new(InMemoryDirectoryStore::new());
    build_app_with_stores(config, identities, directory)
}

/// Build the router against caller-provided stores (tests seed these).
pub fn build_app_with_stores(
    config: AppConfig,
    identities: Arc<InMemoryIdentityStore>,
    directory: Arc<InMemoryDirectoryStore>,
) -> Router {
    let codec = Arc::new(ClaimCodec::new(SigningKey::from_secret(
        config.jwt_secret.as_bytes(),
    )));

    let identity_store: Arc<dyn IdentityStore> = identities.clone();
    let credential_store: Arc<dyn CredentialStore> = identities;

    let issuer = Arc::new(TokenIssuer::new(codec.clone()));
    let verifier = Arc::new(TokenVerifier::new(codec, identity_store.clone()));
    let refresh = Arc::new(RefreshProtocol::new(
        verifier.clone(),
        issuer.clone(),
        identity_store.clone(),
    ));
    let revocation = Arc::new(RevocationAuthority::new(identity_store.clone()));

    let permission_cache: Arc<dyn PermissionCache> =
        Arc::new(InMemoryPermissionCache::new(Duration::from_secs(30)));
    let aggregator = Arc::new(
        PermissionAggregator::new(directory).with_cache(permission_cache.clone()),
    );

    let state = Arc::new(AppState {
        issuer,
        verifier: verifier.clone(),
        refresh,
        revocation,
        aggregator,
        identities: identity_store,
        credentials: credential_store,
        permission_cache,
        cookies: CookieConfig {
            secure: config.secure_cookies,
        },
    });

    let auth_state = middleware::AuthState { verifier };

    // Protected routes: require a verified session cookie.
    let protected = Router::new()
        .route("/auth/logout-all", post(routes::auth::logout_all))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/permissions", get(routes::auth::permissions))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .merge(protected)
        .layer(Extension(state))
}
