//! Axum request handlers for all service endpoints.
//!
//! Every crypto call runs on the blocking pool: Argon2id key derivation is
//! CPU-bound and must not stall the async workers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse, ObjectRequest, ObjectResponse,
};
use common::ServiceError;
use tracing::{error, warn};

use super::extract::{ApiError, JsonBody};
use super::state::AppState;
use crate::crypto::CryptoError;
use crate::record;

/// `POST /encrypt` — seal one value into envelope text.
pub async fn encrypt(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EncryptRequest>,
) -> Response {
    let cipher = state.cipher.clone();
    match run_blocking(move || cipher.encrypt_for_database(req.plaintext.as_deref())).await {
        Ok(envelope) => (StatusCode::OK, Json(EncryptResponse { envelope })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// `POST /decrypt` — open one envelope back into plaintext.
pub async fn decrypt(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DecryptRequest>,
) -> Response {
    let cipher = state.cipher.clone();
    match run_blocking(move || cipher.decrypt_from_database(req.envelope.as_deref())).await {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// `POST /encrypt-object` — seal the named members of a record.
pub async fn encrypt_object(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ObjectRequest>,
) -> Response {
    let cipher = state.cipher.clone();
    let op = move || record::encrypt_object(&cipher, &req.record, req.fields.as_slice());
    match run_blocking(op).await {
        Ok(sealed) => (StatusCode::OK, Json(ObjectResponse { record: sealed })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// `POST /decrypt-object` — open the named members of a record.
pub async fn decrypt_object(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ObjectRequest>,
) -> Response {
    let cipher = state.cipher.clone();
    let op = move || record::decrypt_object(&cipher, &req.record, req.fields.as_slice());
    match run_blocking(op).await {
        Ok(opened) => (StatusCode::OK, Json(ObjectResponse { record: opened })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// `GET /health` — liveness check reporting which master secret is loaded.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        key_id: state.cipher.key_id().to_owned(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Error mapping helpers
// ---------------------------------------------------------------------------

impl From<CryptoError> for ServiceError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Validation(_) | CryptoError::MalformedEnvelope(_) => {
                ServiceError::BadRequest(e.to_string())
            }
            CryptoError::Integrity => ServiceError::IntegrityFailure(e.to_string()),
            CryptoError::RandomnessUnavailable => ServiceError::Unavailable(e.to_string()),
            // Configuration details stay in the logs.
            CryptoError::Configuration(_) => {
                ServiceError::Internal("service is misconfigured".into())
            }
        }
    }
}

/// Run a crypto operation on the blocking pool and classify its failure.
async fn run_blocking<T, F>(op: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, CryptoError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(kind = e.code(), error = %e, "crypto operation failed");
            Err(e.into())
        }
        Err(join) => {
            error!(error = %join, "crypto task did not complete");
            Err(ServiceError::Internal("crypto task did not complete".into()))
        }
    }
}
