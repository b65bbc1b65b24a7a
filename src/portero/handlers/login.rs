use crate::{
    password::Hasher,
    portero::{
        handlers::{valid_password, valid_username, AuthConfig},
        storage::{self, StoreError},
    },
    token::TokenSigner,
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserLogin {
    username: String,
    password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    token: String,
}

#[utoipa::path(
    post,
    path= "/api/auth/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful", body = TokenResponse, content_type = "application/json"),
        (status = 400, description = "Invalid fields", body = String),
        (status = 401, description = "Unknown username or wrong password", body = String),
        (status = 500, description = "Credential store unavailable", body = String),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    config: Extension<AuthConfig>,
    hasher: Extension<Arc<Hasher>>,
    signer: Extension<Arc<TokenSigner>>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let username = user.username.trim().to_string();

    if !valid_username(&username, config.min_username_length())
        || !valid_password(&user.password, config.min_password_length())
    {
        debug!("Malformed login fields");

        return (StatusCode::BAD_REQUEST, "Invalid fields".to_string()).into_response();
    }

    // unknown username and wrong password must stay indistinguishable
    let credential = match storage::find_credential(&pool, &username).await {
        Ok(credential) => credential,

        Err(StoreError::NotFound) => {
            debug!("Unknown username");

            return invalid_credentials();
        }

        Err(err) => {
            error!("Failed to look up credential: {err}");

            return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string())
                .into_response();
        }
    };

    if !hasher.verify(&user.password, &credential.password_hash) {
        debug!("Password mismatch");

        return invalid_credentials();
    }

    match signer.issue(&credential.username) {
        Ok(token) => {
            debug!("Login successful");

            (StatusCode::OK, Json(TokenResponse { token })).into_response()
        }

        Err(err) => {
            error!("Failed to issue token: {err}");

            (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string()).into_response()
        }
    }
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        "Invalid credentials".to_string(),
    )
        .into_response()
}
