use crate::{
    password::Hasher,
    portero::{
        handlers::{valid_password, valid_username, AuthConfig},
        storage::{self, StoreError},
    },
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserRegister {
    username: String,
    password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserCreated {
    id: String,
    username: String,
}

#[utoipa::path(
    post,
    path= "/api/auth/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful", body = UserCreated, content_type = "application/json"),
        (status = 400, description = "Invalid fields or username already taken", body = String),
        (status = 500, description = "Credential store unavailable", body = String),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    pool: Extension<PgPool>,
    config: Extension<AuthConfig>,
    hasher: Extension<Arc<Hasher>>,
    payload: Option<Json<UserRegister>>,
) -> impl IntoResponse {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let username = user.username.trim().to_string();

    if !valid_username(&username, config.min_username_length()) {
        debug!("Invalid username");

        return (StatusCode::BAD_REQUEST, "Invalid username".to_string()).into_response();
    }

    if !valid_password(&user.password, config.min_password_length()) {
        debug!("Invalid password");

        return (StatusCode::BAD_REQUEST, "Invalid password".to_string()).into_response();
    }

    // the plaintext stops here, only the salted hash is persisted
    let password_hash = match hasher.hash(&user.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err:#}");

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response();
        }
    };

    match storage::create_credential(&pool, &username, &password_hash).await {
        Ok(credential) => (
            StatusCode::CREATED,
            Json(UserCreated {
                id: credential.id.to_string(),
                username: credential.username,
            }),
        )
            .into_response(),

        Err(StoreError::Duplicate) => {
            debug!("Username already registered");

            (StatusCode::BAD_REQUEST, "Username taken".to_string()).into_response()
        }

        Err(err) => {
            error!("Failed to create credential: {err}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response()
        }
    }
}
