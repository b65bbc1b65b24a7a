use crate::token::TokenSigner;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use std::sync::Arc;
use tracing::debug;

/// Identity claim attached to a request once its bearer token verifies.
///
/// Lives only for the request; downstream handlers read it through the
/// extractor below.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
}

/// Gate protected routes on a valid bearer token.
///
/// Missing header, malformed token, bad signature and expired token all
/// surface as the same 401 so callers learn nothing about token internals;
/// the actual reason is logged at debug level only.
pub async fn require_bearer(
    Extension(signer): Extension<Arc<TokenSigner>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        debug!("Missing bearer token");

        return Err(unauthenticated());
    };

    match signer.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(Identity {
                username: claims.sub,
            });

            Ok(next.run(request).await)
        }

        Err(err) => {
            debug!("Bearer token rejected: {err}");

            Err(unauthenticated())
        }
    }
}

fn unauthenticated() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(unauthenticated)
    }
}
