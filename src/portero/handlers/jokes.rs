use crate::portero::handlers::gate::Identity;
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct Joke {
    id: String,
    joke: String,
}

const JOKES: [(&str, &str); 3] = [
    (
        "0189hNRf2g",
        "Chances are if you've seen one shopping center, you've seen a mall.",
    ),
    (
        "08EQZ8EQukb",
        "Dad, did you get a haircut? No, I got them all cut!",
    ),
    (
        "08xHQCdx5Ed",
        "Why did the scarecrow win an award? Because he was outstanding in his field.",
    ),
];

#[utoipa::path(
    get,
    path= "/api/jokes",
    responses (
        (status = 200, description = "Return jokes", body = [Joke], content_type = "application/json"),
        (status = 401, description = "Missing or invalid bearer token", body = String),
    ),
    tag= "jokes"
)]
// Thin resource handler: the gate has already verified the caller, so all
// that is left to do here is serve the payload.
pub async fn jokes(identity: Identity) -> impl IntoResponse {
    debug!("Serving jokes to {}", identity.username);

    let jokes: Vec<Joke> = JOKES
        .iter()
        .map(|(id, joke)| Joke {
            id: (*id).to_string(),
            joke: (*joke).to_string(),
        })
        .collect();

    Json(jokes)
}
