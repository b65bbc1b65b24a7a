//! # Portero (Credential-Gated API)
//!
//! `portero` is a small identity-gated HTTP service. Clients register and log
//! in with a username/password, receive a signed bearer token, and present it
//! to reach protected routes.
//!
//! ## Authentication
//!
//! Passwords are stored as salted `Argon2id` hashes; the plaintext never
//! touches the database or the logs. Logins are exchanged for a compact
//! HMAC-SHA256 signed token carrying the username claim and an expiry, so no
//! server-side session table is needed.
//!
//! ## Access control
//!
//! Protected routes sit behind a bearer-token gate. Every verification
//! failure (missing header, malformed token, bad signature, expired) surfaces
//! as the same `401 Unauthorized` response to avoid leaking token internals,
//! and unknown-user versus wrong-password login failures are likewise
//! indistinguishable to prevent username enumeration.

pub mod cli;
pub mod password;
pub mod portero;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
