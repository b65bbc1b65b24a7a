use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub hash_time_cost: u32,
    pub min_username_length: usize,
    pub min_password_length: usize,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            token_ttl_seconds: 3600,
            hash_time_cost: 3,
            min_username_length: 1,
            min_password_length: 1,
        }
    }
}
