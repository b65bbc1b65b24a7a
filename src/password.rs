use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Default time cost, sized so one verify lands in the tens of milliseconds
/// on commodity hardware.
pub const DEFAULT_TIME_COST: u32 = 3;

/// Argon2id password hasher with a tunable time-cost work factor.
///
/// Every hash call salts with fresh `OsRng` output, so hashing the same
/// plaintext twice yields two different PHC strings. Verification reads the
/// parameters back out of the stored string, which keeps old hashes valid
/// after a cost bump.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: Algorithm,
    version: Version,
    params: Params,
}

impl Hasher {
    /// # Errors
    /// Returns an error if the cost parameters are rejected by argon2.
    pub fn new(time_cost: u32) -> Result<Self> {
        let params = Params::new(Params::DEFAULT_M_COST, time_cost, Params::DEFAULT_P_COST, None)
            .map_err(|err| anyhow!("invalid hash cost parameters: {err}"))?;

        Ok(Self {
            algorithm: Algorithm::Argon2id,
            version: Version::V0x13,
            params,
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(self.algorithm, self.version, self.params.clone())
    }

    /// Hash a plaintext password into a PHC-format string.
    ///
    /// # Errors
    /// Returns an error if hashing fails.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| anyhow!("failed to hash password: {err}"))
    }

    /// Verify a plaintext password against a stored PHC-format hash.
    ///
    /// The underlying comparison is constant-time; an unparseable hash
    /// string verifies as false rather than erroring, so callers cannot
    /// distinguish a corrupt record from a wrong password.
    #[must_use]
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| {
            self.argon2()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Argon2id,
            version: Version::V0x13,
            params: Params::default(),
        }
    }
}
