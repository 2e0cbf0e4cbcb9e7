//! Password hashing with argon2id.

use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};

use crate::service::{AuthError, HashConfig};

/// Hashes and verifies passwords.
///
/// Every hash gets a fresh random salt, embedded in the PHC output string
/// together with the cost parameters, so a digest verifies regardless of the
/// parameters the hasher is currently configured with.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Digest verified against when the stored one is unusable, so that
    /// path costs the same as a real verification.
    decoy: String,
}

impl PasswordHasher {
    pub fn new(config: &HashConfig) -> Result<Self, AuthError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AuthError::Internal(format!("invalid argon2 parameters: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, "decoy-password")?;
        Ok(Self { argon2, decoy })
    }

    /// Hash a plain password.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_with(&self.argon2, password)
    }

    /// Check `password` against a stored digest.
    ///
    /// `Ok(false)` means the password is wrong. A digest that cannot be
    /// parsed or evaluated yields `CorruptCredential`, after doing the same
    /// amount of work as a normal verification.
    pub fn verify(&self, digest: &str, password: &str) -> Result<bool, AuthError> {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.verify_decoy(password);
                return Err(AuthError::CorruptCredential(e.to_string()));
            }
        };
        if parsed.salt.is_none() || parsed.hash.is_none() {
            self.verify_decoy(password);
            return Err(AuthError::CorruptCredential("digest has no salt or output".into()));
        }

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                self.verify_decoy(password);
                Err(AuthError::CorruptCredential(e.to_string()))
            }
        }
    }

    /// Run a verification that always fails, costing as much as a real one.
    /// Used wherever a login must not finish faster than a wrong password.
    pub(crate) fn verify_decoy(&self, password: &str) {
        if let Ok(decoy) = PasswordHash::new(&self.decoy) {
            let _ = self.argon2.verify_password(password.as_bytes(), &decoy);
        }
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let h = hasher();
        for password in ["GoodPass1!", "pässwörd with spaces", "a"] {
            let digest = h.hash(password).unwrap();
            assert_ne!(digest, password);
            assert!(digest.starts_with("$argon2id$"));
            assert!(h.verify(&digest, password).unwrap(), "{password:?}");
        }
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let h = hasher();
        let digest = h.hash("GoodPass1!").unwrap();
        assert!(!h.verify(&digest, "GoodPass1").unwrap());
        assert!(!h.verify(&digest, "goodpass1!").unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let h = hasher();
        let a = h.hash("GoodPass1!").unwrap();
        let b = h.hash("GoodPass1!").unwrap();
        assert_ne!(a, b);
        assert!(h.verify(&a, "GoodPass1!").unwrap());
        assert!(h.verify(&b, "GoodPass1!").unwrap());
    }

    #[test]
    fn digest_from_other_parameters_still_verifies() {
        let digest = hasher().hash("GoodPass1!").unwrap();
        let stronger = PasswordHasher::new(&HashConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.verify(&digest, "GoodPass1!").unwrap());
    }

    #[test]
    fn malformed_digest_is_corrupt_credential() {
        let h = hasher();
        for digest in ["", "not-a-hash", "$argon2id$v=19$broken", "$unknown$abc"] {
            let err = h.verify(digest, "GoodPass1!").unwrap_err();
            assert!(matches!(err, AuthError::CorruptCredential(_)), "{digest:?}: {err:?}");
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = PasswordHasher::new(&HashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        })
        .err()
        .unwrap();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
