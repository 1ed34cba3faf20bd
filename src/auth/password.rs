use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

fn argon2() -> Argon2<'static> {
    Argon2::default()
}

/// PHC string for `plain`, salted per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    argon2()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

/// `Ok(false)` on a mismatch. Only an unreadable stored hash is an error.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("stored hash unreadable: {e}"))?;
    match argon2().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_right_password_only() {
        let stored = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &stored).unwrap());
        assert!(!verify_password("S3cret", &stored).unwrap());
        assert!(!verify_password("", &stored).unwrap());
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        let a = hash_password("repeat").unwrap();
        let b = hash_password("repeat").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn garbage_in_the_hash_column_is_an_error() {
        let err = verify_password("anything", "plaintext-password").unwrap_err();
        assert!(err.to_string().contains("stored hash unreadable"));
    }
}
