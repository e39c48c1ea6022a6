use bcrypt::{hash, verify, DEFAULT_COST};

use crate::utils::error::AppResult;

/// Explicit hashing step run by the signup controller before the user
/// document is persisted; there is no save-time hook anywhere.
pub fn hash_password(plain: &str) -> AppResult<String> {
    Ok(hash(plain, DEFAULT_COST)?)
}

pub fn verify_password(plain: &str, hashed: &str) -> AppResult<bool> {
    Ok(verify(plain, hashed)?)
}
