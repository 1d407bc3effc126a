use crate::utils::error::AppError;

/// Gera hash bcrypt (com salt aleatório) para a senha
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifica a senha contra o hash armazenado
///
/// Hashes malformados contam como senha inválida, não como erro de servidor.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(password, stored_hash) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("⚠️  Password verification error: {}", e);
            false
        }
    }
}
