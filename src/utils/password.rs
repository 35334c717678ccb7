use crate::config::AppConfig;
use crate::errors::ClassHubError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 按配置的代价参数构建 Argon2id 哈希器
fn hasher() -> Result<Argon2<'static>, ClassHubError> {
    let cfg = &AppConfig::get().argon2;
    let params = Params::new(cfg.memory_cost, cfg.time_cost, cfg.parallelism, None)
        .map_err(|e| ClassHubError::validation(format!("Argon2 参数非法: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 哈希密码，输出 PHC 字符串
pub fn hash_password(password: &str) -> Result<String, ClassHubError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClassHubError::validation(format!("密码哈希失败: {e}")))
}

/// 验证密码，哈希串不合法按验证失败处理
///
/// 代价参数编码在 PHC 串里，验证侧不需要读配置。
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("sup3r-secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("sup3r-secret", &hash));
        assert!(!verify_password("wrong-guess", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
    }
}
