use crate::error::{AppError, AppResult};
use chrono::Utc;

const TOKEN_PREFIX: &str = "mock_token_";

#[derive(Debug, PartialEq)]
pub struct TokenParts {
    pub user_id: String,
    pub issued_at_millis: i64,
}

/// 会话令牌服务。令牌是嵌入用户 ID 和签发时间的不透明字符串，
/// 可解析但不可校验，上线前必须替换为签名令牌方案。
#[derive(Clone)]
pub struct TokenService;

impl TokenService {
    pub fn new() -> Self {
        Self
    }

    pub fn issue(&self, user_id: &str) -> String {
        format!(
            "{}{}_{}",
            TOKEN_PREFIX,
            user_id,
            Utc::now().timestamp_millis()
        )
    }

    pub fn parse(&self, token: &str) -> AppResult<TokenParts> {
        let body = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| AppError::AuthError("无效的令牌格式".to_string()))?;

        let (user_id, issued_at) = body
            .rsplit_once('_')
            .ok_or_else(|| AppError::AuthError("无效的令牌格式".to_string()))?;

        if user_id.is_empty() {
            return Err(AppError::AuthError("无效的令牌格式".to_string()));
        }

        let issued_at_millis = issued_at
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("无效的令牌格式".to_string()))?;

        Ok(TokenParts {
            user_id: user_id.to_string(),
            issued_at_millis,
        })
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}
