use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Disabled,
    Pending,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Disabled => write!(f, "disabled"),
            AccountStatus::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Nationality {
    Chinese,
    Japanese,
    Other,
}

impl std::fmt::Display for Nationality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nationality::Chinese => write!(f, "chinese"),
            Nationality::Japanese => write!(f, "japanese"),
            Nationality::Other => write!(f, "other"),
        }
    }
}

/// 认证记录，对应 auth_users.json 的条目
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthRecord {
    pub id: String,
    pub public_no: i64,
    pub email: String,
    pub phone: Option<String>,
    // 镜像往返需要序列化该字段；对外响应只暴露 MergedUser 视图
    pub password_hash: String,
    pub status: AccountStatus,
    pub role: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub token_version: i64,
    #[serde(default)]
    pub last_password_change_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户资料记录，对应 users.json 的条目 (字段为 camelCase)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub nationality: Nationality,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub trust_score: i64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 认证记录与资料记录的只读合并视图
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergedUser {
    pub id: String,
    pub public_no: i64,
    pub email: String,
    pub phone: Option<String>,
    pub status: AccountStatus,
    pub role: String,
    pub name: String,
    pub avatar: Option<String>,
    pub nationality: Nationality,
    pub is_verified: bool,
    pub trust_score: i64,
    pub created_at: DateTime<Utc>,
}

impl MergedUser {
    /// 资料字段优先；没有资料记录时代入默认值
    pub fn from_records(auth: &AuthRecord, profile: Option<&ProfileRecord>) -> Self {
        Self {
            id: auth.id.clone(),
            public_no: auth.public_no,
            email: auth.email.clone(),
            phone: auth.phone.clone(),
            status: auth.status,
            role: auth.role.clone(),
            name: profile
                .and_then(|p| p.full_name.clone())
                .unwrap_or_else(|| "Unknown User".to_string()),
            avatar: profile.and_then(|p| p.avatar.clone()),
            nationality: profile.map(|p| p.nationality).unwrap_or(Nationality::Other),
            is_verified: auth.email_verified_at.is_some(),
            trust_score: profile.map(|p| p.trust_score).unwrap_or(0),
            created_at: auth.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "zhang.san@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "new.user@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendCodeRequest {
    #[schema(example = "zhang.san@example.com")]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    #[schema(example = "zhang.san@example.com")]
    pub email: String,
    #[schema(example = "123456")]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: MergedUser,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn auth_record(email_verified: bool) -> AuthRecord {
        let ts = Utc.with_ymd_and_hms(2025, 11, 20, 8, 30, 0).unwrap();
        AuthRecord {
            id: "auth-001".to_string(),
            public_no: 10001,
            email: "zhang.san@example.com".to_string(),
            phone: None,
            password_hash: "$2b$12$x".to_string(),
            status: AccountStatus::Active,
            role: "user".to_string(),
            email_verified_at: email_verified.then_some(ts),
            phone_verified_at: None,
            token_version: 0,
            last_password_change_at: None,
            last_sign_in_at: None,
            created_ip: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_merged_user_defaults_without_profile() {
        let merged = MergedUser::from_records(&auth_record(false), None);
        assert_eq!(merged.name, "Unknown User");
        assert_eq!(merged.nationality, Nationality::Other);
        assert_eq!(merged.trust_score, 0);
        assert!(!merged.is_verified);
    }

    #[test]
    fn test_merged_user_prefers_profile_fields() {
        let auth = auth_record(true);
        let profile = ProfileRecord {
            id: auth.id.clone(),
            email: auth.email.clone(),
            full_name: Some("张三".to_string()),
            nationality: Nationality::Chinese,
            is_verified: false,
            trust_score: 85,
            avatar: Some("/avatars/zhang-san.png".to_string()),
            bio: None,
            created_at: auth.created_at,
            updated_at: auth.updated_at,
        };
        let merged = MergedUser::from_records(&auth, Some(&profile));
        assert_eq!(merged.name, "张三");
        assert_eq!(merged.trust_score, 85);
        // isVerified 取决于认证记录的邮箱验证时间，而非资料记录自身的标记
        assert!(merged.is_verified);
    }

    #[test]
    fn test_auth_record_round_trips_through_json() {
        let record = auth_record(true);
        let json = serde_json::to_string(&record).unwrap();
        let back: AuthRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.email, record.email);
        assert_eq!(back.password_hash, record.password_hash);
        assert_eq!(back.status, record.status);
    }

    #[test]
    fn test_merged_user_has_no_password_hash_field() {
        let merged = MergedUser::from_records(&auth_record(true), None);
        let value = serde_json::to_value(merged).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("passwordHash").is_none());
    }
}
