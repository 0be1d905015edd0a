use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::IdentityStore;
use crate::utils::*;

/// 邮箱验证码的固定接受值，邮件服务接入前的占位
const MOCK_EMAIL_CODE: &str = "123456";

#[derive(Clone)]
pub struct AuthService {
    store: IdentityStore,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(store: IdentityStore, token_service: TokenService) -> Self {
        Self {
            store,
            token_service,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        // 验证输入参数
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError("邮箱和密码不能为空".to_string()));
        }

        // 查找用户。未注册与密码错误返回同一文案，避免泄露具体原因
        let auth = self
            .store
            .find_auth_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::NotFound("邮箱或密码错误".to_string()))?;

        // 验证凭据
        if !self
            .store
            .verify_credential(&request.password, &auth.password_hash)
        {
            return Err(AppError::AuthError("邮箱或密码错误".to_string()));
        }

        // 检查账号状态
        match auth.status {
            AccountStatus::Active => {}
            AccountStatus::Disabled => {
                return Err(AppError::Forbidden("账号已被禁用".to_string()));
            }
            AccountStatus::Pending => {
                return Err(AppError::Forbidden("账号待审核".to_string()));
            }
        }

        self.store.record_sign_in(&auth.email).await?;

        let user = self
            .store
            .merged_user(&auth.email)
            .await?
            .ok_or_else(|| AppError::InternalError("用户视图构建失败".to_string()))?;
        let token = self.token_service.issue(&auth.id);

        Ok(AuthResponse { user, token })
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        // 验证输入参数
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError("邮箱和密码不能为空".to_string()));
        }
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        // 存储层在同一把写锁内再次检查重复，这里的预检用于尽早返回
        if self
            .store
            .find_auth_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateEmail("该邮箱已被注册".to_string()));
        }

        let (auth, _profile) = self
            .store
            .create_user(&request.email, &request.password)
            .await?;

        let user = self
            .store
            .merged_user(&auth.email)
            .await?
            .ok_or_else(|| AppError::InternalError("用户视图构建失败".to_string()))?;
        let token = self.token_service.issue(&auth.id);

        Ok(AuthResponse { user, token })
    }

    /// 解析令牌并返回其指向的用户视图
    pub async fn verify_token(&self, token: &str) -> AppResult<MergedUser> {
        let parts = self.token_service.parse(token)?;

        let auth = self
            .store
            .find_auth_by_id(&parts.user_id)
            .await?
            .ok_or_else(|| AppError::AuthError("无效的令牌".to_string()))?;

        self.store
            .merged_user(&auth.email)
            .await?
            .ok_or_else(|| AppError::InternalError("用户视图构建失败".to_string()))
    }

    /// 模拟发送邮箱验证码；生成的验证码只写入日志
    pub async fn send_email_code(&self, email: &str) -> AppResult<()> {
        validate_email(email)?;

        let code = generate_six_digit_code();
        log::info!("mock email verification code for {}: {}", email, code);
        Ok(())
    }

    /// 模拟校验邮箱验证码：只接受固定值
    pub fn verify_email_code(&self, _email: &str, code: &str) -> AppResult<()> {
        if code != MOCK_EMAIL_CODE {
            return Err(AppError::ValidationError("验证码错误".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use tempfile::TempDir;

    fn test_service() -> (AuthService, TempDir) {
        let mirror_dir = TempDir::new().unwrap();
        let config = StoreConfig {
            fixtures_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures").to_string(),
            mirror_dir: mirror_dir.path().to_string_lossy().into_owned(),
        };
        let store = IdentityStore::new(&config);
        (AuthService::new(store, TokenService::new()), mirror_dir)
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_with_fixture_credentials() {
        let (service, _mirror) = test_service();

        let response = service
            .login(login_request("zhang.san@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(response.user.email, "zhang.san@example.com");
        assert_eq!(response.user.trust_score, 85);
        assert!(response.user.is_verified);
        assert!(response.token.starts_with("mock_token_auth-001_"));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_not_found() {
        let (service, _mirror) = test_service();

        let result = service
            .login(login_request("nobody@example.com", "password123"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_auth_error() {
        let (service, _mirror) = test_service();

        let result = service
            .login(login_request("zhang.san@example.com", "wrong-password"))
            .await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_login_disabled_account_is_forbidden() {
        let (service, _mirror) = test_service();

        let result = service
            .login(login_request("li.wei@example.com", "password123"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_login_pending_account_is_forbidden() {
        let (service, _mirror) = test_service();

        let result = service
            .login(login_request("suzuki.taro@example.com", "test123"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_login_missing_fields_is_validation_error() {
        let (service, _mirror) = test_service();

        let result = service.login(login_request("", "password123")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let result = service
            .login(login_request("zhang.san@example.com", ""))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_new_email() {
        let (service, _mirror) = test_service();

        let response = service
            .register(register_request("newcomer@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(response.user.email, "newcomer@example.com");
        assert_eq!(response.user.name, "新用户");
        assert_eq!(response.user.public_no, 10006);
        assert_eq!(response.user.trust_score, 0);
        assert!(!response.user.is_verified);
        assert!(response.token.starts_with("mock_token_new-user-"));
    }

    #[tokio::test]
    async fn test_register_short_password_names_minimum() {
        let (service, _mirror) = test_service();

        let result = service
            .register(register_request("short.pw@example.com", "abcde"))
            .await;
        match result {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("6")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_bad_email_format() {
        let (service, _mirror) = test_service();

        let result = service
            .register(register_request("not-an-email", "password123"))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let (service, _mirror) = test_service();

        let result = service
            .register(register_request("zhang.san@example.com", "password123"))
            .await;
        assert!(matches!(result, Err(AppError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_register_twice_with_same_new_email() {
        let (service, _mirror) = test_service();

        service
            .register(register_request("only.once@example.com", "password123"))
            .await
            .unwrap();
        let second = service
            .register(register_request("only.once@example.com", "password123"))
            .await;
        assert!(matches!(second, Err(AppError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_verify_token_round_trip() {
        let (service, _mirror) = test_service();

        let response = service
            .login(login_request("zhang.san@example.com", "password123"))
            .await
            .unwrap();

        let user = service.verify_token(&response.token).await.unwrap();
        assert_eq!(user.email, "zhang.san@example.com");
    }

    #[tokio::test]
    async fn test_verify_token_rejects_unknown_user() {
        let (service, _mirror) = test_service();

        let result = service.verify_token("mock_token_no-such-id_1700000000000").await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_email_code_flow() {
        let (service, _mirror) = test_service();

        service
            .send_email_code("zhang.san@example.com")
            .await
            .unwrap();
        assert!(service
            .verify_email_code("zhang.san@example.com", "123456")
            .is_ok());
        assert!(service
            .verify_email_code("zhang.san@example.com", "654321")
            .is_err());
    }
}
