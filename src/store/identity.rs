use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::models::{AccountStatus, AuthRecord, MergedUser, Nationality, ProfileRecord};
use crate::store::{FixtureLoader, Mirror};
use crate::utils::{hash_password, verify_password};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    auth_records: Vec<AuthRecord>,
    profile_records: Vec<ProfileRecord>,
    initialized: bool,
}

/// 身份存储：认证记录与资料记录两个有序序列的唯一持有者。
/// 首次操作时惰性初始化：镜像非空用镜像，否则加载种子数据。
/// 每次变更整体写穿到镜像。
#[derive(Clone)]
pub struct IdentityStore {
    inner: Arc<RwLock<StoreState>>,
    fixtures: FixtureLoader,
    mirror: Mirror,
}

impl IdentityStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState::default())),
            fixtures: FixtureLoader::new(&config.fixtures_dir),
            mirror: Mirror::new(&config.mirror_dir),
        }
    }

    /// 根据邮箱查找认证记录。邮箱按字节精确匹配，不做大小写归一化
    pub async fn find_auth_by_email(&self, email: &str) -> AppResult<Option<AuthRecord>> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        Ok(state
            .auth_records
            .iter()
            .find(|r| r.email == email)
            .cloned())
    }

    pub async fn find_auth_by_id(&self, id: &str) -> AppResult<Option<AuthRecord>> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        Ok(state.auth_records.iter().find(|r| r.id == id).cloned())
    }

    /// 根据 ID 查找资料记录；ID 是认证记录与资料记录的规范连接键
    pub async fn find_profile_by_id(&self, id: &str) -> AppResult<Option<ProfileRecord>> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        Ok(state
            .profile_records
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    pub async fn find_profile_by_email(&self, email: &str) -> AppResult<Option<ProfileRecord>> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        Ok(state
            .profile_records
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    /// 验证凭据：给定明文密码与存储工件，返回是否匹配
    pub fn verify_credential(&self, raw_password: &str, stored_hash: &str) -> bool {
        verify_password(raw_password, stored_hash)
    }

    /// 合并视图：没有认证记录时返回 None，资料记录缺失时代入默认值
    pub async fn merged_user(&self, email: &str) -> AppResult<Option<MergedUser>> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        let Some(auth) = state.auth_records.iter().find(|r| r.email == email) else {
            return Ok(None);
        };
        let profile = state.profile_records.iter().find(|p| p.id == auth.id);
        Ok(Some(MergedUser::from_records(auth, profile)))
    }

    /// 创建新用户：检查与插入在同一把写锁内完成，重复邮箱返回错误
    pub async fn create_user(
        &self,
        email: &str,
        raw_password: &str,
    ) -> AppResult<(AuthRecord, ProfileRecord)> {
        let mut state = self.inner.write().await;
        self.init_if_needed(&mut state)?;

        if state.auth_records.iter().any(|r| r.email == email) {
            return Err(AppError::DuplicateEmail("该邮箱已被注册".to_string()));
        }

        let now = Utc::now();
        let new_id = format!("new-user-{}", now.timestamp_millis());
        let new_public_no = state
            .auth_records
            .iter()
            .map(|r| r.public_no)
            .max()
            .unwrap_or(0)
            + 1;
        let password_hash = hash_password(raw_password)?;

        let auth_record = AuthRecord {
            id: new_id.clone(),
            public_no: new_public_no,
            email: email.to_string(),
            phone: None,
            password_hash,
            status: AccountStatus::Active,
            role: "user".to_string(),
            email_verified_at: None,
            phone_verified_at: None,
            token_version: 0,
            last_password_change_at: Some(now),
            last_sign_in_at: None,
            created_ip: Some("127.0.0.1".to_string()),
            created_at: now,
            updated_at: now,
        };

        let profile_record = ProfileRecord {
            id: new_id,
            email: email.to_string(),
            full_name: Some("新用户".to_string()),
            nationality: Nationality::Other,
            is_verified: false,
            trust_score: 0,
            avatar: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };

        state.auth_records.push(auth_record.clone());
        state.profile_records.push(profile_record.clone());
        self.mirror
            .store(&state.auth_records, &state.profile_records);

        log::info!(
            "created user {} (public_no {}), {} auth records total",
            auth_record.email,
            auth_record.public_no,
            state.auth_records.len()
        );

        Ok((auth_record, profile_record))
    }

    /// 记录登录时间
    pub async fn record_sign_in(&self, email: &str) -> AppResult<()> {
        let mut state = self.inner.write().await;
        self.init_if_needed(&mut state)?;

        let now = Utc::now();
        if let Some(record) = state.auth_records.iter_mut().find(|r| r.email == email) {
            record.last_sign_in_at = Some(now);
            record.updated_at = now;
        }
        self.mirror
            .store(&state.auth_records, &state.profile_records);
        Ok(())
    }

    /// 所有状态为 active 的用户的合并视图
    pub async fn list_active_users(&self) -> AppResult<Vec<MergedUser>> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        Ok(state
            .auth_records
            .iter()
            .filter(|r| r.status == AccountStatus::Active)
            .map(|auth| {
                let profile = state.profile_records.iter().find(|p| p.id == auth.id);
                MergedUser::from_records(auth, profile)
            })
            .collect())
    }

    /// 两个记录序列的调试快照
    pub async fn dump(&self) -> AppResult<(Vec<AuthRecord>, Vec<ProfileRecord>)> {
        self.ensure_initialized().await?;
        let state = self.inner.read().await;
        Ok((state.auth_records.clone(), state.profile_records.clone()))
    }

    /// 清空内存与镜像；幂等。下一次操作会重新从种子数据初始化
    pub async fn clear_all(&self) {
        let mut state = self.inner.write().await;
        state.auth_records.clear();
        state.profile_records.clear();
        state.initialized = false;
        self.mirror.clear();
        log::info!("cleared all records and mirror");
    }

    async fn ensure_initialized(&self) -> AppResult<()> {
        {
            let state = self.inner.read().await;
            if state.initialized {
                return Ok(());
            }
        }
        let mut state = self.inner.write().await;
        self.init_if_needed(&mut state)
    }

    fn init_if_needed(&self, state: &mut StoreState) -> AppResult<()> {
        if state.initialized {
            return Ok(());
        }

        state.auth_records = match self.mirror.load_auth_records() {
            Some(records) => records,
            None => self.fixtures.load_auth_records()?,
        };
        state.profile_records = match self.mirror.load_profile_records() {
            Some(records) => records,
            None => self.fixtures.load_profile_records()?,
        };
        state.initialized = true;

        log::info!(
            "identity store initialized: {} auth records, {} profile records",
            state.auth_records.len(),
            state.profile_records.len()
        );
        Ok(())
    }
}
