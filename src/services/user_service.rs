use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::IdentityStore;

#[derive(Clone)]
pub struct UserService {
    store: IdentityStore,
}

impl UserService {
    pub fn new(store: IdentityStore) -> Self {
        Self { store }
    }

    /// 当前用户的合并视图
    pub async fn get_profile(&self, user_id: &str) -> AppResult<MergedUser> {
        let auth = self
            .store
            .find_auth_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        self.store
            .merged_user(&auth.email)
            .await?
            .ok_or_else(|| AppError::InternalError("用户视图构建失败".to_string()))
    }

    /// 活跃用户列表，首页信息流用
    pub async fn list_active(&self) -> AppResult<Vec<MergedUser>> {
        self.store.list_active_users().await
    }

    /// 两个记录序列的调试快照
    pub async fn dump(&self) -> AppResult<(Vec<AuthRecord>, Vec<ProfileRecord>)> {
        self.store.dump().await
    }

    /// 清空内存与镜像，回到种子数据
    pub async fn reset(&self) -> AppResult<()> {
        self.store.clear_all().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use tempfile::TempDir;

    fn test_service() -> (UserService, TempDir) {
        let mirror_dir = TempDir::new().unwrap();
        let config = StoreConfig {
            fixtures_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures").to_string(),
            mirror_dir: mirror_dir.path().to_string_lossy().into_owned(),
        };
        (UserService::new(IdentityStore::new(&config)), mirror_dir)
    }

    #[tokio::test]
    async fn test_get_profile_by_id() {
        let (service, _mirror) = test_service();

        let user = service.get_profile("auth-001").await.unwrap();
        assert_eq!(user.email, "zhang.san@example.com");
        assert_eq!(user.name, "张三");
    }

    #[tokio::test]
    async fn test_get_profile_unknown_id() {
        let (service, _mirror) = test_service();

        let result = service.get_profile("auth-999").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_active_only_active_accounts() {
        let (service, _mirror) = test_service();

        let active = service.list_active().await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|u| u.status == AccountStatus::Active));
    }

    #[tokio::test]
    async fn test_reset_restores_seed_data() {
        let (service, _mirror) = test_service();

        let (auth_before, _) = service.dump().await.unwrap();
        service.reset().await.unwrap();
        let (auth_after, profiles_after) = service.dump().await.unwrap();

        assert_eq!(auth_before.len(), auth_after.len());
        assert!(!profiles_after.is_empty());
    }
}
