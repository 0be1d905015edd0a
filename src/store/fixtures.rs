use crate::error::{AppError, AppResult};
use crate::models::{AuthRecord, ProfileRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const AUTH_USERS_FILE: &str = "auth_users.json";
const USERS_FILE: &str = "users.json";

/// users.json 的外层结构：{"users": [...]}
#[derive(Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<ProfileRecord>,
}

/// 只读种子数据加载器。加载失败返回带原因的错误，
/// 由调用方决定如何呈现，而不是静默退化为空列表。
#[derive(Clone)]
pub struct FixtureLoader {
    dir: PathBuf,
}

impl FixtureLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_auth_records(&self) -> AppResult<Vec<AuthRecord>> {
        let path = self.dir.join(AUTH_USERS_FILE);
        let content = read_fixture(&path)?;
        let records: Vec<AuthRecord> = serde_json::from_str(&content)
            .map_err(|e| AppError::StoreError(format!("无法解析 {}: {e}", path.display())))?;
        log::info!("loaded {} auth records from {}", records.len(), path.display());
        Ok(records)
    }

    pub fn load_profile_records(&self) -> AppResult<Vec<ProfileRecord>> {
        let path = self.dir.join(USERS_FILE);
        let content = read_fixture(&path)?;
        let file: UsersFile = serde_json::from_str(&content)
            .map_err(|e| AppError::StoreError(format!("无法解析 {}: {e}", path.display())))?;
        log::info!(
            "loaded {} profile records from {}",
            file.users.len(),
            path.display()
        );
        Ok(file.users)
    }
}

fn read_fixture(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::StoreError(format!("无法读取 {}: {e}", path.display())))
}
