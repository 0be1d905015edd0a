use crate::models::{AuthRecord, ProfileRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const AUTH_USERS_FILE: &str = "auth_users.json";
const USERS_FILE: &str = "users.json";

/// 记录序列的持久化镜像：两个 JSON 文件的写穿缓存。
/// 镜像不是数据源；缺失或为空时回退到种子数据。
/// 写入失败只记录日志，内存状态在本次会话内仍然有效。
#[derive(Clone)]
pub struct Mirror {
    dir: PathBuf,
}

impl Mirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 读取镜像中的认证记录；缺失、为空或损坏时返回 None
    pub fn load_auth_records(&self) -> Option<Vec<AuthRecord>> {
        read_entry(&self.dir.join(AUTH_USERS_FILE))
    }

    pub fn load_profile_records(&self) -> Option<Vec<ProfileRecord>> {
        read_entry(&self.dir.join(USERS_FILE))
    }

    /// 将两个序列整体写入镜像
    pub fn store(&self, auth_records: &[AuthRecord], profile_records: &[ProfileRecord]) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            log::warn!("无法创建镜像目录 {}: {e}", self.dir.display());
            return;
        }
        write_entry(&self.dir.join(AUTH_USERS_FILE), auth_records);
        write_entry(&self.dir.join(USERS_FILE), profile_records);
    }

    /// 清空镜像；文件本就不存在时同样成功
    pub fn clear(&self) {
        for name in [AUTH_USERS_FILE, USERS_FILE] {
            let path = self.dir.join(name);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("无法删除镜像文件 {}: {e}", path.display()),
            }
        }
    }
}

fn read_entry<T: DeserializeOwned>(path: &Path) -> Option<Vec<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("无法读取镜像文件 {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str::<Vec<T>>(&content) {
        Ok(records) if records.is_empty() => None,
        Ok(records) => {
            log::info!("loaded {} records from mirror {}", records.len(), path.display());
            Some(records)
        }
        Err(e) => {
            log::warn!("镜像文件 {} 内容损坏: {e}", path.display());
            None
        }
    }
}

fn write_entry<T: Serialize>(path: &Path, records: &[T]) {
    let json = match serde_json::to_string(records) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("无法序列化镜像数据: {e}");
            return;
        }
    };
    if let Err(e) = std::fs::write(path, json) {
        log::warn!("无法写入镜像文件 {}: {e}", path.display());
    }
}
