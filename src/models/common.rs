use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应中 error 字段的结构
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
