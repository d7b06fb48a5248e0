//! 领域错误类型

/// 评分引擎错误：仅输入非法一种
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("非法输入 {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl AnalysisError {
    pub fn invalid(field: &str, reason: &str) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type NotificationResult<T> = Result<T, NotificationError>;

/// 提醒分发错误
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("提醒发送失败: {0}")]
    SendFailed(String),

    #[error("提醒渠道配置错误: {0}")]
    InvalidConfig(String),

    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}
