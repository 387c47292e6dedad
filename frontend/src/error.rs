use thiserror::Error;

/// API 调用错误
///
/// 页面与状态控制器从不把它继续向上抛出：网络错误和格式错误都会
/// 降级为空列表 / 默认状态，业务拒绝则转为一条提示消息。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 受保护的接口在没有 token 时被调用（客户端前置条件）
    #[error("missing session token")]
    MissingToken,
    /// 请求没有完成
    #[error("network error: {0}")]
    Network(String),
    /// 401 / 403
    #[error("unauthorized")]
    Unauthorized,
    /// 其他非 2xx 状态
    #[error("unexpected status: {0}")]
    Status(u16),
    /// 响应体不是预期的结构
    #[error("malformed response: {0}")]
    Malformed(String),
    /// 后端返回 `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// 适合直接展示给用户的消息，`fallback` 用于非业务错误
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(msg) if !msg.is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 会话写入失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("token must not be empty")]
    EmptyToken,
    #[error("failed to write storage slot `{0}`")]
    WriteFailed(&'static str),
    #[error("failed to serialize user profile: {0}")]
    Serialize(String),
}

/// 登录流程失败：请求失败或会话无法保存
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.user_message("Login failed. Please try again."),
            AuthError::Session(_) => "Unable to save your session in this browser.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_rejection() {
        let err = ApiError::Rejected("Book is out of stock".to_string());
        assert_eq!(err.user_message("Failed"), "Book is out of stock");
        assert_eq!(ApiError::Status(500).user_message("Failed"), "Failed");
        assert_eq!(
            ApiError::Rejected(String::new()).user_message("Failed"),
            "Failed"
        );
    }
}
