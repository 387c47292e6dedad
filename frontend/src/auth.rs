//! 认证模块
//!
//! 会话持久化交给 `SessionStore`，这里负责把它接入 Leptos：
//! 存储的每次变化都会通过订阅发布到 `session` 信号，Header、页面
//! 和路由服务都只依赖这个信号。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use booky_shared::protocol::RegisterRequest;
use booky_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY};

use crate::api::LibraryApi;
use crate::config::use_config;
use crate::error::{ApiError, AuthError};
use crate::session::{Session, SessionStore};
use crate::web::storage::BrowserStorage;

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（由 SessionStore 的订阅者写入）
    session: RwSignal<Session>,
    store: StoredValue<SessionStore<BrowserStorage>>,
}

impl AuthContext {
    /// 创建认证上下文，初始会话从 LocalStorage 读取
    pub fn new() -> Self {
        let mut store = SessionStore::new(BrowserStorage);
        let session = RwSignal::new(store.current());
        store.subscribe(move |s| session.set(s.clone()));

        Self {
            session,
            store: StoredValue::new(store),
        }
    }

    /// 会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(Session::is_authenticated)
    }

    /// 带上当前 token 的 API 客户端
    pub fn api(&self, base_url: &str) -> LibraryApi {
        let token = self.session.with_untracked(|s| s.token().map(str::to_string));
        LibraryApi::new(base_url, token)
    }

    /// 重新读取存储（其他标签页登录或注销后）
    pub fn refresh(&self) {
        self.store.with_value(|store| {
            store.refresh();
        });
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 组件持有的 API 句柄
///
/// 每次 `client()` 都读取最新的 token，登录状态变化后无需重建。
#[derive(Clone, Copy)]
pub struct ApiHandle {
    auth: AuthContext,
    base_url: StoredValue<String>,
}

impl ApiHandle {
    pub fn client(&self) -> LibraryApi {
        self.base_url.with_value(|url| self.auth.api(url))
    }
}

pub fn use_api() -> ApiHandle {
    ApiHandle {
        auth: use_auth(),
        base_url: StoredValue::new(use_config().api_base_url),
    }
}

/// 监听其他标签页对 LocalStorage 的修改
///
/// `key` 为空表示整个存储被清空。
pub fn init_storage_listener(ctx: AuthContext) {
    let closure = Closure::<dyn Fn(web_sys::StorageEvent)>::new(move |ev: web_sys::StorageEvent| {
        let relevant = match ev.key() {
            None => true,
            Some(key) => key == STORAGE_TOKEN_KEY || key == STORAGE_USER_KEY,
        };
        if relevant {
            log::info!("[Auth] Session changed in another tab");
            ctx.refresh();
        }
    });

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
    }

    // 泄漏闭包以保持监听器存活
    closure.forget();
}

// =========================================================
// 表单校验
// =========================================================

pub fn validate_login(email: &str, password: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Email and password are required.");
    }
    if !email.contains('@') {
        return Err("Please enter a valid email address.");
    }
    Ok(())
}

pub fn validate_registration(request: &RegisterRequest) -> Result<(), &'static str> {
    if request.name.trim().is_empty() {
        return Err("Name is required.");
    }
    validate_login(&request.email, &request.password)?;
    if request.phone.trim().is_empty() {
        return Err("Phone number is required.");
    }
    if request.password.len() < 6 {
        return Err("Password must be at least 6 characters.");
    }
    Ok(())
}

// =========================================================
// 登录 / 注册 / 注销
// =========================================================

/// 登录并持久化会话
///
/// 返回新的会话，调用方据此决定落地页。
pub async fn login(
    ctx: AuthContext,
    api: LibraryApi,
    email: String,
    password: String,
) -> Result<Session, AuthError> {
    let data = api.login(email, password).await?;
    let saved = ctx
        .store
        .try_update_value(|store| store.login(&data.token, &data.user));
    match saved {
        Some(result) => Ok(result?),
        None => Err(AuthError::Api(ApiError::Rejected(
            "Session is no longer available.".to_string(),
        ))),
    }
}

pub async fn register(api: LibraryApi, request: RegisterRequest) -> Result<Option<String>, ApiError> {
    api.register(request).await
}

/// 注销并清除状态
///
/// 受保护页面的跳转由路由服务对会话信号的监听处理。
pub fn logout(ctx: &AuthContext) {
    ctx.store.update_value(|store| store.logout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(name: &str, email: &str, phone: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("reader@library.com", "secret").is_ok());
        assert!(validate_login(" ", "secret").is_err());
        assert!(validate_login("reader@library.com", "").is_err());
        assert_eq!(
            validate_login("reader", "secret"),
            Err("Please enter a valid email address.")
        );
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(&registration("Nura", "n@x.io", "0812", "hunter22")).is_ok());
        assert_eq!(
            validate_registration(&registration("", "n@x.io", "0812", "hunter22")),
            Err("Name is required.")
        );
        assert_eq!(
            validate_registration(&registration("Nura", "n@x.io", " ", "hunter22")),
            Err("Phone number is required.")
        );
        assert_eq!(
            validate_registration(&registration("Nura", "n@x.io", "0812", "abc")),
            Err("Password must be at least 6 characters.")
        );
    }
}
