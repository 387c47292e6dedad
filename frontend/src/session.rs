//! 会话存储模块
//!
//! 会话由两个独立的存储槽组成：`token`（不透明的 bearer 字符串）和
//! `user`（JSON 序列化的用户资料）。两者总是同时存在或同时缺失：
//! - 写入顺序为先 `user` 后 `token`，删除顺序相反；
//! - 读取时任意一个缺失或 `user` 无法解析，都视为未登录。
//!
//! 存储通过 [`KeyValueStorage`] 注入，订阅者在登录、注销和刷新后收到通知。

use crate::error::SessionError;
use crate::web::storage::KeyValueStorage;
use booky_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, UserProfile};

#[cfg(test)]
mod tests;

/// 已认证的身份
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub token: String,
    pub user: UserProfile,
}

/// 当前会话
///
/// `token` 与 `user` 被放在同一个 `Option` 里，不可能只有其中一个。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            identity: Some(Identity {
                token: token.into(),
                user,
            }),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.identity.as_ref().map(|i| &i.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.role.is_admin())
    }
}

/// 从存储读取会话，任何异常都降级为未登录
pub fn read_session<S: KeyValueStorage>(storage: &S) -> Session {
    let Some(token) = storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty()) else {
        return Session::anonymous();
    };
    let Some(raw_user) = storage.get(STORAGE_USER_KEY) else {
        return Session::anonymous();
    };
    match serde_json::from_str::<UserProfile>(&raw_user) {
        Ok(user) => Session::authenticated(token, user),
        Err(e) => {
            log::warn!("[Session] Stored user is malformed, treating as logged out: {}", e);
            Session::anonymous()
        }
    }
}

pub type SubscriptionId = usize;

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

/// 会话存储
pub struct SessionStore<S> {
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// 读取当前会话（纯读取，不通知订阅者）
    pub fn current(&self) -> Session {
        read_session(&self.storage)
    }

    /// 持久化新的身份并通知订阅者
    ///
    /// 写入 `token` 失败时会清空两个槽位，存储中不会残留半个会话。
    pub fn login(&mut self, token: &str, user: &UserProfile) -> Result<Session, SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let raw_user =
            serde_json::to_string(user).map_err(|e| SessionError::Serialize(e.to_string()))?;

        if !self.storage.set(STORAGE_USER_KEY, &raw_user) {
            return Err(SessionError::WriteFailed(STORAGE_USER_KEY));
        }
        if !self.storage.set(STORAGE_TOKEN_KEY, token) {
            self.clear_slots();
            self.publish(&Session::anonymous());
            return Err(SessionError::WriteFailed(STORAGE_TOKEN_KEY));
        }

        let session = Session::authenticated(token, user.clone());
        log::info!("[Session] Logged in as user #{}", user.id);
        self.publish(&session);
        Ok(session)
    }

    /// 清除会话并通知订阅者
    pub fn logout(&mut self) {
        self.clear_slots();
        log::info!("[Session] Logged out");
        self.publish(&Session::anonymous());
    }

    /// 重新读取存储并通知订阅者（其他标签页修改了存储时使用）
    pub fn refresh(&self) -> Session {
        let session = self.current();
        self.publish(&session);
        session
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn clear_slots(&self) {
        // 先删 token：守卫只看 token 是否存在
        self.storage.remove(STORAGE_TOKEN_KEY);
        self.storage.remove(STORAGE_USER_KEY);
    }

    fn publish(&self, session: &Session) {
        for (_, listener) in &self.listeners {
            listener(session);
        }
    }
}
