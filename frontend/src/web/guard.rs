//! 路由守卫 - 访问决策
//!
//! 纯同步、无副作用。每次决策都直接读取存储，而不是依赖会话信号的缓存值，
//! 所有拒绝路径都统一重定向到登录页。

use std::collections::BTreeSet;

use booky_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, UserProfile, normalize_role};

use super::storage::KeyValueStorage;

/// 受保护路由的访问要求
///
/// 空角色集合表示“已登录即可”。角色在构造时统一转为小写。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteAccess {
    required_roles: BTreeSet<String>,
}

impl RouteAccess {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        Self {
            required_roles: roles.into_iter().map(|r| normalize_role(r.as_ref())).collect(),
        }
    }

    pub fn required_roles(&self) -> &BTreeSet<String> {
        &self.required_roles
    }
}

/// 拒绝原因，仅用于日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    MissingToken,
    MissingUser,
    RoleNotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin(Denial),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// **核心守卫逻辑**
///
/// 决策只取决于两个存储槽的原始内容和访问要求。
pub fn decide(token: Option<&str>, raw_user: Option<&str>, access: &RouteAccess) -> GuardDecision {
    if token.is_none_or(str::is_empty) {
        return GuardDecision::RedirectToLogin(Denial::MissingToken);
    }

    if access.required_roles.is_empty() {
        return GuardDecision::Allow;
    }

    // 与会话存储使用同一个用户结构，会话读为未登录的记录在这里同样被拒绝
    let role = raw_user
        .and_then(|raw| serde_json::from_str::<UserProfile>(raw).ok())
        .map(|user| user.role.normalized())
        .filter(|role| !role.is_empty());
    let Some(role) = role else {
        return GuardDecision::RedirectToLogin(Denial::MissingUser);
    };

    if !access.required_roles.contains(&role) {
        return GuardDecision::RedirectToLogin(Denial::RoleNotAllowed);
    }

    GuardDecision::Allow
}

/// 路由守卫，持有注入的存储
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<S> {
    storage: S,
}

impl<S: KeyValueStorage> RouteGuard<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn check(&self, access: &RouteAccess) -> GuardDecision {
        let token = self.storage.get(STORAGE_TOKEN_KEY);
        let raw_user = self.storage.get(STORAGE_USER_KEY);
        decide(token.as_deref(), raw_user.as_deref(), access)
    }
}
