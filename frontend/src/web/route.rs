//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问要求。

use std::fmt::Display;

use booky_shared::ROLE_ADMIN;

use super::guard::RouteAccess;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页推荐 (默认路由)
    #[default]
    Home,
    Login,
    Register,
    /// 分类图书列表
    Category(u64),
    /// 作者图书列表
    Author(u64),
    /// 图书详情
    BookDetail(u64),
    /// 购物车 (需要登录)
    Cart,
    /// 管理后台 (需要 admin 角色)
    Admin,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["cart"] => Self::Cart,
            ["admin"] => Self::Admin,
            ["category", id] => Self::parse_id(id, Self::Category),
            ["authors", id] => Self::parse_id(id, Self::Author),
            ["books", id] => Self::parse_id(id, Self::BookDetail),
            _ => Self::NotFound,
        }
    }

    fn parse_id(raw: &str, make: fn(u64) -> Self) -> Self {
        raw.parse().map(make).unwrap_or(Self::NotFound)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Category(id) => format!("/category/{}", id),
            Self::Author(id) => format!("/authors/{}", id),
            Self::BookDetail(id) => format!("/books/{}", id),
            Self::Cart => "/cart".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫配置：该路由的访问要求**
    ///
    /// `None` 表示公开页面，不经过守卫。
    pub fn access(&self) -> Option<RouteAccess> {
        match self {
            Self::Cart => Some(RouteAccess::authenticated()),
            Self::Admin => Some(RouteAccess::roles([ROLE_ADMIN])),
            _ => None,
        }
    }

    /// 获取守卫拒绝时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功后的落地页
    pub fn landing_for(is_admin: bool) -> Self {
        if is_admin { Self::Admin } else { Self::Home }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
