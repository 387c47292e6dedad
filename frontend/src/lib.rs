//! Booky 图书馆前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储（token + 用户资料，可注入存储后端）
//! - `state`: 分页、筛选 / 选择、列表合并等与 UI 无关的状态
//! - `web::guard` / `web::route`: 路由守卫与路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 把会话接入 Leptos 信号
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin_dashboard;
    pub mod author;
    pub mod book_card;
    pub mod book_detail;
    pub mod cart;
    pub mod category;
    pub mod header;
    pub mod home;
    pub mod login;
    pub mod pager;
    pub mod register;
}
mod config;
mod error;
mod format;
mod logger;
mod notify;
mod session;
mod state {
    pub mod list_sync;
    pub mod pagination;
    pub mod selection;
}

use crate::auth::{AuthContext, init_storage_listener};
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::author::AuthorPage;
use crate::components::book_detail::BookDetailPage;
use crate::components::cart::CartPage;
use crate::components::category::CategoryPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::config::AppConfig;
use crate::notify::{NoticeHost, Notifier};

use leptos::prelude::*;

// 浏览器原生 API 封装模块
pub(crate) mod web {
    pub mod guard;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};
use web::storage::BrowserStorage;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Category(id) => view! { <CategoryPage category_id=id /> }.into_any(),
        AppRoute::Author(id) => view! { <AuthorPage author_id=id /> }.into_any(),
        AppRoute::BookDetail(id) => view! { <BookDetailPage book_id=id /> }.into_any(),
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Home class="btn btn-primary mt-6">"Back to Home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置
    let config = AppConfig::load(&BrowserStorage);
    logger::init(config.log_level);
    log::info!("[App] Booky starting, backend at {}", config.api_base_url);
    provide_context(Notifier::new(config.notice_millis));
    provide_context(config);

    // 2. 认证上下文（初始会话从 LocalStorage 读取）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_storage_listener(auth_ctx);

    // 3. 会话信号注入路由服务，守卫本身仍直接读取存储
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <NoticeHost />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
