//! 后端 API 客户端
//!
//! 所有接口都返回 `{success, message, data}` 外壳，请求元数据（方法、路径、
//! 查询参数、是否需要 token）由 `booky_shared::protocol::ApiRequest` 描述。

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::de::{DeserializeOwned, IgnoredAny};

use booky_shared::protocol::{
    AddCartItemRequest, ApiEnvelope, ApiRequest, AuthorBooks, AuthorBooksRequest, BookPage,
    BorrowBookRequest, BorrowFromCartRequest, GetBookRequest, GetCartRequest, HttpMethod,
    ListBooksRequest, ListCategoriesRequest, ListUsersRequest, LoginData, LoginRequest,
    RegisterRequest, UserPage,
};
use booky_shared::{AdminUser, Book, BookId, CartItem, CartItemId, Category, HEADER_AUTHORIZATION};

use crate::error::{ApiError, ApiResult};
use crate::state::pagination::{Page, PageSource};

#[derive(Clone, Debug, PartialEq)]
pub struct LibraryApi {
    base_url: String,
    token: Option<String>,
}

/// 状态码与响应外壳
#[derive(Debug)]
pub struct Reply<T> {
    pub status: u16,
    pub envelope: ApiEnvelope<T>,
}

impl<T> Reply<T> {
    fn is_ok_status(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 取出 `data`，`success: false` 或非 2xx 都视为失败
    pub fn into_data(self) -> ApiResult<T> {
        if self.is_ok_status() && self.envelope.success {
            return self
                .envelope
                .data
                .ok_or_else(|| ApiError::Malformed("response has no data".to_string()));
        }
        Err(self.into_failure())
    }

    /// 只关心是否成功的接口
    pub fn into_ack(self) -> ApiResult<Option<String>> {
        if self.is_ok_status() && self.envelope.success {
            return Ok(self.envelope.message);
        }
        Err(self.into_failure())
    }

    fn into_failure(self) -> ApiError {
        match self.envelope.message {
            Some(message) if !message.is_empty() => ApiError::Rejected(message),
            _ if !self.is_ok_status() => ApiError::Status(self.status),
            _ => ApiError::Rejected(String::new()),
        }
    }
}

/// 解析响应体
///
/// 需要 token 的接口收到 401 / 403 时统一返回 `Unauthorized`，
/// 调用方据此跳转登录页。
pub fn decode_reply<T: DeserializeOwned>(
    status: u16,
    body: &str,
    requires_auth: bool,
) -> ApiResult<Reply<T>> {
    if requires_auth && matches!(status, 401 | 403) {
        return Err(ApiError::Unauthorized);
    }
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) => Ok(Reply { status, envelope }),
        Err(_) if matches!(status, 401 | 403) => Err(ApiError::Unauthorized),
        Err(_) if !(200..300).contains(&status) => Err(ApiError::Status(status)),
        Err(e) => Err(ApiError::Malformed(e.to_string())),
    }
}

// =========================================================
// 业务结果分类
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    Added,
    /// 后端拒绝但书已在购物车中，界面仍然跳转到购物车
    AlreadyInCart,
}

pub fn classify_add_to_cart(reply: Reply<IgnoredAny>) -> ApiResult<AddToCartOutcome> {
    let envelope = &reply.envelope;
    if reply.status == 200 && (envelope.success || envelope.message_contains("added")) {
        Ok(AddToCartOutcome::Added)
    } else if envelope.message_contains("already in cart") {
        Ok(AddToCartOutcome::AlreadyInCart)
    } else {
        Err(reply.into_failure())
    }
}

pub fn classify_borrow(reply: Reply<IgnoredAny>) -> ApiResult<()> {
    if reply.envelope.success || reply.envelope.message_contains("borrowed") {
        Ok(())
    } else {
        Err(reply.into_failure())
    }
}

impl From<BookPage> for Page<Book> {
    fn from(page: BookPage) -> Self {
        Page {
            items: page.books,
            total_pages: page.pagination.total_pages,
            total_items: page.pagination.total,
        }
    }
}

impl From<UserPage> for Page<AdminUser> {
    fn from(page: UserPage) -> Self {
        Page {
            items: page.users,
            total_pages: page.pagination.total_pages,
            total_items: page.pagination.total,
        }
    }
}

// =========================================================
// 客户端
// =========================================================

impl LibraryApi {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并解析外壳，业务层面的成功与否由调用方判断
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<Reply<R::Response>> {
        let url = self.url(&request.path());
        let mut builder = match R::METHOD {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
        };

        let query = request.query();
        if !query.is_empty() {
            builder = builder.query(query);
        }

        if R::REQUIRES_AUTH {
            let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
            builder = builder.header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        let sent = match R::METHOD {
            HttpMethod::Get => builder.send().await,
            HttpMethod::Post => {
                builder
                    .json(request)
                    .map_err(|e| ApiError::Malformed(e.to_string()))?
                    .send()
                    .await
            }
        };
        let response = sent.map_err(|e| {
            log::warn!("[Api] {} failed: {}", request.path(), e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        log::debug!("[Api] {} -> {}", request.path(), status);

        decode_reply(status, &body, R::REQUIRES_AUTH)
    }

    /// 登录
    pub async fn login(&self, email: String, password: String) -> ApiResult<LoginData> {
        self.send(&LoginRequest { email, password }).await?.into_data()
    }

    /// 注册
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<Option<String>> {
        self.send(&request).await?.into_ack()
    }

    pub async fn list_books(&self, request: ListBooksRequest) -> ApiResult<Page<Book>> {
        Ok(self.send(&request).await?.into_data()?.into())
    }

    pub async fn get_book(&self, id: BookId) -> ApiResult<Book> {
        self.send(&GetBookRequest { id }).await?.into_data()
    }

    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        Ok(self.send(&ListCategoriesRequest).await?.into_data()?.categories)
    }

    pub async fn author_books(&self, author_id: u64, limit: u32) -> ApiResult<AuthorBooks> {
        self.send(&AuthorBooksRequest {
            author_id,
            page: 1,
            limit,
        })
        .await?
        .into_data()
    }

    /// 获取购物车
    pub async fn cart(&self) -> ApiResult<Vec<CartItem>> {
        Ok(self.send(&GetCartRequest).await?.into_data()?.items)
    }

    /// 加入购物车
    pub async fn add_to_cart(&self, book_id: BookId) -> ApiResult<AddToCartOutcome> {
        classify_add_to_cart(self.send(&AddCartItemRequest { book_id }).await?)
    }

    /// 直接借阅单本
    pub async fn borrow_book(&self, book_id: BookId, days: u32) -> ApiResult<()> {
        classify_borrow(self.send(&BorrowBookRequest { book_id, days }).await?)
    }

    /// 借阅购物车中选中的条目，返回后端的提示消息
    pub async fn borrow_from_cart(
        &self,
        item_ids: Vec<CartItemId>,
        days: u32,
        borrow_date: String,
    ) -> ApiResult<Option<String>> {
        self.send(&BorrowFromCartRequest {
            item_ids,
            days,
            borrow_date,
        })
        .await?
        .into_ack()
    }

    pub async fn list_users(&self, request: ListUsersRequest) -> ApiResult<Page<AdminUser>> {
        Ok(self.send(&request).await?.into_data()?.into())
    }
}

// =========================================================
// 分页数据源
// =========================================================

/// 图书列表（可按分类或关键字过滤）
#[derive(Clone, Debug)]
pub struct BookFeed {
    pub api: LibraryApi,
    pub category_id: Option<u64>,
    pub search: Option<String>,
}

#[async_trait(?Send)]
impl PageSource<Book> for BookFeed {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<Page<Book>> {
        self.api
            .list_books(ListBooksRequest {
                page,
                limit: page_size,
                category_id: self.category_id,
                search: self.search.clone(),
            })
            .await
    }
}

/// 后台用户列表
#[derive(Clone, Debug)]
pub struct UserDirectory {
    pub api: LibraryApi,
    pub search: String,
}

#[async_trait(?Send)]
impl PageSource<AdminUser> for UserDirectory {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<Page<AdminUser>> {
        self.api
            .list_users(ListUsersRequest {
                page,
                limit: page_size,
                search: Some(self.search.clone()),
            })
            .await
    }
}
