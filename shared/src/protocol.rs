use crate::{
    AdminUser, Author, Book, BookId, CartItem, CartItemId, Category, PaginationMeta, UserProfile,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// 接口使用的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

/// 定义接口请求与响应的对应关系及元数据
pub trait ApiRequest: Serialize {
    /// 响应外壳中 `data` 字段的类型
    type Response: DeserializeOwned;
    /// HTTP 方法
    const METHOD: HttpMethod;
    /// 是否需要携带 bearer token
    const REQUIRES_AUTH: bool = false;

    /// URL 路径（包含路径参数）
    fn path(&self) -> String;

    /// 查询参数（仅用于 GET 请求）
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// 所有接口共用的响应外壳 `{success, message, data}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// 缺失与 `null` 都视为 `None`
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// 不区分大小写地检查 message 是否包含某个片段
    pub fn message_contains(&self, needle: &str) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.to_lowercase().contains(&needle.to_lowercase()))
    }
}

// =========================================================
// Response Payloads
// =========================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    #[serde(default)]
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub users: Vec<AdminUser>,
    #[serde(default)]
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBooks {
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub book_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartContents {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

// =========================================================
// Request Definitions
// =========================================================

/// 邮箱 + 密码登录
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginData;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }
}

/// 图书列表，可按分类或关键字过滤
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListBooksRequest {
    pub page: u32,
    pub limit: u32,
    pub category_id: Option<u64>,
    pub search: Option<String>,
}

impl ApiRequest for ListBooksRequest {
    type Response = BookPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/books".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(category_id) = self.category_id {
            params.push(("categoryId", category_id.to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        if let Some(q) = self.search.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetBookRequest {
    pub id: BookId,
}

impl ApiRequest for GetBookRequest {
    type Response = Book;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/books/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCategoriesRequest;

impl ApiRequest for ListCategoriesRequest {
    type Response = CategoryList;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/categories".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorBooksRequest {
    pub author_id: u64,
    pub page: u32,
    pub limit: u32,
}

impl ApiRequest for AuthorBooksRequest {
    type Response = AuthorBooks;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/authors/{}/books", self.author_id)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetCartRequest;

impl ApiRequest for GetCartRequest {
    type Response = CartContents;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "/api/cart".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub book_id: BookId,
}

impl ApiRequest for AddCartItemRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "/api/cart/items".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowBookRequest {
    pub book_id: BookId,
    pub days: u32,
}

impl ApiRequest for BorrowBookRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "/api/loans".to_string()
    }
}

/// 一次借出购物车中选中的图书
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowFromCartRequest {
    pub item_ids: Vec<CartItemId>,
    pub days: u32,
    /// `YYYY-MM-DD`
    pub borrow_date: String,
}

impl ApiRequest for BorrowFromCartRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "/api/loans/from-cart".to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersRequest {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl ApiRequest for ListUsersRequest {
    type Response = UserPage;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "/api/admin/users".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(q) = self.search.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        params
    }
}
