//! 分页控制器模块
//!
//! 同时支持两种交互：
//! - `LoadMode::Replace`: 上一页 / 下一页 / 页码按钮，每页整体替换
//! - `LoadMode::Append`: “加载更多”，新页按 id 去重后追加
//!
//! 每次请求都会领取一个单调递增的序号，完成时只接受最新序号的响应，
//! 过期响应直接丢弃。

use async_trait::async_trait;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::error::ApiResult;

use super::list_sync::{Identified, MergedCollection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

/// 一次页面请求的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    seq: u64,
}

/// 拉取到的一页数据
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub total_items: u32,
}

/// 外部数据源（通常是 API）
#[async_trait(?Send)]
pub trait PageSource<T> {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<Page<T>>;
}

// =========================================================
// 页码窗口
// =========================================================

/// 需要展示的页码按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

/// 计算页码按钮（最多 3 个）
pub fn visible_page_numbers(current: u32, total: u32) -> PageWindow {
    let pages = if total <= 3 {
        (1..=total).collect()
    } else if current <= 2 {
        vec![1, 2, 3]
    } else if current >= total - 1 {
        vec![total - 2, total - 1, total]
    } else {
        vec![current - 1, current, current + 1]
    };

    PageWindow {
        pages,
        leading_ellipsis: current > 2 && total > 3,
        trailing_ellipsis: total > 3 && current < total - 1,
    }
}

// =========================================================
// 控制器
// =========================================================

#[derive(Debug, Clone)]
pub struct PaginationController<T, K = String> {
    query_key: Option<K>,
    current_page: u32,
    total_pages: u32,
    total_items: u32,
    page_size: u32,
    is_loading: bool,
    mode: LoadMode,
    /// 最近一次发出的请求序号
    issued: u64,
    items: MergedCollection<T>,
}

impl<T: Identified + Clone, K: PartialEq> PaginationController<T, K> {
    pub fn new(page_size: u32, mode: LoadMode) -> Self {
        Self {
            query_key: None,
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            page_size: page_size.max(1),
            is_loading: false,
            mode,
            issued: 0,
            items: MergedCollection::new(),
        }
    }

    /// 查询条件变化时回到第一页
    ///
    /// 返回 `true` 表示发生了重置，调用方需要重新请求第一页。
    pub fn set_query_key(&mut self, key: K) -> bool {
        if self.query_key.as_ref() == Some(&key) {
            return false;
        }
        self.query_key = Some(key);
        self.current_page = 1;
        self.total_pages = 1;
        self.total_items = 0;
        self.is_loading = false;
        self.items.clear();
        // 旧查询的在途请求全部作废
        self.issued += 1;
        true
    }

    /// 发起页面请求，页码越界时返回 `None` 且不改变状态
    pub fn request_page(&mut self, page: u32) -> Option<PageRequest> {
        if page < 1 || page > self.total_pages {
            log::debug!(
                "[Pagination] Ignoring page {} (total {})",
                page,
                self.total_pages
            );
            return None;
        }
        self.issued += 1;
        self.current_page = page;
        self.is_loading = true;
        Some(PageRequest {
            page,
            page_size: self.page_size,
            seq: self.issued,
        })
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        self.request_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Option<PageRequest> {
        self.request_page(self.current_page.saturating_sub(1))
    }

    /// 加载更多（追加模式下的下一页）
    pub fn load_more(&mut self) -> Option<PageRequest> {
        self.next_page()
    }

    /// 应用请求结果
    ///
    /// 返回 `false` 表示响应已过期被丢弃。失败时回到安全的默认状态。
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        request: PageRequest,
        result: Result<Page<T>, E>,
    ) -> bool {
        if request.seq != self.issued {
            log::debug!(
                "[Pagination] Discarding stale response for page {}",
                request.page
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.total_pages = page.total_pages.max(1);
                self.total_items = page.total_items;
                if self.mode == LoadMode::Replace || request.page == 1 {
                    self.items.reset(page.items);
                } else {
                    self.items.append(&page.items);
                }
                self.current_page = request.page.min(self.total_pages);
            }
            Err(e) => {
                log::warn!("[Pagination] Failed to load page {}: {}", request.page, e);
                self.current_page = 1;
                self.total_pages = 1;
                self.total_items = 0;
                self.items.clear();
            }
        }
        self.is_loading = false;
        true
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn items(&self) -> &[T] {
        self.items.items()
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    /// 当前页第一行的序号（从 1 开始）
    pub fn first_row_number(&self) -> u32 {
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .saturating_add(1)
    }

    pub fn window(&self) -> PageWindow {
        visible_page_numbers(self.current_page, self.total_pages)
    }
}

/// 在信号中驱动一次页面加载
///
/// 写回时使用 `try_update`：所属组件已卸载（信号被释放）时结果被丢弃。
pub fn spawn_page_load<T, K, S>(
    pager: RwSignal<PaginationController<T, K>>,
    source: S,
    page: u32,
) where
    T: Identified + Clone + Send + Sync + 'static,
    K: PartialEq + Send + Sync + 'static,
    S: PageSource<T> + 'static,
{
    let Some(request) = pager.try_update(|p| p.request_page(page)).flatten() else {
        return;
    };
    spawn_local(async move {
        let result = source.fetch_page(request.page, request.page_size).await;
        if pager.try_update(|p| p.complete(request, result)).is_none() {
            log::debug!("[Pagination] View disposed before page {} arrived", request.page);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u32);

    impl Identified for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.0
        }
    }

    fn page(ids: impl IntoIterator<Item = u32>, total_pages: u32) -> Page<Item> {
        let items: Vec<Item> = ids.into_iter().map(Item).collect();
        Page {
            total_items: items.len() as u32,
            items,
            total_pages,
        }
    }

    fn ids(pager: &PaginationController<Item>) -> Vec<u32> {
        pager.items().iter().map(|i| i.0).collect()
    }

    /// 按页码返回预置结果的数据源
    struct ScriptedSource {
        pages: HashMap<u32, ApiResult<Page<Item>>>,
    }

    #[async_trait(?Send)]
    impl PageSource<Item> for ScriptedSource {
        async fn fetch_page(&self, page: u32, _page_size: u32) -> ApiResult<Page<Item>> {
            self.pages
                .get(&page)
                .cloned()
                .unwrap_or_else(|| Err(ApiError::Status(404)))
        }
    }

    // =========================================================
    // 页码窗口
    // =========================================================

    #[test]
    fn test_window_small_totals_show_everything() {
        assert_eq!(visible_page_numbers(1, 1).pages, vec![1]);
        assert_eq!(visible_page_numbers(2, 2).pages, vec![1, 2]);
        assert_eq!(visible_page_numbers(3, 3).pages, vec![1, 2, 3]);
        for current in 1..=3 {
            let window = visible_page_numbers(current, 3);
            assert!(!window.leading_ellipsis);
            assert!(!window.trailing_ellipsis);
        }
    }

    #[test]
    fn test_window_boundaries() {
        assert_eq!(
            visible_page_numbers(1, 10),
            PageWindow {
                pages: vec![1, 2, 3],
                leading_ellipsis: false,
                trailing_ellipsis: true,
            }
        );
        assert_eq!(
            visible_page_numbers(10, 10),
            PageWindow {
                pages: vec![8, 9, 10],
                leading_ellipsis: true,
                trailing_ellipsis: false,
            }
        );
        assert_eq!(
            visible_page_numbers(5, 10),
            PageWindow {
                pages: vec![4, 5, 6],
                leading_ellipsis: true,
                trailing_ellipsis: true,
            }
        );
    }

    #[test]
    fn test_window_near_edges() {
        let second = visible_page_numbers(2, 10);
        assert_eq!(second.pages, vec![1, 2, 3]);
        assert!(!second.leading_ellipsis);

        let penultimate = visible_page_numbers(9, 10);
        assert_eq!(penultimate.pages, vec![8, 9, 10]);
        assert!(penultimate.leading_ellipsis);
        assert!(!penultimate.trailing_ellipsis);
    }

    // =========================================================
    // 请求与完成
    // =========================================================

    #[test]
    fn test_out_of_range_requests_are_noops() {
        let mut pager: PaginationController<Item> = PaginationController::new(10, LoadMode::Replace);
        assert_eq!(pager.request_page(0), None);
        assert_eq!(pager.request_page(2), None);
        assert!(!pager.is_loading());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.previous_page(), None);
    }

    #[test]
    fn test_replace_mode_swaps_pages() {
        let mut pager: PaginationController<Item> = PaginationController::new(3, LoadMode::Replace);
        let first = pager.request_page(1).unwrap();
        assert!(pager.is_loading());
        assert!(pager.complete::<ApiError>(first, Ok(page([1, 2, 3], 4))));
        assert!(!pager.is_loading());
        assert_eq!(pager.total_pages(), 4);

        let second = pager.next_page().unwrap();
        pager.complete::<ApiError>(second, Ok(page([4, 5, 6], 4)));
        assert_eq!(ids(&pager), vec![4, 5, 6]);
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.first_row_number(), 4);
        assert!(pager.can_go_previous());
    }

    #[test]
    fn test_row_number_saturates_on_huge_page_counts() {
        let mut pager: PaginationController<Item> = PaginationController::new(50, LoadMode::Replace);
        let first = pager.request_page(1).unwrap();
        pager.complete::<ApiError>(first, Ok(page([1], u32::MAX)));
        let last = pager.request_page(u32::MAX).unwrap();
        pager.complete::<ApiError>(last, Ok(page([2], u32::MAX)));
        assert_eq!(pager.current_page(), u32::MAX);
        assert_eq!(pager.first_row_number(), u32::MAX);
    }

    #[test]
    fn test_failure_resets_to_defaults() {
        let mut pager: PaginationController<Item> = PaginationController::new(10, LoadMode::Replace);
        let first = pager.request_page(1).unwrap();
        pager.complete::<ApiError>(first, Ok(page(1..=10, 5)));
        let third = pager.request_page(3).unwrap();

        assert!(pager.complete(third, Err::<Page<Item>, _>(ApiError::Malformed("books".into()))));

        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.current_page(), 1);
        assert!(pager.items().is_empty());
        assert!(!pager.is_loading());
    }

    #[test]
    fn test_total_pages_never_below_one_and_current_clamped() {
        let mut pager: PaginationController<Item> = PaginationController::new(10, LoadMode::Replace);
        let first = pager.request_page(1).unwrap();
        pager.complete::<ApiError>(first, Ok(page(1..=10, 3)));
        let third = pager.request_page(3).unwrap();
        // 数据在翻页期间被删到只剩一页
        pager.complete::<ApiError>(third, Ok(page(Vec::new(), 0)));

        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.current_page(), 1);
        assert!(!pager.has_more());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut pager: PaginationController<Item> = PaginationController::new(10, LoadMode::Replace);
        let first = pager.request_page(1).unwrap();
        pager.complete::<ApiError>(first, Ok(page(1..=10, 5)));

        // 快速连点：第 2 页尚未返回时又请求了第 3 页
        let slow = pager.request_page(2).unwrap();
        let fast = pager.request_page(3).unwrap();
        assert!(pager.complete::<ApiError>(fast, Ok(page(21..=30, 5))));
        assert!(!pager.complete::<ApiError>(slow, Ok(page(11..=20, 5))));

        assert_eq!(pager.current_page(), 3);
        assert_eq!(ids(&pager), (21..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_query_change_resets_and_invalidates_in_flight() {
        let mut pager: PaginationController<Item> = PaginationController::new(10, LoadMode::Append);
        assert!(pager.set_query_key("".to_string()));
        assert!(!pager.set_query_key("".to_string()));

        let first = pager.request_page(1).unwrap();
        pager.complete::<ApiError>(first, Ok(page(1..=10, 3)));
        let more = pager.load_more().unwrap();

        assert!(pager.set_query_key("dune".to_string()));
        assert_eq!(pager.current_page(), 1);
        assert!(pager.items().is_empty());
        assert!(!pager.is_loading());

        let fresh = pager.request_page(1).unwrap();
        assert!(!pager.complete::<ApiError>(more, Ok(page(11..=20, 3))));
        assert!(pager.complete::<ApiError>(fresh, Ok(page([100, 101], 1))));
        assert_eq!(ids(&pager), vec![100, 101]);
    }

    #[tokio::test]
    async fn test_load_more_merges_overlapping_page() {
        let source = ScriptedSource {
            pages: HashMap::from([
                (1, Ok(page(1..=12, 2))),
                (2, Ok(page([12, 13, 14], 2))),
            ]),
        };
        let mut pager: PaginationController<Item> = PaginationController::new(12, LoadMode::Append);

        let first = pager.request_page(1).unwrap();
        let result = source.fetch_page(first.page, first.page_size).await;
        pager.complete(first, result);
        assert!(pager.has_more());

        let more = pager.load_more().unwrap();
        assert_eq!(more.page, 2);
        let result = source.fetch_page(more.page, more.page_size).await;
        pager.complete(more, result);

        let merged = ids(&pager);
        assert_eq!(merged.len(), 14);
        assert_eq!(&merged[..12], (1..=12).collect::<Vec<_>>().as_slice());
        assert_eq!(&merged[12..], &[13, 14]);
        assert!(!pager.has_more());
        assert_eq!(pager.load_more(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_from_source_degrades_to_empty() {
        let source = ScriptedSource {
            pages: HashMap::from([(1, Err(ApiError::Network("offline".into())))]),
        };
        let mut pager: PaginationController<Item> = PaginationController::new(10, LoadMode::Append);

        let first = pager.request_page(1).unwrap();
        let result = source.fetch_page(first.page, first.page_size).await;
        assert!(pager.complete(first, result));

        assert!(pager.items().is_empty());
        assert_eq!(pager.total_pages(), 1);
        assert!(!pager.is_loading());
    }
}
