use booky_shared::Book;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::api::BookFeed;
use crate::auth::use_api;
use crate::components::book_card::BookGrid;
use crate::components::header::Header;
use crate::components::pager::LoadMoreButton;
use crate::config::use_config;
use crate::state::pagination::{LoadMode, PaginationController, spawn_page_load};

/// 把输入框内容转换为查询关键字，空白表示不过滤
fn search_term(input: &str) -> Option<String> {
    Some(input.trim()).filter(|q| !q.is_empty()).map(str::to_string)
}

/// 首页：推荐图书 + 关键字搜索 + 加载更多
#[component]
pub fn HomePage() -> impl IntoView {
    let config = use_config();
    let api = use_api();

    let pager = RwSignal::new(PaginationController::<Book, Option<String>>::new(
        config.home_page_size,
        LoadMode::Append,
    ));
    let draft = RwSignal::new(String::new());
    let search = RwSignal::new(Option::<String>::None);
    let feed = move |search: Option<String>| BookFeed {
        api: api.client(),
        category_id: None,
        search,
    };

    // 关键字即查询条件：首次运行完成初始加载，之后每次提交都回到第一页
    Effect::new(move |_| {
        let term = search.get();
        if pager.try_update(|p| p.set_query_key(term.clone())).unwrap_or(false) {
            spawn_page_load(pager, feed(term), 1);
        }
    });

    let on_search = move |ev: SubmitEvent| {
        ev.prevent_default();
        search.set(search_term(&draft.get_untracked()));
    };

    let on_load_more = Callback::new(move |_| {
        let next = pager.with_untracked(|p| p.current_page() + 1);
        spawn_page_load(pager, feed(search.get_untracked()), next);
    });

    let heading = move || match search.get() {
        Some(q) => format!("Results for \"{}\"", q),
        None => "Recommendation".to_string(),
    };

    let books = Signal::derive(move || pager.with(|p| p.items().to_vec()));
    let loading = Signal::derive(move || pager.with(|p| p.is_loading()));
    let has_more = Signal::derive(move || pager.with(|p| p.has_more()));

    view! {
        <Header />
        <main class="max-w-7xl mx-auto px-4 md:px-8 py-8">
            <div class="flex flex-col md:flex-row md:items-center justify-between gap-4 mb-6">
                <h2 class="text-2xl md:text-3xl font-bold">{heading}</h2>
                <form class="join" on:submit=on_search>
                    <input
                        type="search"
                        placeholder="Search books"
                        on:input=move |ev| draft.set(event_target_value(&ev))
                        prop:value=draft
                        class="input input-bordered join-item w-full md:w-72"
                    />
                    <button class="btn btn-primary join-item">"Search"</button>
                </form>
            </div>
            <BookGrid books=books loading=loading class="grid grid-cols-2 md:grid-cols-5 gap-4" />
            <LoadMoreButton loading=loading has_more=has_more on_load=on_load_more />
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_ignores_blank_input() {
        assert_eq!(search_term(""), None);
        assert_eq!(search_term("   "), None);
        assert_eq!(search_term("  dune "), Some("dune".to_string()));
    }
}
