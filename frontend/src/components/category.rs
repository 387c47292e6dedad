use booky_shared::{Book, Category};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::BookFeed;
use crate::auth::use_api;
use crate::components::book_card::BookGrid;
use crate::components::header::Header;
use crate::components::pager::LoadMoreButton;
use crate::config::use_config;
use crate::state::pagination::{LoadMode, PaginationController, spawn_page_load};
use crate::state::selection::CriteriaFilter;

/// 评分筛选项，从高到低展示
const RATING_OPTIONS: [u8; 5] = [5, 4, 3, 2, 1];

/// 分类页：左侧分类单选 + 评分多选，右侧图书网格
#[component]
pub fn CategoryPage(category_id: u64) -> impl IntoView {
    let config = use_config();
    let api = use_api();

    let categories = RwSignal::new(Vec::<Category>::new());
    let selected = RwSignal::new(category_id);
    let criteria = RwSignal::new(CriteriaFilter::new());
    let pager = RwSignal::new(PaginationController::<Book, u64>::new(
        config.category_page_size,
        LoadMode::Append,
    ));

    let feed = move |category_id: u64| BookFeed {
        api: api.client(),
        category_id: Some(category_id),
        search: None,
    };

    spawn_local(async move {
        match api.client().list_categories().await {
            Ok(list) => {
                categories.try_set(list);
            }
            Err(e) => log::warn!("[Category] Failed to load categories: {}", e),
        }
    });

    // 分类变化即查询条件变化：回到第一页重新加载
    Effect::new(move |_| {
        let id = selected.get();
        if pager.try_update(|p| p.set_query_key(id)).unwrap_or(false) {
            spawn_page_load(pager, feed(id), 1);
        }
    });

    let on_load_more = Callback::new(move |_| {
        let next = pager.with_untracked(|p| p.current_page() + 1);
        spawn_page_load(pager, feed(selected.get_untracked()), next);
    });

    let title = move || {
        let id = selected.get();
        categories.with(|list| {
            list.iter()
                .find(|c| c.id == id)
                .map(|c| format!("Book List - {}", c.name))
                .unwrap_or_else(|| "Book List".to_string())
        })
    };

    let books = Signal::derive(move || criteria.with(|c| pager.with(|p| c.apply(p.items()))));
    let loading = Signal::derive(move || pager.with(|p| p.is_loading()));
    let has_more = Signal::derive(move || pager.with(|p| p.has_more()));

    view! {
        <Header />
        <main class="max-w-7xl mx-auto px-4 md:px-8 py-8">
            <h2 class="text-xl md:text-2xl font-bold mb-4">{title}</h2>
            <div class="flex flex-col md:flex-row gap-6">
                <aside class="card bg-base-100 shadow-md md:w-64 shrink-0">
                    <div class="card-body p-4">
                        <div class="font-extrabold">"FILTER"</div>

                        <div class="font-bold mt-2">"Category"</div>
                        <For
                            each=move || categories.get()
                            key=|cat| cat.id
                            children=move |cat| {
                                let id = cat.id;
                                view! {
                                    <label class="label cursor-pointer justify-start gap-2">
                                        <input
                                            type="radio"
                                            name="category"
                                            class="radio radio-primary radio-sm"
                                            prop:checked=move || selected.get() == id
                                            on:change=move |_| selected.set(id)
                                        />
                                        <span>{cat.name}</span>
                                    </label>
                                }
                            }
                        />

                        <div class="divider my-2"></div>

                        <div class="font-bold">"Rating"</div>
                        {RATING_OPTIONS
                            .into_iter()
                            .map(|rating| {
                                view! {
                                    <label class="label cursor-pointer justify-start gap-2">
                                        <input
                                            type="checkbox"
                                            class="checkbox checkbox-primary checkbox-sm"
                                            prop:checked=move || criteria.with(|c| c.contains(rating))
                                            on:change=move |_| criteria.update(|c| c.toggle(rating))
                                        />
                                        <span>{format!("★ {}", rating)}</span>
                                    </label>
                                }
                            })
                            .collect_view()}
                    </div>
                </aside>

                <section class="flex-1">
                    <BookGrid books=books loading=loading />
                    <LoadMoreButton loading=loading has_more=has_more on_load=on_load_more />
                </section>
            </div>
        </main>
    }
}
