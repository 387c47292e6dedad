use leptos::prelude::*;

use crate::state::pagination::PageWindow;

/// 加载更多按钮的文字
pub fn load_more_label(is_loading: bool, has_more: bool) -> &'static str {
    if is_loading {
        "Loading..."
    } else if has_more {
        "Load More"
    } else {
        "No More Data"
    }
}

#[component]
pub fn LoadMoreButton(
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] has_more: Signal<bool>,
    on_load: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex justify-center mt-8">
            <button
                class="btn btn-outline rounded-full min-w-44"
                disabled=move || loading.get() || !has_more.get()
                on:click=move |_| on_load.run(())
            >
                {move || load_more_label(loading.get(), has_more.get())}
            </button>
        </div>
    }
}

/// 页码导航：上一页 / 最多 3 个页码 / 下一页
#[component]
pub fn Pager(
    #[prop(into)] window: Signal<PageWindow>,
    #[prop(into)] current: Signal<u32>,
    #[prop(into)] can_previous: Signal<bool>,
    #[prop(into)] can_next: Signal<bool>,
    on_select: Callback<u32>,
) -> impl IntoView {
    view! {
        <nav class="join">
            <button
                class="join-item btn btn-sm"
                disabled=move || !can_previous.get()
                on:click=move |_| on_select.run(current.get_untracked().saturating_sub(1))
            >
                "‹ Previous"
            </button>
            <Show when=move || window.with(|w| w.leading_ellipsis)>
                <span class="join-item btn btn-sm btn-disabled">"..."</span>
            </Show>
            <For
                each=move || window.with(|w| w.pages.clone())
                key=|page| *page
                children=move |page| {
                    view! {
                        <button
                            class=move || {
                                if current.get() == page {
                                    "join-item btn btn-sm btn-active"
                                } else {
                                    "join-item btn btn-sm"
                                }
                            }
                            on:click=move |_| on_select.run(page)
                        >
                            {page}
                        </button>
                    }
                }
            />
            <Show when=move || window.with(|w| w.trailing_ellipsis)>
                <span class="join-item btn btn-sm btn-disabled">"..."</span>
            </Show>
            <button
                class="join-item btn btn-sm"
                disabled=move || !can_next.get()
                on:click=move |_| on_select.run(current.get_untracked() + 1)
            >
                "Next ›"
            </button>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_more_label() {
        assert_eq!(load_more_label(true, true), "Loading...");
        assert_eq!(load_more_label(true, false), "Loading...");
        assert_eq!(load_more_label(false, true), "Load More");
        assert_eq!(load_more_label(false, false), "No More Data");
    }
}
