use booky_shared::date::today_iso;
use booky_shared::{CartItem, CartItemId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_api;
use crate::components::header::Header;
use crate::config::use_config;
use crate::error::ApiError;
use crate::format::cover_src;
use crate::notify::use_notifier;
use crate::state::list_sync::MergedCollection;
use crate::state::selection::EntitySelection;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 购物车页：勾选条目后一次性借阅
#[component]
pub fn CartPage() -> impl IntoView {
    let config = use_config();
    let api = use_api();
    let router = use_router();
    let notifier = use_notifier();

    let items = RwSignal::new(MergedCollection::<CartItem>::new());
    let selection = RwSignal::new(EntitySelection::<CartItemId>::new());
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let validation = RwSignal::new(Option::<&'static str>::None);

    // 拉取购物车并同步勾选集合
    let reload = move || {
        loading.set(true);
        spawn_local(async move {
            let fetched = match api.client().cart().await {
                Ok(list) => list,
                Err(ApiError::Unauthorized) => {
                    notifier.info("Your session has expired. Please login again.");
                    router.navigate_to(AppRoute::Login);
                    Vec::new()
                }
                Err(e) => {
                    log::warn!("[Cart] Failed to load cart: {}", e);
                    Vec::new()
                }
            };
            if items.try_update(|c| c.reset(fetched)).is_some() {
                let ids = items.with_untracked(|c| c.ids());
                selection.try_update(|s| s.sync_loaded(ids));
            }
            loading.try_set(false);
        });
    };

    reload();

    let loan_days = config.loan_days;
    let on_borrow = move |_| {
        let chosen = selection.with_untracked(|s| s.selected_ids());
        if chosen.is_empty() {
            validation.set(Some("Please select at least one book to borrow."));
            return;
        }
        validation.set(None);
        submitting.set(true);
        spawn_local(async move {
            match api.client().borrow_from_cart(chosen, loan_days, today_iso()).await {
                Ok(message) => {
                    notifier.success(message.unwrap_or_else(|| "Borrowed successfully!".to_string()));
                    reload();
                }
                Err(ApiError::Unauthorized) => {
                    notifier.info("Your session has expired. Please login again.");
                    router.navigate_to(AppRoute::Login);
                }
                Err(e) => {
                    log::warn!("[Cart] Borrow from cart failed: {}", e);
                    notifier.error(e.user_message("Failed to borrow books."));
                    reload();
                }
            }
            submitting.try_set(false);
        });
    };

    let selected_count = move || selection.with(|s| s.len());

    view! {
        <Header />
        <main class="max-w-7xl mx-auto px-4 md:px-8 py-8">
            <h2 class="text-2xl md:text-3xl font-bold mb-6">"My Cart"</h2>
            <div class="flex flex-col md:flex-row gap-8">
                <section class="flex-1">
                    <label class="label cursor-pointer justify-start gap-3 border-b pb-3">
                        <input
                            type="checkbox"
                            class="checkbox checkbox-primary"
                            prop:checked=move || selection.with(|s| s.is_all_selected())
                            on:change=move |_| selection.update(|s| s.toggle_all())
                        />
                        <span class="font-semibold">"Select All"</span>
                    </label>
                    <Show
                        when=move || !items.with(|c| c.is_empty())
                        fallback=move || {
                            let text = if loading.get() { "Loading..." } else { "Your cart is empty." };
                            view! { <div class="text-center py-12 text-base-content/50">{text}</div> }
                        }
                    >
                        <For
                            each=move || items.with(|c| c.items().to_vec())
                            key=|item| item.id
                            children=move |item| view! { <CartRow item=item selection=selection /> }
                        />
                    </Show>
                </section>

                <aside class="card bg-base-100 shadow-md md:w-80 h-fit">
                    <div class="card-body">
                        <h3 class="card-title">"Loan Summary"</h3>
                        <div class="flex justify-between">
                            <span>"Total Book"</span>
                            <span class="font-bold">{move || format!("{} Items", selected_count())}</span>
                        </div>
                        <Show when=move || validation.get().is_some()>
                            <div role="alert" class="alert alert-warning text-sm py-2">
                                {move || validation.get().unwrap_or_default()}
                            </div>
                        </Show>
                        <button
                            class="btn btn-primary rounded-full mt-4"
                            disabled=move || submitting.get() || selected_count() == 0
                            on:click=on_borrow
                        >
                            {move || if submitting.get() { "Borrowing..." } else { "Borrow Book" }}
                        </button>
                    </div>
                </aside>
            </div>
        </main>
    }
}

#[component]
fn CartRow(item: CartItem, selection: RwSignal<EntitySelection<CartItemId>>) -> impl IntoView {
    let id = item.id;
    let book = item.book;
    let category = book.category.map(|c| c.name).unwrap_or_default();

    view! {
        <div class="flex items-center gap-4 py-4 border-b">
            <input
                type="checkbox"
                class="checkbox checkbox-primary"
                prop:checked=move || selection.with(|s| s.is_selected(&id))
                on:change=move |_| selection.update(|s| s.toggle(id))
            />
            <img
                src=cover_src(book.cover_image.as_deref())
                alt=book.title.clone()
                class="w-16 h-24 object-cover rounded"
            />
            <div class="flex flex-col gap-1">
                <span class="badge badge-outline text-xs">{category}</span>
                <Link to=AppRoute::BookDetail(book.id) class="font-bold hover:underline">
                    {book.title.clone()}
                </Link>
                <span class="text-sm text-base-content/70">{book.author.name}</span>
            </div>
        </div>
    }
}
