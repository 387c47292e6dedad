use booky_shared::date::format_review_time;
use booky_shared::protocol::ListBooksRequest;
use booky_shared::{Book, Review};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::AddToCartOutcome;
use crate::auth::{use_api, use_auth};
use crate::components::book_card::{Avatar, BookCard};
use crate::components::header::Header;
use crate::config::use_config;
use crate::error::ApiError;
use crate::format::{cover_src, review_average, review_count_label};
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 图书详情页
#[component]
pub fn BookDetailPage(book_id: u64) -> impl IntoView {
    let config = use_config();
    let api = use_api();

    let book = RwSignal::new(Option::<Book>::None);
    let related = RwSignal::new(Vec::<Book>::new());
    let loading = RwSignal::new(true);

    spawn_local(async move {
        match api.client().get_book(book_id).await {
            Ok(data) => {
                book.try_set(Some(data));
            }
            Err(e) => log::warn!("[BookDetail] Failed to load book #{}: {}", book_id, e),
        }
        loading.try_set(false);
    });

    let related_limit = config.related_limit;
    spawn_local(async move {
        let request = ListBooksRequest {
            page: 1,
            limit: related_limit,
            ..Default::default()
        };
        let books = match api.client().list_books(request).await {
            Ok(page) => page.items.into_iter().filter(|b| b.id != book_id).collect(),
            Err(e) => {
                log::warn!("[BookDetail] Failed to load related books: {}", e);
                Vec::new()
            }
        };
        related.try_set(books);
    });

    view! {
        <Header />
        <main class="max-w-7xl mx-auto px-4 md:px-8 py-8">
            {move || {
                if loading.get() {
                    return view! { <div class="text-center py-20 text-lg">"Loading..."</div> }.into_any();
                }
                match book.get() {
                    Some(book) => view! {
                        <BookSummary book=book.clone() />
                        <div class="divider my-12"></div>
                        <ReviewList reviews=book.reviews />
                    }
                    .into_any(),
                    None => view! {
                        <div class="text-center py-20 text-lg text-error">"Book not found."</div>
                    }
                    .into_any(),
                }
            }}
            <div class="divider my-12"></div>
            <section>
                <h3 class="text-2xl font-extrabold mb-4">"Related Books"</h3>
                <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                    <For
                        each=move || related.get()
                        key=|book| book.id
                        children=|book| view! { <BookCard book=book /> }
                    />
                </div>
            </section>
        </main>
    }
}

/// 封面、基本信息与操作按钮
#[component]
fn BookSummary(book: Book) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let config = use_config();
    let router = use_router();
    let notifier = use_notifier();
    let busy = RwSignal::new(false);

    let book_id = book.id;
    let loan_days = config.loan_days;

    // 未登录时提示并跳转登录页，返回 false
    let require_login = move |message: &str| {
        if auth.is_authenticated() {
            return true;
        }
        notifier.info(message);
        router.navigate_to(AppRoute::Login);
        false
    };

    let on_add_to_cart = move |_| {
        if !require_login("Please login to add books to your cart.") {
            return;
        }
        busy.set(true);
        spawn_local(async move {
            match api.client().add_to_cart(book_id).await {
                Ok(AddToCartOutcome::Added) => {
                    notifier.success("Book added to cart!");
                    router.navigate_to(AppRoute::Cart);
                }
                Ok(AddToCartOutcome::AlreadyInCart) => {
                    notifier.info("Book already in cart!");
                    router.navigate_to(AppRoute::Cart);
                }
                Err(ApiError::Unauthorized) => {
                    notifier.info("Your session has expired. Please login again.");
                    router.navigate_to(AppRoute::Login);
                }
                Err(e) => {
                    log::warn!("[BookDetail] Add to cart failed: {}", e);
                    notifier.error(e.user_message("Failed to add to cart."));
                }
            }
            busy.try_set(false);
        });
    };

    let on_borrow = move |_| {
        if !require_login("Please login to borrow books.") {
            return;
        }
        busy.set(true);
        spawn_local(async move {
            match api.client().borrow_book(book_id, loan_days).await {
                Ok(()) => notifier.success("Book borrowed!"),
                Err(ApiError::Unauthorized) => {
                    notifier.info("Your session has expired. Please login again.");
                    router.navigate_to(AppRoute::Login);
                }
                Err(e) => {
                    log::warn!("[BookDetail] Borrow failed: {}", e);
                    notifier.error(e.user_message("Failed to borrow book."));
                }
            }
            busy.try_set(false);
        });
    };

    let category = book.category.clone();
    let author = book.author.clone();

    view! {
        <div class="text-sm breadcrumbs mb-6">
            <ul>
                <li><Link to=AppRoute::Home>"Home"</Link></li>
                {category.clone().map(|c| view! {
                    <li><Link to=AppRoute::Category(c.id)>{c.name}</Link></li>
                })}
                <li class="font-semibold">{book.title.clone()}</li>
            </ul>
        </div>
        <div class="flex flex-col md:flex-row gap-8">
            <img
                src=cover_src(book.cover_image.as_deref())
                alt=book.title.clone()
                class="w-full max-w-xs object-cover rounded-lg mx-auto md:mx-0"
            />
            <div class="flex-1 flex flex-col gap-2">
                {category.map(|c| view! { <span class="badge badge-outline font-bold">{c.name}</span> })}
                <h2 class="text-3xl font-bold">{book.title.clone()}</h2>
                {match author.id {
                    Some(id) => view! {
                        <Link to=AppRoute::Author(id) class="text-base-content/70 hover:underline">
                            {author.name.clone()}
                        </Link>
                    }
                    .into_any(),
                    None => view! { <span class="text-base-content/70">{author.name.clone()}</span> }.into_any(),
                }}
                <span class="font-bold">{format!("★ {}", book.rating)}</span>

                <div class="stats stats-horizontal shadow w-fit my-2">
                    <div class="stat px-4 py-2">
                        <div class="stat-value text-xl">{book.total_copies}</div>
                        <div class="stat-desc">"Copies"</div>
                    </div>
                    <div class="stat px-4 py-2">
                        <div class="stat-value text-xl">{book.available_copies}</div>
                        <div class="stat-desc">"Available"</div>
                    </div>
                    <div class="stat px-4 py-2">
                        <div class="stat-value text-xl">{book.review_count}</div>
                        <div class="stat-desc">"Reviews"</div>
                    </div>
                </div>

                <div class="font-semibold mt-4">"Description"</div>
                <p class="text-base-content/80">{book.description.clone().unwrap_or_default()}</p>

                <div class="flex gap-3 mt-6">
                    <button
                        class="btn btn-outline rounded-full md:w-48"
                        disabled=move || busy.get()
                        on:click=on_add_to_cart
                    >
                        "Add to Cart"
                    </button>
                    <button
                        class="btn btn-primary rounded-full md:w-48"
                        disabled=move || busy.get()
                        on:click=on_borrow
                    >
                        "Borrow Book"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ReviewList(reviews: Vec<Review>) -> impl IntoView {
    let average = review_average(&reviews);
    let label = review_count_label(reviews.len());

    view! {
        <section>
            <h3 class="text-3xl font-extrabold mb-2">"Review"</h3>
            <div class="flex items-center gap-2 mb-6 text-xl font-extrabold">
                <span>{format!("★ {}", average)}</span>
                <span>{format!("({})", label)}</span>
            </div>
            <div class="grid md:grid-cols-2 gap-4">
                {reviews
                    .into_iter()
                    .map(|review| {
                        let stars: String = (0..5u8)
                            .map(|i| if i < review.star { '★' } else { '☆' })
                            .collect();
                        view! {
                            <div class="card bg-base-200 shadow">
                                <div class="card-body p-4 gap-2">
                                    <div class="flex items-center gap-3">
                                        <Avatar name=review.user.name.clone() photo=None size_class="w-14 h-14 text-xl" />
                                        <div>
                                            <div class="font-extrabold">{review.user.name.clone()}</div>
                                            <div class="text-sm">{format_review_time(&review.created_at)}</div>
                                        </div>
                                    </div>
                                    <div class="text-warning text-lg">{stars}</div>
                                    <p class="font-semibold">{review.comment}</p>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
