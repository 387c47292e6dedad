use booky_shared::Book;
use leptos::prelude::*;

use crate::format::{cover_src, initials};
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 图书卡片（首页、分类、作者、相关推荐共用）
#[component]
pub fn BookCard(book: Book) -> impl IntoView {
    let cover = cover_src(book.cover_image.as_deref());
    let author = book.author.clone();
    let title = book.title.clone();
    let alt = book.title.clone();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <Link to=AppRoute::BookDetail(book.id)>
                <figure class="aspect-[5/7] bg-base-200">
                    <img src=cover alt=alt.clone() class="object-cover w-full h-full" />
                </figure>
            </Link>
            <div class="card-body p-3 gap-1">
                <Link to=AppRoute::BookDetail(book.id) class="font-bold line-clamp-2">
                    {title.clone()}
                </Link>
                {match author.id {
                    Some(id) => view! {
                        <Link to=AppRoute::Author(id) class="text-sm text-base-content/70 hover:underline">
                            {author.name.clone()}
                        </Link>
                    }
                    .into_any(),
                    None => view! {
                        <span class="text-sm text-base-content/70">{author.name.clone()}</span>
                    }
                    .into_any(),
                }}
                <span class="text-sm font-semibold">{format!("★ {}", book.rating)}</span>
            </div>
        </div>
    }
}

/// 图书网格，区分加载中与空列表
#[component]
pub fn BookGrid(
    #[prop(into)] books: Signal<Vec<Book>>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let class = if class.is_empty() {
        "grid grid-cols-2 md:grid-cols-4 gap-4".to_string()
    } else {
        class
    };

    view! {
        <div class=class>
            <Show
                when=move || !books.with(Vec::is_empty)
                fallback=move || {
                    let text = if loading.get() { "Loading..." } else { "No books found." };
                    view! { <div class="col-span-full text-center text-base-content/50 py-8">{text}</div> }
                }
            >
                <For
                    each=move || books.get()
                    key=|book| book.id
                    children=|book| view! { <BookCard book=book /> }
                />
            </Show>
        </div>
    }
}

/// 头像：有照片显示照片，否则显示姓名缩写
#[component]
pub fn Avatar(
    name: String,
    photo: Option<String>,
    #[prop(optional, into)] size_class: String,
) -> impl IntoView {
    let size_class = if size_class.is_empty() {
        "w-10 h-10".to_string()
    } else {
        size_class
    };

    match photo.filter(|p| !p.trim().is_empty()) {
        Some(src) => view! {
            <div class="avatar">
                <div class=format!("{} rounded-full", size_class)>
                    <img src=src alt=name />
                </div>
            </div>
        }
        .into_any(),
        None => view! {
            <div class="avatar placeholder">
                <div class=format!("{} rounded-full bg-primary text-primary-content", size_class)>
                    <span class="font-bold">{initials(&name)}</span>
                </div>
            </div>
        }
        .into_any(),
    }
}
