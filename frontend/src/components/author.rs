use booky_shared::{Author, Book};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_api;
use crate::components::book_card::{Avatar, BookGrid};
use crate::components::header::Header;
use crate::config::use_config;

/// 作者页：作者卡片 + 作品列表
#[component]
pub fn AuthorPage(author_id: u64) -> impl IntoView {
    let config = use_config();
    let api = use_api();

    let author = RwSignal::new(Option::<Author>::None);
    let books = RwSignal::new(Vec::<Book>::new());
    let book_count = RwSignal::new(0u32);
    let loading = RwSignal::new(true);

    let limit = config.author_page_size;
    spawn_local(async move {
        match api.client().author_books(author_id, limit).await {
            Ok(data) => {
                author.try_set(data.author);
                books.try_set(data.books);
                book_count.try_set(data.book_count);
            }
            Err(e) => {
                log::warn!("[Author] Failed to load author #{}: {}", author_id, e);
                books.try_set(Vec::new());
            }
        }
        loading.try_set(false);
    });

    view! {
        <Header />
        <main class="max-w-7xl mx-auto px-4 md:px-8 py-8">
            <div class="card bg-base-100 shadow-md mb-10">
                <div class="card-body flex-row items-center gap-6">
                    {move || {
                        let (name, photo) = author.with(|a| match a {
                            Some(a) => (a.name.clone(), a.profile_photo.clone()),
                            None => (String::new(), None),
                        });
                        view! { <Avatar name=name photo=photo size_class="w-20 h-20 text-2xl" /> }
                    }}
                    <div>
                        <div class="font-semibold text-lg md:text-2xl">
                            {move || {
                                author
                                    .with(|a| a.as_ref().map(|a| a.name.clone()))
                                    .unwrap_or_else(|| "Author name".to_string())
                            }}
                        </div>
                        <div class="text-base-content/70 mt-2">
                            {move || format!("{} books", book_count.get())}
                        </div>
                    </div>
                </div>
            </div>

            <h2 class="text-xl md:text-2xl font-bold mb-6">"Book List"</h2>
            <BookGrid books=books loading=loading class="grid grid-cols-2 md:grid-cols-5 gap-6" />
        </main>
    }
}
