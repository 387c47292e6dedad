use booky_shared::AdminUser;
use booky_shared::date::format_created_at;
use leptos::prelude::*;

use crate::api::UserDirectory;
use crate::auth::use_api;
use crate::components::header::Header;
use crate::components::pager::Pager;
use crate::config::use_config;
use crate::state::pagination::{LoadMode, PaginationController, spawn_page_load};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Borrowed,
    Users,
    Books,
}

impl AdminTab {
    const ALL: [AdminTab; 3] = [AdminTab::Borrowed, AdminTab::Users, AdminTab::Books];

    fn label(self) -> &'static str {
        match self {
            AdminTab::Borrowed => "Borrowed List",
            AdminTab::Users => "User",
            AdminTab::Books => "Book List",
        }
    }
}

/// 管理后台：用户列表（搜索 + 页码分页）
#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let config = use_config();
    let api = use_api();

    let active_tab = RwSignal::new(AdminTab::Users);
    let search = RwSignal::new(String::new());
    let pager = RwSignal::new(PaginationController::<AdminUser, String>::new(
        config.admin_page_size,
        LoadMode::Replace,
    ));

    let directory = move || UserDirectory {
        api: api.client(),
        search: search.get_untracked(),
    };

    // 搜索词变化时回到第一页
    Effect::new(move |_| {
        let query = search.get();
        if pager.try_update(|p| p.set_query_key(query)).unwrap_or(false) {
            spawn_page_load(pager, directory(), 1);
        }
    });

    let on_select_page = Callback::new(move |page: u32| {
        spawn_page_load(pager, directory(), page);
    });

    let window = Signal::derive(move || pager.with(|p| p.window()));
    let current = Signal::derive(move || pager.with(|p| p.current_page()));
    let can_previous = Signal::derive(move || pager.with(|p| p.can_go_previous() && !p.is_loading()));
    let can_next = Signal::derive(move || pager.with(|p| p.has_more() && !p.is_loading()));

    // 每行带上序号：(page - 1) * limit + idx + 1
    let rows = move || {
        pager.with(|p| {
            let first = p.first_row_number();
            p.items()
                .iter()
                .cloned()
                .enumerate()
                .map(|(idx, user)| (first + idx as u32, user))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <Header />
        <main class="max-w-7xl mx-auto px-4 md:px-8 py-8">
            <div role="tablist" class="tabs tabs-boxed w-fit mb-6">
                {AdminTab::ALL
                    .into_iter()
                    .map(|tab| {
                        view! {
                            <button
                                role="tab"
                                class=move || if active_tab.get() == tab { "tab tab-active" } else { "tab" }
                                on:click=move |_| active_tab.set(tab)
                            >
                                {tab.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <Show
                when=move || active_tab.get() == AdminTab::Users
                fallback=|| view! {
                    <div class="text-center py-12 text-base-content/50">"Coming soon."</div>
                }
            >
                <h2 class="text-xl md:text-2xl font-bold mb-4">"User"</h2>
                <input
                    type="text"
                    placeholder="Search user"
                    class="input input-bordered rounded-full w-full md:max-w-xl mb-6"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />

                <div class="card bg-base-100 shadow-md overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"No"</th>
                                <th>"Name"</th>
                                <th>"Nomor Handphone"</th>
                                <th>"Email"</th>
                                <th>"Created at"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show
                                when=move || !pager.with(|p| p.items().is_empty())
                                fallback=move || {
                                    let text = if pager.with(|p| p.is_loading()) {
                                        "Loading..."
                                    } else {
                                        "No users found."
                                    };
                                    view! {
                                        <tr>
                                            <td colspan="5" class="text-center py-8 text-base-content/50">{text}</td>
                                        </tr>
                                    }
                                }
                            >
                                <For
                                    each=rows
                                    key=|(number, user)| (*number, user.id)
                                    children=|(number, user)| {
                                        view! {
                                            <tr>
                                                <td>{number}</td>
                                                <td>{user.name}</td>
                                                <td>{user.phone.filter(|p| !p.is_empty()).unwrap_or_else(|| "-".to_string())}</td>
                                                <td>{user.email}</td>
                                                <td>{format_created_at(&user.created_at)}</td>
                                            </tr>
                                        }
                                    }
                                />
                            </Show>
                        </tbody>
                    </table>
                </div>

                <div class="flex justify-between items-center mt-4">
                    <span class="text-sm text-base-content/70">
                        {move || pager.with(|p| format!("Showing {} entries", p.total_items()))}
                    </span>
                    <Pager
                        window=window
                        current=current
                        can_previous=can_previous
                        can_next=can_next
                        on_select=on_select_page
                    />
                </div>
            </Show>
        </main>
    }
}
