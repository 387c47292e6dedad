use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::book_card::Avatar;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 顶部导航栏，随会话信号更新（包括其他标签页的登录 / 注销）
#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let session = auth.session_signal();

    let on_logout = move |_| {
        logout(&auth);
        notifier.info("You have been logged out.");
        router.navigate_to(AppRoute::Home);
    };

    view! {
        <header class="navbar bg-base-100 border-b px-4 md:px-16 sticky top-0 z-40">
            <div class="flex-1">
                <Link to=AppRoute::Home class="btn btn-ghost text-xl font-extrabold gap-2">
                    <img src="/logos/booky_logo.svg" alt="Booky" class="w-8 h-8" />
                    "Booky"
                </Link>
            </div>
            <div class="flex-none gap-2">
                <Show
                    when=move || session.with(|s| s.is_authenticated())
                    fallback=|| view! {
                        <Link to=AppRoute::Login class="btn btn-outline rounded-full">"Login"</Link>
                        <Link to=AppRoute::Register class="btn btn-primary rounded-full">"Register"</Link>
                    }
                >
                    <Show when=move || session.with(|s| s.is_admin())>
                        <Link to=AppRoute::Admin class="btn btn-ghost">"Dashboard"</Link>
                    </Show>
                    <Link to=AppRoute::Cart class="btn btn-ghost">"Cart"</Link>
                    {move || {
                        session.with(|s| {
                            s.user().map(|user| {
                                view! {
                                    <div class="flex items-center gap-2">
                                        <Avatar name=user.name.clone() photo=user.profile_photo.clone() />
                                        <span class="hidden md:inline font-semibold">{user.name.clone()}</span>
                                    </div>
                                }
                            })
                        })
                    }}
                    <button class="btn btn-outline btn-error btn-sm" on:click=on_logout>
                        "Logout"
                    </button>
                </Show>
            </div>
        </header>
    }
}
