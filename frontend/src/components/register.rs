use booky_shared::protocol::RegisterRequest;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{register, use_api, validate_registration};
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let notifier = use_notifier();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let request = RegisterRequest {
            name: name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            phone: phone.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if let Err(msg) = validate_registration(&request) {
            set_error_msg.set(Some(msg.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match register(api.client(), request).await {
                Ok(message) => {
                    notifier.success(message.unwrap_or_else(|| "Registration successful. Please login.".to_string()));
                    router.navigate_to(AppRoute::Login);
                }
                Err(e) => {
                    log::warn!("[Register] {}", e);
                    set_error_msg.try_set(Some(e.user_message("Registration failed. Please try again.")));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    // (id, 标签, 类型, 绑定的信号)
    let fields = [
        ("name", "Name", "text", name),
        ("email", "Email", "email", email),
        ("phone", "Nomor Handphone", "tel", phone),
        ("password", "Password", "password", password),
    ];

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="card-title text-2xl">"Register"</h2>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {fields
                            .into_iter()
                            .map(|(id, label, kind, value)| {
                                view! {
                                    <div class="form-control">
                                        <label class="label" for=id>
                                            <span class="label-text">{label}</span>
                                        </label>
                                        <input
                                            id=id
                                            type=kind
                                            on:input=move |ev| value.set(event_target_value(&ev))
                                            prop:value=value
                                            class="input input-bordered"
                                        />
                                    </div>
                                }
                            })
                            .collect_view()}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary rounded-full" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Submitting..." } else { "Submit" }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Log In"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
