//! Access Page Component
//!
//! User name + access code form for one list. A still-valid token skips
//! straight to the board.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::error::ApiError;
use crate::routes::{board_path, use_navigator, LISTS_PATH};

/// Delay before leaving the page after a wrong code
const INCORRECT_CODE_REDIRECT_MS: u32 = 2_000;

#[component]
pub fn AccessPage(list_id: i64) -> impl IntoView {
    let ctx = use_app_context();
    let navigator = use_navigator();
    let (user_name, set_user_name) = signal(String::new());
    let (access_code, set_access_code) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    if ctx.session.has_access_to_list(list_id) {
        let ctx = ctx.clone();
        spawn_local(async move {
            if ctx.api.validate_token(list_id).await {
                navigator.go(&board_path(list_id));
            }
        });
    }

    let submit = {
        let ctx = ctx.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if submitting.get_untracked() {
                return;
            }
            set_error.set(None);
            set_submitting.set(true);

            let ctx = ctx.clone();
            let name = user_name.get_untracked().trim().to_string();
            let code = access_code.get_untracked();
            spawn_local(async move {
                match ctx.api.verify_with_user(list_id, &code, &name).await {
                    Ok(_) => {
                        set_submitting.set(false);
                        navigator.go(&board_path(list_id));
                    }
                    Err(e) => {
                        set_error.set(Some(e.to_string()));
                        set_submitting.set(false);
                        if e == ApiError::IncorrectCode {
                            ctx.session.remove_token();
                            TimeoutFuture::new(INCORRECT_CODE_REDIRECT_MS).await;
                            navigator.go(LISTS_PATH);
                        }
                    }
                }
            });
        }
    };

    let back = move |_: web_sys::MouseEvent| navigator.go(LISTS_PATH);

    view! {
        <div class="access-page">
            <button class="back-btn" on:click=back>"← Retour aux listes"</button>
            <form class="access-form" on:submit=submit>
                <h2>"Accès à la liste"</h2>
                <label for="user-name">"Votre nom"</label>
                <input
                    id="user-name"
                    type="text"
                    required
                    prop:value=move || user_name.get()
                    on:input=move |ev| set_user_name.set(event_target_value(&ev))
                />
                <label for="access-code">"Code d'accès"</label>
                <input
                    id="access-code"
                    type="text"
                    required
                    prop:value=move || access_code.get()
                    on:input=move |ev| set_access_code.set(event_target_value(&ev))
                />
                {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
                <button type="submit" class="btn" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Vérification..." } else { "Accéder à la liste" }}
                </button>
            </form>
        </div>
    }
}
