//! List Picker Component
//!
//! Every board, each linking to its access page.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::models::{format_date, List, NewList};
use crate::routes::{access_path, use_navigator};

#[component]
pub fn ListPicker() -> impl IntoView {
    let ctx = use_app_context();
    let navigator = use_navigator();
    let (lists, set_lists) = signal(Vec::<List>::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(true);

    {
        let ctx = ctx.clone();
        spawn_local(async move {
            match ctx.api.fetch_lists().await {
                Ok(loaded) => {
                    log::info!("[APP] loaded {} lists", loaded.len());
                    set_lists.set(loaded);
                }
                Err(e) => {
                    log::error!("[APP] could not load lists: {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    }

    view! {
        <div class="list-picker">
            <h1>"Mes pense-bêtes"</h1>
            <NewListForm on_created=move |list: List| set_lists.update(|lists| lists.push(list)) />
            {move || error.get().map(|message| view! { <div class="alert" role="alert">{message}</div> })}
            <Show when=move || loading.get()>
                <div class="spinner"></div>
            </Show>
            <ul class="list-cards">
                <For
                    each=move || lists.get()
                    key=|list| list.id
                    children=move |list: List| {
                        let path = access_path(list.id);
                        view! {
                            <li class="list-card" on:click=move |_| navigator.go(&path)>
                                <h3>{list.name}</h3>
                                <p>{list.description.unwrap_or_else(|| "Aucune description".to_string())}</p>
                                <p class="list-created">"Créée le " {format_date(&list.created_at)}</p>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}

/// Inline form creating a board protected by an access code
#[component]
fn NewListForm(#[prop(into)] on_created: Callback<List>) -> impl IntoView {
    let ctx = use_app_context();
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (access_code, set_access_code) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let ctx = ctx.clone();
        let name_value = name.get_untracked().trim().to_string();
        let description_value = description.get_untracked().trim().to_string();
        let code_value = access_code.get_untracked();
        if name_value.is_empty() || code_value.is_empty() {
            return;
        }
        spawn_local(async move {
            let new_list = NewList {
                name: &name_value,
                description: (!description_value.is_empty()).then_some(description_value.as_str()),
                access_code: &code_value,
            };
            match ctx.api.create_list(&new_list).await {
                Ok(list) => {
                    set_error.set(None);
                    set_name.set(String::new());
                    set_description.set(String::new());
                    set_access_code.set(String::new());
                    on_created.run(list);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <form class="new-list-form" on:submit=submit>
            <input
                type="text"
                placeholder="Nom de la liste"
                required
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Code d'accès"
                required
                prop:value=move || access_code.get()
                on:input=move |ev| set_access_code.set(event_target_value(&ev))
            />
            <button type="submit" class="btn">"Créer la liste"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}
