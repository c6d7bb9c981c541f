//! Info Dialog Component
//!
//! One-time notice shown from the board's info button.

use leptos::prelude::*;

const BUG_REPORT_MAILTO: &str = "mailto:contact@capiomont.fr?subject=Signalement%20de%20bug%20-%20mespensebetes";

/// `on_close` receives true when the user asked not to be reminded
#[component]
pub fn InfoDialog(#[prop(into)] on_close: Callback<bool>) -> impl IntoView {
    let (do_not_remind, set_do_not_remind) = signal(false);
    let close = move |_| on_close.run(do_not_remind.get_untracked());

    view! {
        <div class="modal-backdrop">
            <div class="modal info-dialog">
                <button class="modal-close" aria-label="Fermer" on:click=close>"×"</button>
                <h3>"Information"</h3>
                <p>"Ce site est actuellement en cours de développement."</p>
                <a class="btn" href=BUG_REPORT_MAILTO>"Signaler un bug"</a>
                <label class="do-not-remind">
                    <input
                        type="checkbox"
                        prop:checked=move || do_not_remind.get()
                        on:change=move |ev| set_do_not_remind.set(event_target_checked(&ev))
                    />
                    "Merci de l'info, ne pas me rappeler"
                </label>
            </div>
        </div>
    }
}
