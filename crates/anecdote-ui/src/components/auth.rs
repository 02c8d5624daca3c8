//! Email/password auth panel.
//!
//! Session changes themselves arrive through the backend's auth listener; this panel
//! only runs the requests and writes their outcome to the status line.

use crate::app::AppCtx;
use crate::core::session::{AuthFeedback, sign_in_feedback, sign_out_feedback, sign_up_feedback};
use crate::core::store::AppStore;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthAction {
    SignUp,
    SignIn,
    SignOut,
}

#[function_component(AuthPanel)]
pub(crate) fn auth_panel() -> Html {
    let ctx = use_context::<AppCtx>();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let session = use_selector(|store: &AppStore| store.auth.session.clone());
    let status = use_selector(|store: &AppStore| store.auth.status.clone());
    let busy = use_selector(|store: &AppStore| store.auth.busy);
    let dispatch = Dispatch::<AppStore>::new();
    let controls = session.controls();

    {
        let email = email.clone();
        let password = password.clone();
        use_effect_with_deps(
            move |_| {
                email.set(String::new());
                password.set(String::new());
                || ()
            },
            session.clone(),
        );
    }

    let run = {
        let email = email.clone();
        let password = password.clone();
        Callback::from(move |action: AuthAction| {
            let Some(backend) = ctx.as_ref().map(|ctx| ctx.backend.clone()) else {
                return;
            };
            let email = email.clone();
            let password = password.clone();
            let dispatch = dispatch.clone();
            dispatch.reduce_mut(|store| store.auth.busy = true);
            yew::platform::spawn_local(async move {
                let feedback = match action {
                    AuthAction::SignUp => {
                        sign_up_feedback(&backend.sign_up(&email, &password).await)
                    }
                    AuthAction::SignIn => {
                        sign_in_feedback(&backend.sign_in(&email, &password).await)
                    }
                    AuthAction::SignOut => sign_out_feedback(&backend.sign_out().await),
                };
                apply_feedback(&dispatch, &password, feedback);
            });
        })
    };

    let on_email = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };
    let click = |action: AuthAction| {
        let run = run.clone();
        Callback::from(move |_: MouseEvent| run.emit(action))
    };

    let credentials_style = if controls.credentials { "display: block;" } else { "display: none;" };
    let sign_out_style = if controls.sign_out { "display: block;" } else { "display: none;" };

    html! {
        <div class="auth-container">
            <input
                id="auth-email"
                type="email"
                placeholder="邮箱"
                style={credentials_style}
                value={(*email).clone()}
                oninput={on_email}
            />
            <input
                id="auth-password"
                type="password"
                placeholder="密码"
                style={credentials_style}
                value={(*password).clone()}
                oninput={on_password}
            />
            <button id="auth-signup" style={credentials_style} disabled={*busy} onclick={click(AuthAction::SignUp)}>
                {"注册"}
            </button>
            <button id="auth-signin" style={credentials_style} disabled={*busy} onclick={click(AuthAction::SignIn)}>
                {"登录"}
            </button>
            <button id="auth-signout" style={sign_out_style} disabled={*busy} onclick={click(AuthAction::SignOut)}>
                {"登出"}
            </button>
            <div id="auth-status">{(*status).clone()}</div>
        </div>
    }
}

fn apply_feedback(
    dispatch: &Dispatch<AppStore>,
    password: &UseStateHandle<String>,
    feedback: AuthFeedback,
) {
    if feedback.clear_password {
        password.set(String::new());
    }
    let AuthFeedback { message, .. } = feedback;
    dispatch.reduce_mut(move |store| {
        store.auth.busy = false;
        store.auth.status = message;
    });
}
