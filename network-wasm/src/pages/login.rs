use crate::app::{subscribe, SessionContext};
use crate::router::AppRoute;
use network_client::LoginForm;
use web_sys::HtmlInputElement;
use yew::context::ContextHandle;
use yew::prelude::*;
use yew_router::prelude::*;

pub enum Msg {
    Session(SessionContext),
    UpdateUsername(String),
    UpdatePassword(String),
    Submit,
}

pub struct LoginPage {
    form: LoginForm,
    missing_fields: bool,
    session: SessionContext,
    _session_handle: Option<ContextHandle<SessionContext>>,
}

impl Component for LoginPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = subscribe(ctx.link(), ctx.link().callback(Msg::Session));

        Self {
            form: LoginForm::default(),
            missing_fields: false,
            session,
            _session_handle: handle,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Session(session) => {
                self.session = session;
                true
            }
            Msg::UpdateUsername(val) => {
                self.form.username = val;
                true
            }
            Msg::UpdatePassword(val) => {
                self.form.password = val;
                true
            }
            Msg::Submit => {
                self.missing_fields = self.form.request().is_none();
                if !self.missing_fields {
                    self.session.on_login.emit(self.form.clone());
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let error = if self.missing_fields {
            Some("Username and password are required")
        } else {
            self.session.error.as_deref()
        };
        let loading = self.session.loading;

        html! {
            <div class="row justify-content-center">
                <div class="col-md-6">
                    <h2 class="mb-4">{ "Log In" }</h2>
                    if let Some(message) = error {
                        <div class="alert alert-danger">{ message }</div>
                    }
                    <form onsubmit={link.callback(|e: SubmitEvent| {
                        e.prevent_default();
                        Msg::Submit
                    })}>
                        <div class="form-group">
                            <label for="username">{ "Username" }</label>
                            <input id="username" class="form-control" type="text"
                                value={self.form.username.clone()}
                                oninput={link.callback(|e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    Msg::UpdateUsername(input.value())
                                })} />
                        </div>
                        <div class="form-group">
                            <label for="password">{ "Password" }</label>
                            <input id="password" class="form-control" type="password"
                                value={self.form.password.clone()}
                                oninput={link.callback(|e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    Msg::UpdatePassword(input.value())
                                })} />
                        </div>
                        <button type="submit" class="btn btn-primary" disabled={loading}>
                            { if loading { "Logging in..." } else { "Log In" } }
                        </button>
                    </form>
                    <p class="mt-3">
                        { "Don't have an account? " }
                        <Link<AppRoute> to={AppRoute::Register}>{ "Register here" }</Link<AppRoute>>
                    </p>
                </div>
            </div>
        }
    }
}
