use crate::api::FetchApi;
use crate::app::navigate;
use crate::router::AppRoute;
use network_client::forms::registration_outcome;
use network_client::{RegisterForm, Route, SocialApi};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Copy)]
pub enum Field {
    Username,
    Email,
    Password,
    Confirmation,
}

pub enum Msg {
    Update(Field, String),
    Submit,
    Done(Result<Route, String>),
}

pub struct RegisterPage {
    form: RegisterForm,
    submitting: bool,
    error: Option<String>,
    api: FetchApi,
}

impl RegisterPage {
    fn input(&self, ctx: &Context<Self>, field: Field, label: &'static str, kind: &'static str) -> Html {
        let value = match field {
            Field::Username => &self.form.username,
            Field::Email => &self.form.email,
            Field::Password => &self.form.password,
            Field::Confirmation => &self.form.confirmation,
        };
        let oninput = ctx.link().callback(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Update(field, input.value())
        });

        html! {
            <div class="form-group">
                <label>{ label }</label>
                <input class="form-control" type={kind} value={value.clone()} {oninput} />
            </div>
        }
    }
}

impl Component for RegisterPage {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            form: RegisterForm::default(),
            submitting: false,
            error: None,
            api: FetchApi::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Update(field, val) => {
                match field {
                    Field::Username => self.form.username = val,
                    Field::Email => self.form.email = val,
                    Field::Password => self.form.password = val,
                    Field::Confirmation => self.form.confirmation = val,
                }
                true
            }

            Msg::Submit => {
                if self.submitting {
                    return false;
                }
                self.error = None;

                let req = match self.form.validate() {
                    Ok(req) => req,
                    Err(message) => {
                        self.error = Some(message.to_string());
                        return true;
                    }
                };
                self.submitting = true;

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.register(&req).await;
                    link.send_message(Msg::Done(registration_outcome(result)));
                });
                true
            }

            Msg::Done(outcome) => {
                self.submitting = false;
                match outcome {
                    Ok(route) => navigate(ctx.link(), route),
                    Err(message) => self.error = Some(message),
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="row justify-content-center">
                <div class="col-md-6">
                    <h2 class="mb-4">{ "Register" }</h2>
                    if let Some(message) = &self.error {
                        <div class="alert alert-danger">{ message }</div>
                    }
                    <form {onsubmit}>
                        { self.input(ctx, Field::Username, "Username", "text") }
                        { self.input(ctx, Field::Email, "Email", "email") }
                        { self.input(ctx, Field::Password, "Password", "password") }
                        { self.input(ctx, Field::Confirmation, "Confirm Password", "password") }
                        <button type="submit" class="btn btn-primary" disabled={self.submitting}>
                            { if self.submitting { "Registering..." } else { "Register" } }
                        </button>
                    </form>
                    <p class="mt-3">
                        { "Already have an account? " }
                        <Link<AppRoute> to={AppRoute::Login}>{ "Log in here" }</Link<AppRoute>>
                    </p>
                </div>
            </div>
        }
    }
}
