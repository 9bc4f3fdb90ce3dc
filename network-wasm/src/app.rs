use crate::api::FetchApi;
use crate::components::Navbar;
use crate::router::{switch, AppRoute};
use crate::storage::LocalIdentityStore;
use network_client::error::NetworkClientError;
use network_client::session::report_logout;
use network_client::{LoginForm, Session, SessionStore, SocialApi, User};
use wasm_bindgen_futures::spawn_local;
use yew::context::ContextHandle;
use yew::html::Scope;
use yew::prelude::*;
use yew_router::prelude::*;

/// Session state shared with every page, plus the actions that change it.
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub session: Session,
    pub loading: bool,
    pub error: Option<String>,
    pub on_login: Callback<LoginForm>,
    pub on_logout: Callback<()>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            session: Session::Anonymous,
            loading: false,
            error: None,
            on_login: Callback::noop(),
            on_logout: Callback::noop(),
        }
    }
}

/// Subscribes a struct component to session changes.
pub fn subscribe<C: Component>(
    link: &Scope<C>,
    on_change: Callback<SessionContext>,
) -> (SessionContext, Option<ContextHandle<SessionContext>>) {
    match link.context::<SessionContext>(on_change) {
        Some((session, handle)) => (session, Some(handle)),
        None => (SessionContext::default(), None),
    }
}

/// Pushes a client route onto the browser history.
pub fn navigate<C: Component>(link: &Scope<C>, route: network_client::Route) {
    match link.navigator() {
        Some(navigator) => navigator.push(&AppRoute::from(route)),
        None => log::warn!("No router available to navigate to {}", route),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <SessionRoot />
        </BrowserRouter>
    }
}

pub enum Msg {
    Login(LoginForm),
    LoginDone(Result<User, NetworkClientError>),
    Logout,
}

pub struct SessionRoot {
    sessions: SessionStore<LocalIdentityStore>,
    api: FetchApi,
    on_login: Callback<LoginForm>,
    on_logout: Callback<()>,
}

impl Component for SessionRoot {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut sessions = SessionStore::new(LocalIdentityStore);
        sessions.restore();

        Self {
            sessions,
            api: FetchApi::default(),
            on_login: ctx.link().callback(Msg::Login),
            on_logout: ctx.link().callback(|_| Msg::Logout),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Login(form) => {
                let Some(req) = form.request() else {
                    return false;
                };
                self.sessions.begin_login();

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.login(&req).await;
                    link.send_message(Msg::LoginDone(result));
                });
                true
            }

            Msg::LoginDone(result) => {
                if let Some(route) = self.sessions.finish_login(result) {
                    navigate(ctx.link(), route);
                }
                true
            }

            Msg::Logout => {
                let route = self.sessions.logout_local();

                let api = self.api.clone();
                spawn_local(async move {
                    report_logout(api.logout().await);
                });

                navigate(ctx.link(), route);
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let context = SessionContext {
            session: self.sessions.session().clone(),
            loading: self.sessions.is_loading(),
            error: self.sessions.error().map(str::to_string),
            on_login: self.on_login.clone(),
            on_logout: self.on_logout.clone(),
        };

        html! {
            <ContextProvider<SessionContext> {context}>
                <Navbar />
                <main class="container py-4">
                    <Switch<AppRoute> render={switch} />
                </main>
            </ContextProvider<SessionContext>>
        }
    }
}
