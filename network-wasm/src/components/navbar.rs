use crate::app::SessionContext;
use crate::router::AppRoute;
use network_client::Session;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(Navbar)]
pub fn navbar() -> Html {
    let context = use_context::<SessionContext>().unwrap_or_default();

    let links = match &context.session {
        Session::Authenticated(identity) => {
            let on_logout = context.on_logout.reform(|_: MouseEvent| ());
            html! {
                <>
                    <li class="nav-item">
                        <Link<AppRoute> classes="nav-link" to={AppRoute::Following}>{ "Following" }</Link<AppRoute>>
                    </li>
                    <li class="nav-item">
                        <Link<AppRoute> classes="nav-link" to={AppRoute::Profile { id: identity.id }}>
                            { &identity.username }
                        </Link<AppRoute>>
                    </li>
                    <li class="nav-item">
                        <button class="btn btn-link nav-link" onclick={on_logout}>{ "Log Out" }</button>
                    </li>
                </>
            }
        }
        Session::Anonymous => html! {
            <>
                <li class="nav-item">
                    <Link<AppRoute> classes="nav-link" to={AppRoute::Login}>{ "Log In" }</Link<AppRoute>>
                </li>
                <li class="nav-item">
                    <Link<AppRoute> classes="nav-link" to={AppRoute::Register}>{ "Register" }</Link<AppRoute>>
                </li>
            </>
        },
    };

    html! {
        <nav class="navbar navbar-expand navbar-light bg-light">
            <div class="container">
                <Link<AppRoute> classes="navbar-brand" to={AppRoute::Home}>{ "Network" }</Link<AppRoute>>
                <ul class="navbar-nav mr-auto">
                    <li class="nav-item">
                        <Link<AppRoute> classes="nav-link" to={AppRoute::Home}>{ "All Posts" }</Link<AppRoute>>
                    </li>
                    { links }
                </ul>
            </div>
        </nav>
    }
}
