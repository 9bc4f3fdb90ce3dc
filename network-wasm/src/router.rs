use crate::pages::{FollowingPage, HomePage, LoginPage, ProfilePage, RegisterPage};
use network_client::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Debug, Clone, Copy, Routable, PartialEq, Eq)]
pub enum AppRoute {
    #[at("/")]
    Home,
    #[at("/following")]
    Following,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/profile/:id")]
    Profile { id: i64 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<Route> for AppRoute {
    fn from(route: Route) -> Self {
        match route {
            Route::Home => AppRoute::Home,
            Route::Following => AppRoute::Following,
            Route::Login => AppRoute::Login,
            Route::Register => AppRoute::Register,
            Route::Profile(id) => AppRoute::Profile { id },
        }
    }
}

pub fn switch(route: AppRoute) -> Html {
    match route {
        AppRoute::Home => html! { <HomePage /> },
        AppRoute::Following => html! { <FollowingPage /> },
        AppRoute::Login => html! { <LoginPage /> },
        AppRoute::Register => html! { <RegisterPage /> },
        AppRoute::Profile { id } => html! { <ProfilePage {id} /> },
        AppRoute::NotFound => html! {
            <div class="container mt-4">
                <h2>{ "Page not found" }</h2>
                <Link<AppRoute> to={AppRoute::Home}>{ "Back to the feed" }</Link<AppRoute>>
            </div>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_routes_map_to_matching_paths() {
        for route in [
            Route::Home,
            Route::Following,
            Route::Login,
            Route::Register,
            Route::Profile(7),
        ] {
            assert_eq!(AppRoute::from(route).to_path(), route.path());
        }
    }

    #[test]
    fn profile_path_parses_user_id() {
        assert_eq!(
            AppRoute::recognize("/profile/42"),
            Some(AppRoute::Profile { id: 42 })
        );
    }
}
