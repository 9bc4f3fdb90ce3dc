use crate::components::FeedList;
use network_client::FeedKind;
use yew::prelude::*;

#[function_component(FollowingPage)]
pub fn following_page() -> Html {
    html! {
        <>
            <h1 class="mb-4">{ FeedKind::Following.title() }</h1>
            <FeedList kind={FeedKind::Following} />
        </>
    }
}
