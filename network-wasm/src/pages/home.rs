use crate::components::{Composer, FeedList};
use network_client::FeedKind;
use yew::prelude::*;

#[function_component(HomePage)]
pub fn home_page() -> Html {
    let reset = use_state(|| 0u32);
    let on_created = {
        let reset = reset.clone();
        Callback::from(move |_: ()| reset.set(*reset + 1))
    };

    html! {
        <>
            <h1 class="mb-4">{ FeedKind::All.title() }</h1>
            <Composer {on_created} />
            <FeedList kind={FeedKind::All} reset={*reset} />
        </>
    }
}
