use crate::api::FetchApi;
use crate::app::{subscribe, SessionContext};
use crate::components::FeedList;
use network_client::error::NetworkClientError;
use network_client::profile::{FollowIntent, ProfileFetch, ProfileRequest};
use network_client::{FeedKind, ProfileState, ProfileView};
use wasm_bindgen_futures::spawn_local;
use yew::context::ContextHandle;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProfilePageProps {
    pub id: i64,
}

pub enum Msg {
    Session(SessionContext),
    Loaded(ProfileRequest, ProfileFetch),
    ToggleFollow,
    FollowDone(FollowIntent, Result<(), NetworkClientError>),
}

pub struct ProfilePage {
    view: ProfileView,
    session: SessionContext,
    _session_handle: Option<ContextHandle<SessionContext>>,
    api: FetchApi,
}

impl ProfilePage {
    fn load(&mut self, ctx: &Context<Self>) {
        let request = self.view.start(&self.session.session);

        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let fetch = request.fetch(&api).await;
            link.send_message(Msg::Loaded(request, fetch));
        });
    }
}

impl Component for ProfilePage {
    type Message = Msg;
    type Properties = ProfilePageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = subscribe(ctx.link(), ctx.link().callback(Msg::Session));

        let mut page = Self {
            view: ProfileView::new(ctx.props().id),
            session,
            _session_handle: handle,
            api: FetchApi::default(),
        };
        page.load(ctx);
        page
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        if ctx.props().id != self.view.user_id() {
            self.view = ProfileView::new(ctx.props().id);
            self.load(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Session(session) => {
                let changed_user = session.session != self.session.session;
                self.session = session;
                if changed_user {
                    self.load(ctx);
                }
                true
            }

            Msg::Loaded(request, fetch) => self.view.apply(request, fetch),

            Msg::ToggleFollow => {
                let Some(intent) = self.view.begin_follow_toggle() else {
                    return false;
                };

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = intent.send(&api).await;
                    link.send_message(Msg::FollowDone(intent, result));
                });
                true
            }

            Msg::FollowDone(intent, result) => {
                self.view.finish_follow_toggle(&intent, result);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let card = match self.view.state() {
            ProfileState::Idle | ProfileState::Loading => {
                return html! { <div class="text-center py-4">{ "Loading profile..." }</div> };
            }
            ProfileState::Failed(message) => {
                return html! { <div class="text-center text-danger py-4">{ *message }</div> };
            }
            ProfileState::Ready(card) => card,
        };

        let user = &card.user;
        let follow = &card.follow;
        let follow_button = if card.can_follow {
            let class = classes!(
                "btn",
                if follow.following { "btn-danger" } else { "btn-primary" }
            );
            html! {
                <div>
                    <button {class} disabled={follow.status.is_pending()}
                        onclick={ctx.link().callback(|_| Msg::ToggleFollow)}>
                        { if follow.following { "Unfollow" } else { "Follow" } }
                    </button>
                    if let Some(reason) = follow.status.failure() {
                        <div class="text-danger small mt-1">{ reason }</div>
                    }
                </div>
            }
        } else {
            html! {}
        };

        html! {
            <>
                <div class="card mb-4">
                    <div class="card-body d-flex justify-content-between align-items-center">
                        <div>
                            <h1 class="h3">{ &user.username }</h1>
                            if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                                <p class="mb-1">{ bio }</p>
                            }
                            <p class="text-muted small mb-2">
                                { format!("Joined {}", user.date_joined.format("%b %d %Y")) }
                            </p>
                            <div>
                                <span class="font-weight-bold">{ follow.follower_count }</span>
                                <span class="text-muted mr-3">{ " Followers" }</span>
                                <span class="font-weight-bold">{ user.following_count }</span>
                                <span class="text-muted">{ " Following" }</span>
                            </div>
                        </div>
                        { follow_button }
                    </div>
                </div>
                <h2 class="h4 mb-3">{ FeedKind::User(user.id).title() }</h2>
                <FeedList kind={FeedKind::User(user.id)} />
            </>
        }
    }
}
