use crate::api::FetchApi;
use crate::app::{navigate, subscribe, SessionContext};
use crate::components::{Pagination, PostCard};
use network_client::error::NetworkClientError;
use network_client::{
    FeedApplied, FeedKind, FeedRequest, FeedStart, FeedState, FeedView, PostsPage, SocialApi,
};
use wasm_bindgen_futures::spawn_local;
use yew::context::ContextHandle;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FeedListProps {
    pub kind: FeedKind,
    /// Bumped by the parent to send the feed back to its first page.
    #[prop_or_default]
    pub reset: u32,
}

pub enum Msg {
    Session(SessionContext),
    GoTo(u32),
    Loaded(FeedRequest, Result<PostsPage, NetworkClientError>),
    Delete(i64),
    Deleted(i64, Result<(), NetworkClientError>),
}

/// A paged list of posts. Owns its [`FeedView`] and drives the fetches.
pub struct FeedList {
    feed: FeedView,
    session: SessionContext,
    _session_handle: Option<ContextHandle<SessionContext>>,
    api: FetchApi,
    error: Option<String>,
}

impl FeedList {
    fn run(&mut self, ctx: &Context<Self>, start: FeedStart) {
        match start {
            FeedStart::Redirect(route) => navigate(ctx.link(), route),
            FeedStart::Fetch(request) => {
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = request.fetch(&api).await;
                    link.send_message(Msg::Loaded(request, result));
                });
            }
        }
    }

    fn reload(&mut self, ctx: &Context<Self>) {
        if self.session.loading {
            return;
        }
        let start = self.feed.start(&self.session.session);
        self.run(ctx, start);
    }
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

impl Component for FeedList {
    type Message = Msg;
    type Properties = FeedListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = subscribe(ctx.link(), ctx.link().callback(Msg::Session));

        let mut list = Self {
            feed: FeedView::new(ctx.props().kind),
            session,
            _session_handle: handle,
            api: FetchApi::default(),
            error: None,
        };
        list.reload(ctx);
        list
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.kind != old_props.kind {
            self.feed = FeedView::new(props.kind);
            self.reload(ctx);
        } else if props.reset != old_props.reset {
            let start = self.feed.reset(&self.session.session);
            self.run(ctx, start);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Session(session) => {
                let changed_user = session.session != self.session.session;
                let finished_loading = self.session.loading && !session.loading;
                self.session = session;
                if changed_user || finished_loading {
                    self.reload(ctx);
                }
                true
            }

            Msg::GoTo(page) => {
                self.error = None;
                let start = self.feed.go_to_page(page, &self.session.session);
                self.run(ctx, start);
                scroll_to_top();
                true
            }

            Msg::Loaded(request, result) => match self.feed.apply(request, result) {
                FeedApplied::Refetch(next) => {
                    self.run(ctx, FeedStart::Fetch(next));
                    true
                }
                applied => applied.changed(),
            },

            Msg::Delete(post_id) => {
                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.delete_post(post_id).await;
                    link.send_message(Msg::Deleted(post_id, result));
                });
                false
            }

            Msg::Deleted(post_id, result) => {
                match result {
                    Ok(()) => {
                        log::info!("Deleted post {}", post_id);
                        self.error = None;
                        self.reload(ctx);
                    }
                    Err(e) => {
                        log::error!("Error deleting post {}: {}", post_id, e);
                        self.error = Some(format!("Could not delete post: {}", e));
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let error = match &self.error {
            Some(message) => html! { <div class="alert alert-danger">{ message }</div> },
            None => html! {},
        };

        let content = match self.feed.state() {
            FeedState::Idle | FeedState::Loading { .. } => html! {
                <div class="text-center py-4">
                    <div class="spinner-border" role="status">
                        <span class="sr-only">{ "Loading..." }</span>
                    </div>
                </div>
            },
            FeedState::Failed { message, .. } => html! {
                <div class="alert alert-danger">{ *message }</div>
            },
            FeedState::Ready(page) if page.is_empty() => html! {
                <div class="text-center text-muted py-4">{ page.empty_message(self.feed.kind()) }</div>
            },
            FeedState::Ready(page) => {
                let on_delete = link.callback(Msg::Delete);
                html! {
                    <>
                        { for page.items.iter().map(|item| html! {
                            <PostCard key={item.id()} post={item.post().clone()} on_delete={on_delete.clone()} />
                        }) }
                        <Pagination
                            current={page.page}
                            total={page.total_pages()}
                            on_change={link.callback(Msg::GoTo)} />
                    </>
                }
            }
        };

        html! {
            <div class="feed">
                { error }
                { content }
            </div>
        }
    }
}
