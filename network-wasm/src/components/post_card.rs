use crate::api::FetchApi;
use crate::app::{subscribe, SessionContext};
use crate::router::AppRoute;
use network_client::error::NetworkClientError;
use network_client::post_item::{LikeIntent, SaveIntent};
use network_client::{MutationStatus, Post, PostItem};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::context::ContextHandle;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PostCardProps {
    pub post: Post,
    pub on_delete: Callback<i64>,
}

pub enum Msg {
    Session(SessionContext),
    ToggleLike,
    LikeDone(LikeIntent, Result<(), NetworkClientError>),
    Edit,
    EditInput(String),
    Save,
    SaveDone(SaveIntent, Result<Post, NetworkClientError>),
    CancelEdit,
    Delete,
}

pub struct PostCard {
    item: PostItem,
    session: SessionContext,
    _session_handle: Option<ContextHandle<SessionContext>>,
    api: FetchApi,
}

impl Component for PostCard {
    type Message = Msg;
    type Properties = PostCardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = subscribe(ctx.link(), ctx.link().callback(Msg::Session));

        Self {
            item: PostItem::from(ctx.props().post.clone()),
            session,
            _session_handle: handle,
            api: FetchApi::default(),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().post != old_props.post {
            self.item = PostItem::from(ctx.props().post.clone());
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Session(session) => {
                self.session = session;
                if !self.item.is_own(&self.session.session) {
                    self.item.cancel_edit();
                }
                true
            }

            Msg::ToggleLike => {
                if !self.session.session.is_authenticated() {
                    return false;
                }
                let Some(intent) = self.item.begin_like_toggle() else {
                    return false;
                };

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = intent.send(&api).await;
                    link.send_message(Msg::LikeDone(intent, result));
                });
                true
            }

            Msg::LikeDone(intent, result) => {
                self.item.finish_like_toggle(&intent, result);
                true
            }

            Msg::Edit => self.item.begin_edit(&self.session.session),

            Msg::EditInput(content) => {
                self.item.set_edit_content(content);
                true
            }

            Msg::Save => {
                let Some(intent) = self.item.begin_save() else {
                    return false;
                };

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = intent.send(&api).await;
                    link.send_message(Msg::SaveDone(intent, result));
                });
                true
            }

            Msg::SaveDone(intent, result) => {
                self.item.finish_save(&intent, result);
                true
            }

            Msg::CancelEdit => {
                self.item.cancel_edit();
                true
            }

            Msg::Delete => {
                if self.item.is_own(&self.session.session) {
                    ctx.props().on_delete.emit(self.item.id());
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let post = self.item.post();
        let session = &self.session.session;
        let is_own = self.item.is_own(session);

        let controls = match self.item.edit() {
            Some(edit) => {
                let pending = edit.status.is_pending();
                let blank = edit.content.trim().is_empty();
                html! {
                    <div class="btn-group btn-group-sm">
                        <button class="btn btn-success" disabled={pending || blank}
                            onclick={link.callback(|_| Msg::Save)}>
                            { if pending { "Saving..." } else { "Save" } }
                        </button>
                        <button class="btn btn-outline-secondary" disabled={pending}
                            onclick={link.callback(|_| Msg::CancelEdit)}>
                            { "Cancel" }
                        </button>
                    </div>
                }
            }
            None if is_own => html! {
                <div class="btn-group btn-group-sm">
                    <button class="btn btn-outline-primary" aria-label="Edit post"
                        onclick={link.callback(|_| Msg::Edit)}>
                        { "Edit" }
                    </button>
                    <button class="btn btn-outline-danger" aria-label="Delete post"
                        onclick={link.callback(|_| Msg::Delete)}>
                        { "Delete" }
                    </button>
                </div>
            },
            None => html! {},
        };

        let body = match self.item.edit() {
            Some(edit) => {
                let oninput = link.callback(|e: InputEvent| {
                    let input: HtmlTextAreaElement = e.target_unchecked_into();
                    Msg::EditInput(input.value())
                });
                html! {
                    <>
                        <textarea class="form-control" rows="3"
                            value={edit.content.clone()}
                            disabled={edit.status.is_pending()}
                            {oninput} />
                        if let Some(reason) = edit.status.failure() {
                            <div class="text-danger small mt-1">{ reason }</div>
                        }
                    </>
                }
            }
            None => html! { <p class="card-text" style="white-space: pre-wrap;">{ &post.content }</p> },
        };

        let liked = self.item.is_liked();
        let like_class = classes!(
            "btn",
            "btn-sm",
            if liked { "btn-danger" } else { "btn-outline-danger" }
        );
        let like_failure = match self.item.like_status() {
            MutationStatus::Failed(reason) => html! {
                <span class="text-danger small ml-2">{ reason }</span>
            },
            _ => html! {},
        };

        html! {
            <div class="card mb-3">
                <div class="card-body">
                    <div class="d-flex justify-content-between align-items-start">
                        <div>
                            <Link<AppRoute> classes="font-weight-bold" to={AppRoute::Profile { id: post.user }}>
                                { &post.username }
                            </Link<AppRoute>>
                            <div class="text-muted small">{ post.formatted_timestamp() }</div>
                        </div>
                        { controls }
                    </div>
                    <div class="mt-2">{ body }</div>
                    <div class="mt-2">
                        <button class={like_class}
                            disabled={!session.is_authenticated()}
                            aria-label={if liked { "Unlike post" } else { "Like post" }}
                            onclick={link.callback(|_| Msg::ToggleLike)}>
                            { if liked { "♥ " } else { "♡ " } }{ self.item.likes() }
                        </button>
                        { like_failure }
                    </div>
                </div>
            </div>
        }
    }
}
