use crate::api::FetchApi;
use crate::app::{subscribe, SessionContext};
use network_client::error::NetworkClientError;
use network_client::{Post, PostComposer, SocialApi};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::context::ContextHandle;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ComposerProps {
    pub on_created: Callback<()>,
}

pub enum Msg {
    Session(SessionContext),
    Input(String),
    Submit,
    Submitted(Result<Post, NetworkClientError>),
}

pub struct Composer {
    composer: PostComposer,
    session: SessionContext,
    _session_handle: Option<ContextHandle<SessionContext>>,
    api: FetchApi,
}

impl Component for Composer {
    type Message = Msg;
    type Properties = ComposerProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = subscribe(ctx.link(), ctx.link().callback(Msg::Session));

        Self {
            composer: PostComposer::default(),
            session,
            _session_handle: handle,
            api: FetchApi::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Session(session) => {
                self.session = session;
                true
            }

            Msg::Input(content) => {
                self.composer.content = content;
                true
            }

            Msg::Submit => {
                let Some(content) = self.composer.begin_submit(&self.session.session) else {
                    return false;
                };

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.create_post(&content).await;
                    link.send_message(Msg::Submitted(result));
                });
                true
            }

            Msg::Submitted(result) => {
                if self.composer.finish_submit(result) {
                    ctx.props().on_created.emit(());
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if !self.session.session.is_authenticated() {
            return html! {
                <div class="card mb-4">
                    <div class="card-body text-center">{ "Please log in to create a post." }</div>
                </div>
            };
        }

        let link = ctx.link();
        let oninput = link.callback(|e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            Msg::Input(input.value())
        });
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let submitting = self.composer.is_submitting();

        html! {
            <div class="card mb-4">
                <div class="card-body">
                    <h5 class="card-title">{ "Create a new post" }</h5>
                    <form {onsubmit}>
                        <textarea class="form-control" rows="4"
                            placeholder="What's on your mind?"
                            value={self.composer.content.clone()}
                            {oninput} />
                        <div class="mt-2 text-right">
                            <button type="submit" class="btn btn-primary"
                                disabled={!self.composer.can_submit(&self.session.session)}>
                                { if submitting { "Posting..." } else { "Post" } }
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        }
    }
}
