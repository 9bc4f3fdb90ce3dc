use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use network_client::api::paths;
use network_client::config::DEFAULT_API_URL;
use network_client::error::{NetworkClientError, Result};
use network_client::models::{LoginRequest, Post, PostContent, PostsPage, RegisterRequest, User};
use network_client::SocialApi;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, RequestCredentials};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// `fetch` transport for [`SocialApi`]. The browser keeps the session cookie;
/// every request is sent with credentials so it travels cross-origin too.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchApi {
    base_url: String,
}

impl Default for FetchApi {
    fn default() -> Self {
        Self::new(option_env!("NETWORK_API_URL").unwrap_or(DEFAULT_API_URL))
    }
}

fn transport(e: gloo_net::Error) -> NetworkClientError {
    NetworkClientError::TransportError(e.to_string())
}

fn csrf_token() -> Option<String> {
    let document = web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()?;
    let cookies = document.cookie().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == CSRF_COOKIE).then(|| value.to_string())
    })
}

impl FetchApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
        builder
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json")
    }

    fn get(&self, path: &str) -> RequestBuilder {
        Self::with_credentials(Request::get(&self.url(path)))
    }

    fn mutating(builder: RequestBuilder) -> RequestBuilder {
        let builder = Self::with_credentials(builder);
        match csrf_token() {
            Some(token) => builder.header(CSRF_HEADER, &token),
            None => builder,
        }
    }

    async fn read<T: DeserializeOwned>(request: std::result::Result<Request, gloo_net::Error>) -> Result<T> {
        let response = request.map_err(transport)?.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if (200..300).contains(&status) {
            serde_json::from_str(&text).map_err(|e| {
                log::error!("Unexpected response shape ({}): {}", status, e);
                NetworkClientError::from(e)
            })
        } else {
            log::debug!("HTTP {} with body {:?}", status, text);
            Err(NetworkClientError::from_status(status, &text))
        }
    }

    async fn execute(builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();

        if (200..300).contains(&status) {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            log::debug!("HTTP {} with body {:?}", status, text);
            Err(NetworkClientError::from_status(status, &text))
        }
    }

    fn content(content: &str) -> PostContent {
        PostContent {
            content: content.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl SocialApi for FetchApi {
    async fn list_users(&self) -> Result<Vec<User>> {
        Self::read(self.get(paths::USERS).build()).await
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        Self::read(self.get(&paths::user(id)).build()).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<User> {
        let request = Self::mutating(Request::post(&self.url(paths::USERS))).json(req);
        Self::read(request).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<User> {
        log::debug!("Login called for username: {}", req.username);
        let request = Self::mutating(Request::post(&self.url(paths::LOGIN))).json(req);
        Self::read(request).await
    }

    async fn logout(&self) -> Result<()> {
        Self::execute(Self::mutating(Request::post(&self.url(paths::LOGOUT)))).await
    }

    async fn list_posts(&self, page: u32) -> Result<PostsPage> {
        Self::read(self.get(&paths::posts_page(page)).build()).await
    }

    async fn list_following_posts(&self, page: u32) -> Result<PostsPage> {
        Self::read(self.get(&paths::following_posts_page(page)).build()).await
    }

    async fn list_user_posts(&self, user_id: i64, page: u32) -> Result<PostsPage> {
        Self::read(self.get(&paths::user_posts(user_id, page)).build()).await
    }

    async fn get_post(&self, id: i64) -> Result<Post> {
        Self::read(self.get(&paths::post(id)).build()).await
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        let request =
            Self::mutating(Request::post(&self.url(paths::POSTS))).json(&Self::content(content));
        Self::read(request).await
    }

    async fn update_post(&self, id: i64, content: &str) -> Result<Post> {
        let request = Self::mutating(Request::patch(&self.url(&paths::post(id))))
            .json(&Self::content(content));
        Self::read(request).await
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        Self::execute(Self::mutating(Request::delete(&self.url(&paths::post(id))))).await
    }

    async fn like_post(&self, id: i64) -> Result<()> {
        Self::execute(Self::mutating(Request::post(&self.url(&paths::like(id))))).await
    }

    async fn unlike_post(&self, id: i64) -> Result<()> {
        Self::execute(Self::mutating(Request::delete(&self.url(&paths::like(id))))).await
    }

    async fn list_following(&self, user_id: i64) -> Result<Vec<User>> {
        Self::read(self.get(&paths::user_following(user_id)).build()).await
    }

    async fn list_followers(&self, user_id: i64) -> Result<Vec<User>> {
        Self::read(self.get(&paths::user_followers(user_id)).build()).await
    }

    async fn follow_user(&self, id: i64) -> Result<()> {
        Self::execute(Self::mutating(Request::post(&self.url(&paths::follow(id))))).await
    }

    async fn unfollow_user(&self, id: i64) -> Result<()> {
        Self::execute(Self::mutating(Request::delete(&self.url(&paths::follow(id))))).await
    }
}
