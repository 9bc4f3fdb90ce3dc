use crate::api::{paths, SocialApi};
use crate::config::ClientConfig;
use crate::error::{NetworkClientError, Result};
use crate::models::{LoginRequest, Post, PostContent, PostsPage, RegisterRequest, User};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// reqwest transport for [`SocialApi`]. Session credentials live in a cookie
/// jar shared by every request made through this client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    jar: Arc<Jar>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .cookie_provider(jar.clone())
            .connect_timeout(Duration::from_secs(5));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    fn session_url(&self) -> Result<Url> {
        Url::parse(&self.config.base_url).map_err(|e| {
            NetworkClientError::TransportError(format!(
                "Invalid base URL {}: {}",
                self.config.base_url, e
            ))
        })
    }

    /// The `Cookie` header the jar would send to the backend, if any.
    pub fn session_cookies(&self) -> Option<String> {
        let url = self.session_url().ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Loads cookies previously captured with [`HttpClient::session_cookies`].
    pub fn restore_session_cookies(&self, header: &str) -> Result<()> {
        let url = self.session_url()?;
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(&format!("{}; Path=/", pair), &url);
        }
        tracing::debug!("Restored session cookies for {}", url);
        Ok(())
    }

    fn csrf_token(&self) -> Option<String> {
        self.session_cookies()?.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == CSRF_COOKIE).then(|| value.to_string())
        })
    }

    /// Mutating requests carry the CSRF token when the backend issued one.
    fn mutating(&self, request: RequestBuilder) -> RequestBuilder {
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                tracing::error!("Unexpected response shape ({}): {}", status, e);
                NetworkClientError::from(e)
            })
        } else {
            tracing::debug!("HTTP {} with body {:?}", status, text);
            Err(NetworkClientError::from_status(status.as_u16(), &text))
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await?;
            tracing::debug!("HTTP {} with body {:?}", status, text);
            Err(NetworkClientError::from_status(status.as_u16(), &text))
        }
    }
}

#[async_trait(?Send)]
impl SocialApi for HttpClient {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.read(self.client.get(self.url(paths::USERS))).await
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        self.read(self.client.get(self.url(&paths::user(id)))).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<User> {
        tracing::debug!("Register called for username: {}", req.username);
        let request = self.client.post(self.url(paths::USERS)).json(req);
        self.read(self.mutating(request)).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<User> {
        tracing::debug!("Login called for username: {}", req.username);
        let request = self.client.post(self.url(paths::LOGIN)).json(req);
        self.read(self.mutating(request)).await
    }

    async fn logout(&self) -> Result<()> {
        let request = self.client.post(self.url(paths::LOGOUT));
        self.execute(self.mutating(request)).await
    }

    async fn list_posts(&self, page: u32) -> Result<PostsPage> {
        self.read(self.client.get(self.url(&paths::posts_page(page))))
            .await
    }

    async fn list_following_posts(&self, page: u32) -> Result<PostsPage> {
        self.read(self.client.get(self.url(&paths::following_posts_page(page))))
            .await
    }

    async fn list_user_posts(&self, user_id: i64, page: u32) -> Result<PostsPage> {
        self.read(self.client.get(self.url(&paths::user_posts(user_id, page))))
            .await
    }

    async fn get_post(&self, id: i64) -> Result<Post> {
        self.read(self.client.get(self.url(&paths::post(id)))).await
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        let body = PostContent {
            content: content.to_string(),
        };
        let request = self.client.post(self.url(paths::POSTS)).json(&body);
        self.read(self.mutating(request)).await
    }

    async fn update_post(&self, id: i64, content: &str) -> Result<Post> {
        let body = PostContent {
            content: content.to_string(),
        };
        let request = self.client.patch(self.url(&paths::post(id))).json(&body);
        self.read(self.mutating(request)).await
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        let request = self.client.delete(self.url(&paths::post(id)));
        self.execute(self.mutating(request)).await
    }

    async fn like_post(&self, id: i64) -> Result<()> {
        let request = self.client.post(self.url(&paths::like(id)));
        self.execute(self.mutating(request)).await
    }

    async fn unlike_post(&self, id: i64) -> Result<()> {
        let request = self.client.delete(self.url(&paths::like(id)));
        self.execute(self.mutating(request)).await
    }

    async fn list_following(&self, user_id: i64) -> Result<Vec<User>> {
        self.read(self.client.get(self.url(&paths::user_following(user_id))))
            .await
    }

    async fn list_followers(&self, user_id: i64) -> Result<Vec<User>> {
        self.read(self.client.get(self.url(&paths::user_followers(user_id))))
            .await
    }

    async fn follow_user(&self, id: i64) -> Result<()> {
        let request = self.client.post(self.url(&paths::follow(id)));
        self.execute(self.mutating(request)).await
    }

    async fn unfollow_user(&self, id: i64) -> Result<()> {
        let request = self.client.delete(self.url(&paths::follow(id)));
        self.execute(self.mutating(request)).await
    }
}
