use crate::error::Result;
use crate::models::{Post, PostsPage, RegisterRequest, LoginRequest, User};
use async_trait::async_trait;

/// Operations the backend exposes to the client.
///
/// Every call is a single network round trip: no retries, no caching. The
/// futures are not required to be `Send` so that browser implementations built
/// on `fetch` can implement the trait as well.
#[async_trait(?Send)]
pub trait SocialApi {
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, id: i64) -> Result<User>;

    async fn register(&self, req: &RegisterRequest) -> Result<User>;

    /// Establishes a server-side session and returns the logged in user.
    async fn login(&self, req: &LoginRequest) -> Result<User>;

    async fn logout(&self) -> Result<()>;

    async fn list_posts(&self, page: u32) -> Result<PostsPage>;

    /// Posts from followed users. Requires an authenticated session.
    async fn list_following_posts(&self, page: u32) -> Result<PostsPage>;

    async fn list_user_posts(&self, user_id: i64, page: u32) -> Result<PostsPage>;

    async fn get_post(&self, id: i64) -> Result<Post>;

    async fn create_post(&self, content: &str) -> Result<Post>;

    async fn update_post(&self, id: i64, content: &str) -> Result<Post>;

    async fn delete_post(&self, id: i64) -> Result<()>;

    async fn like_post(&self, id: i64) -> Result<()>;

    async fn unlike_post(&self, id: i64) -> Result<()>;

    async fn list_following(&self, user_id: i64) -> Result<Vec<User>>;

    async fn list_followers(&self, user_id: i64) -> Result<Vec<User>>;

    async fn follow_user(&self, id: i64) -> Result<()>;

    async fn unfollow_user(&self, id: i64) -> Result<()>;
}

/// Paths of the backend endpoints, relative to the API base URL.
pub mod paths {
    pub const USERS: &str = "/users/";
    pub const LOGIN: &str = "/login/";
    pub const LOGOUT: &str = "/logout/";
    pub const POSTS: &str = "/posts/";

    pub fn user(id: i64) -> String {
        format!("/users/{}/", id)
    }

    pub fn user_posts(id: i64, page: u32) -> String {
        format!("/users/{}/posts/?page={}", id, page)
    }

    pub fn user_following(id: i64) -> String {
        format!("/users/{}/following/", id)
    }

    pub fn user_followers(id: i64) -> String {
        format!("/users/{}/followers/", id)
    }

    pub fn follow(id: i64) -> String {
        format!("/users/{}/follow/", id)
    }

    pub fn posts_page(page: u32) -> String {
        format!("/posts/?page={}", page)
    }

    pub fn following_posts_page(page: u32) -> String {
        format!("/posts/following/?page={}", page)
    }

    pub fn post(id: i64) -> String {
        format!("/posts/{}/", id)
    }

    pub fn like(id: i64) -> String {
        format!("/posts/{}/like/", id)
    }
}
