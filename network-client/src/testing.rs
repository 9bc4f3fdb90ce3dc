//! In-memory [`SocialApi`] used by the unit tests.

use crate::api::SocialApi;
use crate::error::{NetworkClientError, Result};
use crate::models::{LoginRequest, Paginated, Post, PostsPage, RegisterRequest, User, PAGE_SIZE};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        bio: None,
        profile_picture: None,
        follower_count: 0,
        following_count: 0,
        date_joined: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn post(id: i64, author: i64, like_count: i64, is_liked: bool) -> Post {
    Post {
        id,
        user: author,
        username: format!("user{}", author),
        content: format!("post {}", id),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        updated_at: None,
        like_count,
        is_liked,
    }
}

#[derive(Default)]
pub struct FakeApi {
    users: RefCell<Vec<User>>,
    posts: RefCell<Vec<Post>>,
    following: RefCell<HashMap<i64, Vec<i64>>>,
    calls: RefCell<Vec<String>>,
    fail_logout: Cell<bool>,
    fail_likes: Cell<bool>,
    fail_follows: Cell<bool>,
    fail_feeds: Cell<bool>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.users
            .borrow_mut()
            .extend([user(1, "alice"), user(2, "bob"), user(3, "carol")]);
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn add_post(&self, post: Post) {
        self.posts.borrow_mut().push(post);
    }

    pub fn add_posts(&self, count: i64, author: i64) {
        for id in 1..=count {
            self.add_post(post(id, author, 0, false));
        }
    }

    pub fn set_follower_count(&self, user_id: i64, count: i64) {
        if let Some(user) = self.users.borrow_mut().iter_mut().find(|u| u.id == user_id) {
            user.follower_count = count;
        }
    }

    pub fn follow(&self, follower: i64, followed: i64) {
        self.following
            .borrow_mut()
            .entry(follower)
            .or_default()
            .push(followed);
    }

    pub fn fail_logout(&self) {
        self.fail_logout.set(true);
    }

    pub fn fail_likes(&self) {
        self.fail_likes.set(true);
    }

    pub fn fail_follows(&self) {
        self.fail_follows.set(true);
    }

    pub fn fail_feeds(&self) {
        self.fail_feeds.set(true);
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn page_of(&self, posts: Vec<Post>, page: u32) -> Result<PostsPage> {
        if self.fail_feeds.get() {
            return Err(NetworkClientError::Status {
                status: 500,
                message: "boom".into(),
            });
        }
        let count = posts.len() as u64;
        let start = ((page.max(1) - 1) * PAGE_SIZE) as usize;
        let results = posts
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE as usize)
            .collect();
        Ok(Paginated {
            count,
            next: None,
            previous: None,
            results,
        })
    }

    fn find_user(&self, id: i64) -> Result<User> {
        self.users
            .borrow()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(NetworkClientError::NotFound(Some("Not Found".into())))
    }
}

#[async_trait(?Send)]
impl SocialApi for FakeApi {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.record("list_users".into());
        Ok(self.users.borrow().clone())
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        self.record(format!("get_user {}", id));
        self.find_user(id)
    }

    async fn register(&self, req: &RegisterRequest) -> Result<User> {
        self.record(format!("register {}", req.username));
        if self.users.borrow().iter().any(|u| u.username == req.username) {
            return Err(NetworkClientError::InvalidRequest(Some(
                "Username already exists".into(),
            )));
        }
        let id = self.users.borrow().len() as i64 + 1;
        let created = user(id, &req.username);
        self.users.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn login(&self, req: &LoginRequest) -> Result<User> {
        self.record(format!("login {}", req.username));
        match (req.username.as_str(), req.password.as_str()) {
            ("alice", "secret") => self.find_user(1),
            _ => Err(NetworkClientError::Unauthorized(Some(
                "Invalid credentials".into(),
            ))),
        }
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout".into());
        if self.fail_logout.get() {
            return Err(NetworkClientError::TransportError("offline".into()));
        }
        Ok(())
    }

    async fn list_posts(&self, page: u32) -> Result<PostsPage> {
        self.record(format!("list_posts {}", page));
        self.page_of(self.posts.borrow().clone(), page)
    }

    async fn list_following_posts(&self, page: u32) -> Result<PostsPage> {
        self.record(format!("list_following_posts {}", page));
        let followed = self.following.borrow().get(&1).cloned().unwrap_or_default();
        let posts = self
            .posts
            .borrow()
            .iter()
            .filter(|p| followed.contains(&p.user))
            .cloned()
            .collect();
        self.page_of(posts, page)
    }

    async fn list_user_posts(&self, user_id: i64, page: u32) -> Result<PostsPage> {
        self.record(format!("list_user_posts {} {}", user_id, page));
        let posts = self
            .posts
            .borrow()
            .iter()
            .filter(|p| p.user == user_id)
            .cloned()
            .collect();
        self.page_of(posts, page)
    }

    async fn get_post(&self, id: i64) -> Result<Post> {
        self.record(format!("get_post {}", id));
        self.posts
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(NetworkClientError::NotFound(None))
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        self.record(format!("create_post {}", content));
        let id = self.posts.borrow().iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let mut created = post(id, 1, 0, false);
        created.content = content.to_string();
        self.posts.borrow_mut().insert(0, created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: i64, content: &str) -> Result<Post> {
        self.record(format!("update_post {} {}", id, content));
        let mut posts = self.posts.borrow_mut();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(NetworkClientError::NotFound(None))?;
        post.content = content.to_string();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        self.record(format!("delete_post {}", id));
        self.posts.borrow_mut().retain(|p| p.id != id);
        Ok(())
    }

    async fn like_post(&self, id: i64) -> Result<()> {
        self.record(format!("like_post {}", id));
        if self.fail_likes.get() {
            return Err(NetworkClientError::TransportError("offline".into()));
        }
        Ok(())
    }

    async fn unlike_post(&self, id: i64) -> Result<()> {
        self.record(format!("unlike_post {}", id));
        if self.fail_likes.get() {
            return Err(NetworkClientError::InvalidRequest(Some(
                "You have not liked this post".into(),
            )));
        }
        Ok(())
    }

    async fn list_following(&self, user_id: i64) -> Result<Vec<User>> {
        self.record(format!("list_following {}", user_id));
        let ids = self
            .following
            .borrow()
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        Ok(self
            .users
            .borrow()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list_followers(&self, user_id: i64) -> Result<Vec<User>> {
        self.record(format!("list_followers {}", user_id));
        let following = self.following.borrow();
        Ok(self
            .users
            .borrow()
            .iter()
            .filter(|u| following.get(&u.id).is_some_and(|ids| ids.contains(&user_id)))
            .cloned()
            .collect())
    }

    async fn follow_user(&self, id: i64) -> Result<()> {
        self.record(format!("follow_user {}", id));
        if self.fail_follows.get() {
            return Err(NetworkClientError::InvalidRequest(Some(
                "You cannot follow yourself".into(),
            )));
        }
        Ok(())
    }

    async fn unfollow_user(&self, id: i64) -> Result<()> {
        self.record(format!("unfollow_user {}", id));
        if self.fail_follows.get() {
            return Err(NetworkClientError::TransportError("offline".into()));
        }
        Ok(())
    }
}
