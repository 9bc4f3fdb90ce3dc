//! Input forms: new post composer, login and registration.

use crate::api::SocialApi;
use crate::error::Result;
use crate::models::{LoginRequest, Post, RegisterRequest, User};
use crate::route::Route;
use crate::session::Session;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const FIELDS_REQUIRED: &str = "All fields are required";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// Text box for a new post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostComposer {
    pub content: String,
    submitting: bool,
}

impl PostComposer {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self, session: &Session) -> bool {
        session.is_authenticated() && !self.submitting && !self.content.trim().is_empty()
    }

    /// Content to send, or `None` when there is nothing to do.
    pub fn begin_submit(&mut self, session: &Session) -> Option<String> {
        if !self.can_submit(session) {
            return None;
        }
        self.submitting = true;
        Some(self.content.clone())
    }

    /// Returns `true` when the post was created and the feed should go back to
    /// its first page.
    pub fn finish_submit(&mut self, result: Result<Post>) -> bool {
        self.submitting = false;
        match result {
            Ok(post) => {
                tracing::info!("Created post {}", post.id);
                self.content.clear();
                true
            }
            Err(e) => {
                tracing::error!("Error creating post: {}", e);
                false
            }
        }
    }

    pub async fn submit<A: SocialApi + ?Sized>(&mut self, api: &A, session: &Session) -> bool {
        let Some(content) = self.begin_submit(session) else {
            return false;
        };
        let result = api.create_post(&content).await;
        self.finish_submit(result)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// `None` while either field is empty.
    pub fn request(&self) -> Option<LoginRequest> {
        if self.username.is_empty() || self.password.is_empty() {
            return None;
        }
        Some(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegisterForm {
    pub fn validate(&self) -> std::result::Result<RegisterRequest, &'static str> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FIELDS_REQUIRED);
        }
        if self.password != self.confirmation {
            return Err(PASSWORDS_DO_NOT_MATCH);
        }
        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Where to go after a registration attempt, or the message to show.
pub fn registration_outcome(result: Result<User>) -> std::result::Result<Route, String> {
    match result {
        Ok(user) => {
            tracing::info!("Registered {}", user.username);
            Ok(Route::Login)
        }
        Err(e) => {
            tracing::error!("Registration error: {}", e);
            Err(e.detail().unwrap_or(REGISTRATION_FAILED).to_string())
        }
    }
}

pub async fn register<A: SocialApi + ?Sized>(
    api: &A,
    form: &RegisterForm,
) -> std::result::Result<Route, String> {
    let req = form.validate().map_err(str::to_string)?;
    registration_outcome(api.register(&req).await)
}
