//! Client for the Network social backend.
//!
//! The crate is split in two layers. [`SocialApi`] and its reqwest
//! implementation [`HttpClient`] (feature `native`) talk to the backend; the
//! view models ([`SessionStore`], [`FeedView`], [`ProfileView`],
//! [`PostItem`], [`PaginationControl`] and the forms) hold what a front end
//! displays and decide which calls to make. Front ends drive the view models
//! either with the `begin_*`/`finish_*` pairs from an event loop or with the
//! async helpers that do both.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod forms;
#[cfg(feature = "native")]
pub mod http_client;
pub mod models;
pub mod mutation;
pub mod pagination;
pub mod post_item;
pub mod profile;
pub mod route;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::SocialApi;
pub use config::ClientConfig;
pub use error::NetworkClientError;
pub use feed::{FeedApplied, FeedKind, FeedPage, FeedRequest, FeedStart, FeedState, FeedView};
pub use forms::{LoginForm, PostComposer, RegisterForm};
#[cfg(feature = "native")]
pub use http_client::HttpClient;
pub use models::{Identity, Post, PostsPage, User, PAGE_SIZE};
pub use mutation::MutationStatus;
pub use pagination::PaginationControl;
pub use post_item::PostItem;
pub use profile::{ProfileCard, ProfileState, ProfileView};
pub use route::Route;
pub use session::{IdentityStore, MemoryIdentityStore, Session, SessionStore};
