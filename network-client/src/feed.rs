//! Paged post listings: the home feed, the following feed and a user's posts.

use crate::api::SocialApi;
use crate::error::Result;
use crate::models::PostsPage;
use crate::pagination::{total_pages, PaginationControl};
use crate::post_item::PostItem;
use crate::route::Route;
use crate::session::Session;

pub const LOAD_FAILED: &str = "Failed to load posts. Please try again later.";
pub const PAGE_EMPTY: &str = "No posts on this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    All,
    Following,
    User(i64),
}

impl FeedKind {
    pub fn requires_auth(&self) -> bool {
        matches!(self, FeedKind::Following)
    }

    pub fn title(&self) -> &'static str {
        match self {
            FeedKind::All => "All Posts",
            FeedKind::Following => "Following",
            FeedKind::User(_) => "Posts",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            FeedKind::All => "No posts found. Be the first to post!",
            FeedKind::Following => "You don't have any posts from people you follow yet.",
            FeedKind::User(_) => "No posts yet.",
        }
    }
}

/// A fetch the view is waiting for. Results for an older request are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub kind: FeedKind,
    pub page: u32,
    generation: u64,
}

impl FeedRequest {
    pub async fn fetch<A: SocialApi + ?Sized>(&self, api: &A) -> Result<PostsPage> {
        match self.kind {
            FeedKind::All => api.list_posts(self.page).await,
            FeedKind::Following => api.list_following_posts(self.page).await,
            FeedKind::User(id) => api.list_user_posts(id, self.page).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStart {
    Fetch(FeedRequest),
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub page: u32,
    pub total_count: u64,
    pub items: Vec<PostItem>,
}

impl FeedPage {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pagination(&self) -> Option<PaginationControl> {
        PaginationControl::new(self.page, self.total_pages())
    }

    /// What to show when this page has no items. A page past the end of a
    /// non-empty feed is not the same as an empty feed.
    pub fn empty_message(&self, kind: FeedKind) -> &'static str {
        if self.total_count > 0 {
            PAGE_EMPTY
        } else {
            kind.empty_message()
        }
    }
}

/// Outcome of [`FeedView::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedApplied {
    /// The result belonged to a superseded request and was dropped.
    Stale,
    Applied,
    /// The requested page is past the last one; fetch this page instead.
    Refetch(FeedRequest),
}

impl FeedApplied {
    /// Whether the view changed.
    pub fn changed(&self) -> bool {
        !matches!(self, FeedApplied::Stale)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedState {
    #[default]
    Idle,
    Loading {
        page: u32,
    },
    Ready(FeedPage),
    Failed {
        page: u32,
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    kind: FeedKind,
    page: u32,
    state: FeedState,
    generation: u64,
}

impl FeedView {
    pub fn new(kind: FeedKind) -> Self {
        Self {
            kind,
            page: 1,
            state: FeedState::Idle,
            generation: 0,
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FeedState::Loading { .. })
    }

    pub fn ready(&self) -> Option<&FeedPage> {
        match &self.state {
            FeedState::Ready(page) => Some(page),
            _ => None,
        }
    }

    pub fn item_mut(&mut self, post_id: i64) -> Option<&mut PostItem> {
        match &mut self.state {
            FeedState::Ready(page) => page.items.iter_mut().find(|i| i.id() == post_id),
            _ => None,
        }
    }

    /// Loads the current page.
    pub fn start(&mut self, session: &Session) -> FeedStart {
        if self.kind.requires_auth() && !session.is_authenticated() {
            tracing::debug!("{:?} feed needs a session, redirecting", self.kind);
            return FeedStart::Redirect(Route::Login);
        }

        self.generation += 1;
        self.state = FeedState::Loading { page: self.page };
        FeedStart::Fetch(FeedRequest {
            kind: self.kind,
            page: self.page,
            generation: self.generation,
        })
    }

    pub fn go_to_page(&mut self, page: u32, session: &Session) -> FeedStart {
        self.page = page.max(1);
        self.start(session)
    }

    /// Back to the first page, e.g. after a new post was created.
    pub fn reset(&mut self, session: &Session) -> FeedStart {
        self.go_to_page(1, session)
    }

    /// Applies a fetch result. An empty page past the end of a non-empty feed
    /// (e.g. after deleting the only post on the last page) moves the view to
    /// the last page and asks for that page instead.
    pub fn apply(&mut self, request: FeedRequest, result: Result<PostsPage>) -> FeedApplied {
        if request.generation != self.generation || request.kind != self.kind {
            tracing::debug!("Dropping stale {:?} page {}", request.kind, request.page);
            return FeedApplied::Stale;
        }

        if let Ok(page) = &result {
            let last = total_pages(page.count);
            if page.results.is_empty() && page.count > 0 && request.page > last {
                tracing::debug!(
                    "{:?} page {} is past the last page {}, refetching",
                    self.kind,
                    request.page,
                    last
                );
                self.page = last;
                self.generation += 1;
                self.state = FeedState::Loading { page: last };
                return FeedApplied::Refetch(FeedRequest {
                    kind: self.kind,
                    page: last,
                    generation: self.generation,
                });
            }
        }

        self.state = match result {
            Ok(page) => FeedState::Ready(FeedPage {
                page: request.page,
                total_count: page.count,
                items: page.results.into_iter().map(PostItem::from).collect(),
            }),
            Err(e) => {
                tracing::error!("Error fetching {:?} posts: {}", self.kind, e);
                FeedState::Failed {
                    page: request.page,
                    message: LOAD_FAILED,
                }
            }
        };
        FeedApplied::Applied
    }

    /// Starts, fetches and applies in one go. Returns the redirect, if any.
    pub async fn load<A: SocialApi + ?Sized>(&mut self, api: &A, session: &Session) -> Option<Route> {
        match self.start(session) {
            FeedStart::Redirect(route) => Some(route),
            FeedStart::Fetch(mut request) => {
                // Each refetch asks for a strictly lower page, so this ends.
                loop {
                    let result = request.fetch(api).await;
                    match self.apply(request, result) {
                        FeedApplied::Refetch(next) => request = next,
                        FeedApplied::Stale | FeedApplied::Applied => return None,
                    }
                }
            }
        }
    }

    pub async fn load_page<A: SocialApi + ?Sized>(
        &mut self,
        api: &A,
        session: &Session,
        page: u32,
    ) -> Option<Route> {
        self.page = page.max(1);
        self.load(api, session).await
    }

    /// Deletes one of the viewer's posts and reloads the current page.
    pub async fn delete_post<A: SocialApi + ?Sized>(
        &mut self,
        api: &A,
        session: &Session,
        post_id: i64,
    ) -> Result<()> {
        api.delete_post(post_id).await?;
        self.load(api, session).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::testing::FakeApi;

    fn alice() -> Session {
        Session::Authenticated(Identity {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        })
    }

    #[tokio::test]
    async fn each_page_renders_exactly_the_returned_slice() {
        let api = FakeApi::new();
        api.add_posts(25, 2);
        let mut feed = FeedView::new(FeedKind::All);

        for page in 1..=3 {
            feed.load_page(&api, &Session::Anonymous, page).await;
            let ready = feed.ready().unwrap();
            assert_eq!(ready.page, page);
            assert_eq!(ready.total_pages(), 3);
            let expected = if page < 3 { 10 } else { 5 };
            assert_eq!(ready.items.len(), expected);
            assert_eq!(ready.items[0].id(), i64::from((page - 1) * 10 + 1));
        }

        assert_eq!(
            api.calls(),
            vec!["list_posts 1", "list_posts 2", "list_posts 3"]
        );
    }

    #[tokio::test]
    async fn empty_feed_is_ready_without_pagination() {
        let api = FakeApi::new();
        let mut feed = FeedView::new(FeedKind::All);

        feed.load(&api, &Session::Anonymous).await;

        let ready = feed.ready().unwrap();
        assert!(ready.is_empty());
        assert_eq!(ready.pagination(), None);
    }

    #[tokio::test]
    async fn single_page_has_no_pagination() {
        let api = FakeApi::new();
        api.add_posts(10, 2);
        let mut feed = FeedView::new(FeedKind::All);

        feed.load(&api, &Session::Anonymous).await;

        assert_eq!(feed.ready().unwrap().pagination(), None);
    }

    #[tokio::test]
    async fn following_feed_redirects_anonymous_viewers() {
        let api = FakeApi::new();
        let mut feed = FeedView::new(FeedKind::Following);

        let redirect = feed.load(&api, &Session::Anonymous).await;

        assert_eq!(redirect, Some(Route::Login));
        assert_eq!(feed.state(), &FeedState::Idle);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn following_feed_loads_for_authenticated_viewers() {
        let api = FakeApi::new();
        api.add_posts(3, 2);
        api.follow(1, 2);
        let mut feed = FeedView::new(FeedKind::Following);

        assert_eq!(feed.load(&api, &alice()).await, None);
        assert_eq!(feed.ready().unwrap().items.len(), 3);
    }

    #[tokio::test]
    async fn fetch_failure_shows_static_message() {
        let api = FakeApi::new();
        api.fail_feeds();
        let mut feed = FeedView::new(FeedKind::All);

        feed.load(&api, &Session::Anonymous).await;

        assert_eq!(
            feed.state(),
            &FeedState::Failed {
                page: 1,
                message: LOAD_FAILED
            }
        );
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn stale_results_are_dropped() {
        let api = FakeApi::new();
        api.add_posts(15, 2);
        let mut feed = FeedView::new(FeedKind::All);

        let FeedStart::Fetch(first) = feed.start(&Session::Anonymous) else {
            panic!("expected a fetch");
        };
        let FeedStart::Fetch(second) = feed.go_to_page(2, &Session::Anonymous) else {
            panic!("expected a fetch");
        };

        let second_result = second.fetch(&api).await;
        assert_eq!(feed.apply(second, second_result), FeedApplied::Applied);
        let first_result = first.fetch(&api).await;
        assert_eq!(feed.apply(first, first_result), FeedApplied::Stale);

        assert_eq!(feed.ready().unwrap().page, 2);
        assert_eq!(feed.ready().unwrap().items.len(), 5);
    }

    #[tokio::test]
    async fn reset_goes_back_to_first_page() {
        let api = FakeApi::new();
        api.add_posts(15, 2);
        let mut feed = FeedView::new(FeedKind::All);
        feed.load_page(&api, &Session::Anonymous, 2).await;

        let start = feed.reset(&Session::Anonymous);

        assert!(matches!(start, FeedStart::Fetch(FeedRequest { page: 1, .. })));
        assert_eq!(feed.state(), &FeedState::Loading { page: 1 });
    }

    #[tokio::test]
    async fn delete_reloads_the_page() {
        let api = FakeApi::new();
        api.add_posts(2, 1);
        let mut feed = FeedView::new(FeedKind::User(1));
        feed.load(&api, &alice()).await;

        feed.delete_post(&api, &alice(), 1).await.unwrap();

        assert_eq!(feed.ready().unwrap().items.len(), 1);
        assert_eq!(
            api.calls(),
            vec!["list_user_posts 1 1", "delete_post 1", "list_user_posts 1 1"]
        );
    }

    #[tokio::test]
    async fn deleting_the_last_post_on_the_last_page_falls_back_a_page() {
        let api = FakeApi::new();
        api.add_posts(11, 1);
        let mut feed = FeedView::new(FeedKind::User(1));
        feed.load_page(&api, &alice(), 2).await;
        assert_eq!(feed.ready().unwrap().items.len(), 1);

        feed.delete_post(&api, &alice(), 11).await.unwrap();

        let ready = feed.ready().unwrap();
        assert_eq!(feed.page(), 1);
        assert_eq!(ready.page, 1);
        assert_eq!(ready.items.len(), 10);
        assert_eq!(ready.pagination(), None);
        assert_eq!(
            api.calls(),
            vec![
                "list_user_posts 1 2",
                "delete_post 11",
                "list_user_posts 1 2",
                "list_user_posts 1 1"
            ]
        );
    }

    #[tokio::test]
    async fn page_past_the_end_settles_on_the_last_page() {
        let api = FakeApi::new();
        api.add_posts(15, 2);
        let mut feed = FeedView::new(FeedKind::All);

        feed.load_page(&api, &Session::Anonymous, 9).await;

        let ready = feed.ready().unwrap();
        assert_eq!(feed.page(), 2);
        assert_eq!(ready.page, 2);
        assert_eq!(ready.items.len(), 5);
        assert_eq!(ready.pagination().unwrap().current, ready.page);
    }

    #[tokio::test]
    async fn refetch_supersedes_the_overshooting_request() {
        let api = FakeApi::new();
        api.add_posts(15, 2);
        let mut feed = FeedView::new(FeedKind::All);

        let FeedStart::Fetch(request) = feed.go_to_page(4, &Session::Anonymous) else {
            panic!("expected a fetch");
        };
        let result = request.fetch(&api).await;
        let FeedApplied::Refetch(next) = feed.apply(request, result) else {
            panic!("expected a refetch");
        };
        assert_eq!(next.page, 2);
        assert_eq!(feed.state(), &FeedState::Loading { page: 2 });

        let again = request.fetch(&api).await;
        assert_eq!(feed.apply(request, again), FeedApplied::Stale);
    }

    #[test]
    fn empty_page_message_depends_on_total_count() {
        let past_end = FeedPage {
            page: 3,
            total_count: 12,
            items: Vec::new(),
        };
        assert_eq!(past_end.empty_message(FeedKind::All), PAGE_EMPTY);

        let empty_feed = FeedPage {
            page: 1,
            total_count: 0,
            items: Vec::new(),
        };
        assert_eq!(
            empty_feed.empty_message(FeedKind::All),
            "No posts found. Be the first to post!"
        );
    }
}
