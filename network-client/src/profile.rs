use crate::api::SocialApi;
use crate::error::{NetworkClientError, Result};
use crate::feed::{FeedKind, FeedView};
use crate::models::User;
use crate::mutation::{failure_reason, MutationStatus};
use crate::route::Route;
use crate::session::Session;

pub const PROFILE_LOAD_FAILED: &str = "Failed to load user profile.";
pub const USER_NOT_FOUND: &str = "User not found";
const FOLLOW_FAILED: &str = "Could not update follow status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowState {
    pub following: bool,
    pub follower_count: i64,
    pub status: MutationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowIntent {
    pub user_id: i64,
    pub follow: bool,
    previous_following: bool,
    previous_count: i64,
}

impl FollowIntent {
    pub async fn send<A: SocialApi + ?Sized>(&self, api: &A) -> Result<()> {
        if self.follow {
            api.follow_user(self.user_id).await
        } else {
            api.unfollow_user(self.user_id).await
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub user: User,
    pub follow: FollowState,
    /// The toggle is offered to authenticated viewers on other people's profiles.
    pub can_follow: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProfileState {
    #[default]
    Idle,
    Loading,
    Ready(ProfileCard),
    Failed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileRequest {
    pub user_id: i64,
    viewer: Option<i64>,
    generation: u64,
}

/// Everything a profile load fetched. The follow list is only requested for
/// authenticated viewers.
#[derive(Debug)]
pub struct ProfileFetch {
    pub user: Result<User>,
    pub viewer_following: Option<Result<Vec<User>>>,
}

impl ProfileRequest {
    pub async fn fetch<A: SocialApi + ?Sized>(&self, api: &A) -> ProfileFetch {
        let user = api.get_user(self.user_id).await;
        let viewer_following = match (&user, self.viewer) {
            (Ok(_), Some(viewer)) => Some(api.list_following(viewer).await),
            _ => None,
        };
        ProfileFetch {
            user,
            viewer_following,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    user_id: i64,
    state: ProfileState,
    generation: u64,
    pub posts: FeedView,
}

impl ProfileView {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            state: ProfileState::Idle,
            generation: 0,
            posts: FeedView::new(FeedKind::User(user_id)),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn card(&self) -> Option<&ProfileCard> {
        match &self.state {
            ProfileState::Ready(card) => Some(card),
            _ => None,
        }
    }

    pub fn start(&mut self, session: &Session) -> ProfileRequest {
        self.generation += 1;
        self.state = ProfileState::Loading;
        ProfileRequest {
            user_id: self.user_id,
            viewer: session.identity().map(|identity| identity.id),
            generation: self.generation,
        }
    }

    pub fn apply(&mut self, request: ProfileRequest, fetch: ProfileFetch) -> bool {
        if request.generation != self.generation {
            return false;
        }

        self.state = match fetch.user {
            Ok(user) => {
                let following = match fetch.viewer_following {
                    Some(Ok(list)) => list.iter().any(|u| u.id == user.id),
                    Some(Err(e)) => {
                        tracing::error!("Error checking follow status: {}", e);
                        false
                    }
                    None => false,
                };
                let can_follow = request.viewer.is_some_and(|viewer| viewer != user.id);
                ProfileState::Ready(ProfileCard {
                    follow: FollowState {
                        following,
                        follower_count: user.follower_count,
                        status: MutationStatus::Idle,
                    },
                    can_follow,
                    user,
                })
            }
            Err(NetworkClientError::NotFound(_)) => ProfileState::Failed(USER_NOT_FOUND),
            Err(e) => {
                tracing::error!("Error fetching user profile {}: {}", self.user_id, e);
                ProfileState::Failed(PROFILE_LOAD_FAILED)
            }
        };
        true
    }

    /// Loads the profile card and the first page of posts together.
    pub async fn load<A: SocialApi + ?Sized>(&mut self, api: &A, session: &Session) -> Option<Route> {
        let request = self.start(session);
        let (fetch, redirect) = futures::join!(request.fetch(api), self.posts.load(api, session));
        self.apply(request, fetch);
        redirect
    }

    /// Applies the follow toggle locally; `None` if it is not offered or a
    /// previous toggle is still in flight.
    pub fn begin_follow_toggle(&mut self) -> Option<FollowIntent> {
        let ProfileState::Ready(card) = &mut self.state else {
            return None;
        };
        if !card.can_follow || card.follow.status.is_pending() {
            return None;
        }

        let follow = &mut card.follow;
        let intent = FollowIntent {
            user_id: card.user.id,
            follow: !follow.following,
            previous_following: follow.following,
            previous_count: follow.follower_count,
        };
        follow.following = intent.follow;
        follow.follower_count = if intent.follow {
            intent.previous_count + 1
        } else {
            (intent.previous_count - 1).max(0)
        };
        follow.status = MutationStatus::Pending;
        Some(intent)
    }

    pub fn finish_follow_toggle(&mut self, intent: &FollowIntent, result: Result<()>) {
        let ProfileState::Ready(card) = &mut self.state else {
            return;
        };
        if card.user.id != intent.user_id || !card.follow.status.is_pending() {
            return;
        }

        match result {
            Ok(()) => card.follow.status = MutationStatus::Committed,
            Err(e) => {
                tracing::error!("Error toggling follow status: {}", e);
                card.follow.following = intent.previous_following;
                card.follow.follower_count = intent.previous_count;
                card.follow.status = MutationStatus::Failed(failure_reason(&e, FOLLOW_FAILED));
            }
        }
    }

    pub async fn toggle_follow<A: SocialApi + ?Sized>(&mut self, api: &A) -> Option<&FollowState> {
        let intent = self.begin_follow_toggle()?;
        let result = intent.send(api).await;
        self.finish_follow_toggle(&intent, result);
        self.card().map(|card| &card.follow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::testing::{post, FakeApi};

    fn alice() -> Session {
        Session::Authenticated(Identity {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        })
    }

    #[tokio::test]
    async fn follow_status_comes_from_viewer_following_list() {
        let api = FakeApi::new();
        api.follow(1, 2);
        api.set_follower_count(2, 7);
        api.add_post(post(1, 2, 0, false));
        let mut view = ProfileView::new(2);

        view.load(&api, &alice()).await;

        let card = view.card().unwrap();
        assert!(card.follow.following);
        assert_eq!(card.follow.follower_count, 7);
        assert!(card.can_follow);
        assert_eq!(view.posts.ready().unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn anonymous_viewers_get_no_toggle() {
        let api = FakeApi::new();
        let mut view = ProfileView::new(2);

        view.load(&api, &Session::Anonymous).await;

        assert!(!view.card().unwrap().can_follow);
        assert_eq!(view.begin_follow_toggle(), None);
        assert!(!api.calls().iter().any(|c| c.starts_with("list_following")));
    }

    #[tokio::test]
    async fn own_profile_has_no_toggle() {
        let api = FakeApi::new();
        let mut view = ProfileView::new(1);

        view.load(&api, &alice()).await;

        assert!(!view.card().unwrap().can_follow);
    }

    #[tokio::test]
    async fn follow_increments_count_and_commits() {
        let api = FakeApi::new();
        api.set_follower_count(3, 4);
        let mut view = ProfileView::new(3);
        view.load(&api, &alice()).await;

        let follow = view.toggle_follow(&api).await.unwrap();

        assert!(follow.following);
        assert_eq!(follow.follower_count, 5);
        assert_eq!(follow.status, MutationStatus::Committed);
    }

    #[tokio::test]
    async fn failed_unfollow_is_rolled_back() {
        let api = FakeApi::new();
        api.follow(1, 2);
        api.set_follower_count(2, 4);
        api.fail_follows();
        let mut view = ProfileView::new(2);
        view.load(&api, &alice()).await;

        let follow = view.toggle_follow(&api).await.unwrap();

        assert!(follow.following);
        assert_eq!(follow.follower_count, 4);
        assert!(follow.status.failure().is_some());
    }

    #[test]
    fn toggle_is_refused_while_pending() {
        let mut view = ProfileView::new(2);
        let request = view.start(&alice());
        view.apply(
            request,
            ProfileFetch {
                user: Ok(crate::testing::user(2, "bob")),
                viewer_following: Some(Ok(Vec::new())),
            },
        );

        assert!(view.begin_follow_toggle().is_some());
        assert!(view.begin_follow_toggle().is_none());
    }

    #[tokio::test]
    async fn missing_user_is_reported() {
        let api = FakeApi::new();
        let mut view = ProfileView::new(99);

        view.load(&api, &alice()).await;

        assert_eq!(view.state(), &ProfileState::Failed(USER_NOT_FOUND));
    }
}
