use crate::api::SocialApi;
use crate::error::Result;
use crate::models::Post;
use crate::mutation::{failure_reason, MutationStatus};
use crate::session::Session;

const LIKE_FAILED: &str = "Could not update like";
const EDIT_FAILED: &str = "Could not save post";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

/// A like toggle that has been applied locally and still has to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeIntent {
    pub post_id: i64,
    pub action: LikeAction,
    previous_liked: bool,
    previous_count: i64,
}

impl LikeIntent {
    pub async fn send<A: SocialApi + ?Sized>(&self, api: &A) -> Result<()> {
        match self.action {
            LikeAction::Like => api.like_post(self.post_id).await,
            LikeAction::Unlike => api.unlike_post(self.post_id).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub content: String,
    pub status: MutationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveIntent {
    pub post_id: i64,
    pub content: String,
}

impl SaveIntent {
    pub async fn send<A: SocialApi + ?Sized>(&self, api: &A) -> Result<Post> {
        api.update_post(self.post_id, &self.content).await
    }
}

/// One post as displayed, with its like and edit affordances.
#[derive(Debug, Clone, PartialEq)]
pub struct PostItem {
    post: Post,
    like_status: MutationStatus,
    edit: Option<EditBuffer>,
}

impl From<Post> for PostItem {
    fn from(post: Post) -> Self {
        Self {
            post,
            like_status: MutationStatus::Idle,
            edit: None,
        }
    }
}

impl PostItem {
    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn id(&self) -> i64 {
        self.post.id
    }

    pub fn is_liked(&self) -> bool {
        self.post.is_liked
    }

    pub fn likes(&self) -> i64 {
        self.post.like_count
    }

    pub fn like_status(&self) -> &MutationStatus {
        &self.like_status
    }

    pub fn edit(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn is_own(&self, session: &Session) -> bool {
        session.is_user(self.post.user)
    }

    /// Flips the like state locally. Returns `None` while a previous toggle is
    /// still in flight.
    pub fn begin_like_toggle(&mut self) -> Option<LikeIntent> {
        if self.like_status.is_pending() {
            tracing::debug!("Like toggle for post {} already pending", self.post.id);
            return None;
        }

        let intent = LikeIntent {
            post_id: self.post.id,
            action: if self.post.is_liked {
                LikeAction::Unlike
            } else {
                LikeAction::Like
            },
            previous_liked: self.post.is_liked,
            previous_count: self.post.like_count,
        };

        self.post.is_liked = !intent.previous_liked;
        self.post.like_count = match intent.action {
            LikeAction::Like => intent.previous_count + 1,
            LikeAction::Unlike => (intent.previous_count - 1).max(0),
        };
        self.like_status = MutationStatus::Pending;
        Some(intent)
    }

    /// Commits or reverts a toggle once the backend answered.
    pub fn finish_like_toggle(&mut self, intent: &LikeIntent, result: Result<()>) {
        if intent.post_id != self.post.id || !self.like_status.is_pending() {
            return;
        }

        match result {
            Ok(()) => self.like_status = MutationStatus::Committed,
            Err(e) => {
                tracing::error!("Error toggling like on post {}: {}", self.post.id, e);
                self.post.is_liked = intent.previous_liked;
                self.post.like_count = intent.previous_count;
                self.like_status = MutationStatus::Failed(failure_reason(&e, LIKE_FAILED));
            }
        }
    }

    pub async fn toggle_like<A: SocialApi + ?Sized>(&mut self, api: &A) -> Option<&MutationStatus> {
        let intent = self.begin_like_toggle()?;
        let result = intent.send(api).await;
        self.finish_like_toggle(&intent, result);
        Some(&self.like_status)
    }

    /// Enters edit mode with the current content. Only the author may edit.
    pub fn begin_edit(&mut self, session: &Session) -> bool {
        if !self.is_own(session) {
            return false;
        }
        if self.edit.is_none() {
            self.edit = Some(EditBuffer {
                content: self.post.content.clone(),
                status: MutationStatus::Idle,
            });
        }
        true
    }

    pub fn set_edit_content(&mut self, content: impl Into<String>) {
        if let Some(edit) = self.edit.as_mut() {
            if !edit.status.is_pending() {
                edit.content = content.into();
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.edit.as_ref().is_some_and(|e| !e.status.is_pending()) {
            self.edit = None;
        }
    }

    /// Blank content, no edit in progress or a save already in flight all
    /// yield `None` and nothing is sent.
    pub fn begin_save(&mut self) -> Option<SaveIntent> {
        let edit = self.edit.as_mut()?;
        if edit.status.is_pending() || edit.content.trim().is_empty() {
            return None;
        }
        edit.status = MutationStatus::Pending;
        Some(SaveIntent {
            post_id: self.post.id,
            content: edit.content.clone(),
        })
    }

    /// On success the saved post replaces the displayed one and edit mode
    /// ends; on failure the buffer stays open with the attempted text.
    pub fn finish_save(&mut self, intent: &SaveIntent, result: Result<Post>) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if intent.post_id != self.post.id || !edit.status.is_pending() {
            return;
        }

        match result {
            Ok(updated) => {
                self.post.content = updated.content;
                self.post.updated_at = updated.updated_at;
                self.edit = None;
            }
            Err(e) => {
                tracing::error!("Error updating post {}: {}", self.post.id, e);
                edit.status = MutationStatus::Failed(failure_reason(&e, EDIT_FAILED));
            }
        }
    }

    pub async fn save_edit<A: SocialApi + ?Sized>(&mut self, api: &A) -> bool {
        let Some(intent) = self.begin_save() else {
            return false;
        };
        let result = intent.send(api).await;
        self.finish_save(&intent, result);
        !self.is_editing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::testing::{post, FakeApi};

    fn author_session() -> Session {
        Session::Authenticated(Identity {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        })
    }

    #[test]
    fn like_toggle_is_applied_before_the_call() {
        let mut item = PostItem::from(post(10, 2, 5, false));

        let intent = item.begin_like_toggle().unwrap();

        assert_eq!(intent.action, LikeAction::Like);
        assert!(item.is_liked());
        assert_eq!(item.likes(), 6);
        assert!(item.like_status().is_pending());
    }

    #[test]
    fn second_toggle_while_pending_is_ignored() {
        let mut item = PostItem::from(post(10, 2, 5, false));
        let _first = item.begin_like_toggle().unwrap();

        assert_eq!(item.begin_like_toggle(), None);
        assert_eq!(item.likes(), 6);
    }

    #[tokio::test]
    async fn successful_unlike_commits() {
        let api = FakeApi::new();
        let mut item = PostItem::from(post(10, 2, 5, true));

        item.toggle_like(&api).await;

        assert!(!item.is_liked());
        assert_eq!(item.likes(), 4);
        assert_eq!(item.like_status(), &MutationStatus::Committed);
        assert_eq!(api.calls(), vec!["unlike_post 10".to_string()]);
    }

    #[tokio::test]
    async fn failed_like_is_rolled_back() {
        let api = FakeApi::new();
        api.fail_likes();
        let mut item = PostItem::from(post(10, 2, 5, false));

        item.toggle_like(&api).await;

        assert!(!item.is_liked());
        assert_eq!(item.likes(), 5);
        assert!(item.like_status().failure().is_some());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut item = PostItem::from(post(10, 2, 5, false));
        let intent = item.begin_like_toggle().unwrap();
        let mut reloaded = PostItem::from(post(10, 2, 6, true));

        reloaded.finish_like_toggle(&intent, Err(crate::error::NetworkClientError::NotFound(None)));

        assert_eq!(reloaded.likes(), 6);
        assert!(reloaded.is_liked());
    }

    #[test]
    fn only_the_author_can_edit() {
        let mut item = PostItem::from(post(10, 2, 0, false));
        assert!(!item.begin_edit(&author_session()));
        assert!(!item.begin_edit(&Session::Anonymous));

        let mut own = PostItem::from(post(11, 1, 0, false));
        assert!(own.begin_edit(&author_session()));
        assert_eq!(own.edit().unwrap().content, own.post().content);
    }

    #[tokio::test]
    async fn blank_edit_is_not_sent() {
        let api = FakeApi::new();
        let mut item = PostItem::from(post(11, 1, 0, false));
        item.begin_edit(&author_session());
        item.set_edit_content("   \n\t");

        assert!(!item.save_edit(&api).await);
        assert!(item.is_editing());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn saved_edit_replaces_content() {
        let api = FakeApi::new();
        api.add_post(post(11, 1, 0, false));
        let mut item = PostItem::from(post(11, 1, 0, false));
        item.begin_edit(&author_session());
        item.set_edit_content("edited");

        assert!(item.save_edit(&api).await);
        assert_eq!(item.post().content, "edited");
        assert!(!item.is_editing());
        assert_eq!(api.calls(), vec!["update_post 11 edited".to_string()]);
    }

    #[tokio::test]
    async fn failed_edit_stays_in_edit_mode() {
        let api = FakeApi::new();
        let mut item = PostItem::from(post(11, 1, 0, false));
        item.begin_edit(&author_session());
        item.set_edit_content("edited");

        assert!(!item.save_edit(&api).await);
        let edit = item.edit().unwrap();
        assert_eq!(edit.content, "edited");
        assert!(edit.status.failure().is_some());
        assert_eq!(item.post().content, "post 11");
    }
}
