//! The conversation engine: session state machine over the post registry.
//!
//! [`Engine`] owns the in-memory [`Document`] behind a single async mutex.
//! Every operation runs its whole read-modify-write sequence plus the store
//! save inside that one critical section, so a `can_submit` check and the
//! submission it guards are atomic, and the post id allocator is globally
//! serialized. The subscription oracle is consulted outside the lock -- it
//! may be backed by a platform call in the transport layer.
//!
//! The engine never formats display text. Each operation returns an
//! [`Outcome`] carrying the structured data (state reached, feed contents,
//! rejection kind) the transport needs to render a response.

use std::collections::HashSet;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use peerboost_types::config::HubConfig;
use peerboost_types::document::Document;
use peerboost_types::error::{EngineError, ValidationError};
use peerboost_types::post::{Category, Post, PostId};
use peerboost_types::session::SessionState;
use peerboost_types::user::{User, UserId};

use crate::registry::{self, Feed};
use crate::store::DocumentStore;
use crate::subscription::SubscriptionOracle;
use crate::validate;

/// Structured result of an engine operation, consumed by the transport
/// layer to render a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The user must follow the community channel before submitting.
    SubscriptionRequired,
    /// Session is at category selection.
    CategoryPrompt,
    /// Category recorded; a title is expected next.
    TitlePrompt { category: Category },
    /// Title recorded; the content URL is expected next.
    UrlPrompt,
    /// Input rejected; the session state is unchanged.
    Rejected { error: ValidationError },
    /// The user already submitted today; they are routed straight to the
    /// reciprocation feed.
    DailyLimitReached { feed: Feed },
    /// Submission accepted and persisted.
    Submitted { post: Post, feed: Feed },
    /// The user confirmed supporting the feed's authors; session cleared.
    SupportAcknowledged,
    /// The session was cleared, either explicitly or because its state no
    /// longer made sense.
    SessionReset,
    /// The input is not meaningful in the current state.
    Ignored,
}

/// Back-navigation targets exposed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackTarget {
    /// Back to category selection; collected fields are discarded.
    Categories,
    /// Back to title entry; the category is kept, the title discarded.
    Title,
    /// Abandon the flow entirely.
    Start,
}

/// Tunables and the admin allowlist, typically derived from [`HubConfig`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub admin_ids: HashSet<UserId>,
    pub feed_limit_per_category: usize,
    pub feed_max_total: Option<usize>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&HubConfig::default())
    }
}

impl From<&HubConfig> for EngineOptions {
    fn from(config: &HubConfig) -> Self {
        Self {
            admin_ids: config.admin_ids.iter().copied().collect(),
            feed_limit_per_category: config.feed_limit_per_category,
            feed_max_total: config.feed_max_total_opt(),
        }
    }
}

/// The session/state engine.
///
/// Generic over the document store and the subscription oracle so the core
/// stays free of IO and platform concerns.
pub struct Engine<S: DocumentStore, O: SubscriptionOracle> {
    store: S,
    oracle: O,
    options: EngineOptions,
    doc: Mutex<Document>,
}

impl<S: DocumentStore, O: SubscriptionOracle> Engine<S, O> {
    /// Load the persisted document and build an engine around it.
    ///
    /// A document whose allocator fell behind its stored posts (hand-edited
    /// or written by a buggy build) is repaired here, so a freshly minted id
    /// can never collide with an existing one.
    pub async fn open(store: S, oracle: O, options: EngineOptions) -> Self {
        let mut doc = store.load().await;
        if !doc.allocator_consistent() {
            let next = doc.posts.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
            warn!(
                stored = doc.next_post_id,
                repaired = next,
                "post id allocator behind stored posts; repairing"
            );
            doc.next_post_id = next;
        }
        debug!(
            posts = doc.posts.len(),
            users = doc.users.len(),
            sessions = doc.sessions.len(),
            "document loaded"
        );
        Self {
            store,
            oracle,
            options,
            doc: Mutex::new(doc),
        }
    }

    async fn persist(&self, doc: &Document) -> Result<(), EngineError> {
        self.store.save(doc).await.map_err(|err| {
            warn!(error = %err, "document save failed; mutation not committed");
            EngineError::from(err)
        })
    }

    fn feed(&self, doc: &Document) -> Feed {
        registry::recent_feed(
            doc,
            self.options.feed_limit_per_category,
            self.options.feed_max_total,
        )
    }

    // --- Conversation operations ---

    /// Entry point: register/refresh the user and, if the subscription
    /// oracle admits them, move the session to category selection.
    pub async fn on_start(
        &self,
        user: UserId,
        display_name: Option<&str>,
    ) -> Result<Outcome, EngineError> {
        let subscribed = self.oracle.is_subscribed(user).await;

        let mut doc = self.doc.lock().await;
        touch_user(&mut doc, user, display_name);

        if subscribed {
            doc.sessions.insert(user, SessionState::AwaitingCategory);
        } else {
            doc.sessions.remove(&user);
        }
        self.persist(&doc).await?;

        Ok(if subscribed {
            Outcome::CategoryPrompt
        } else {
            Outcome::SubscriptionRequired
        })
    }

    /// A category button was pressed.
    pub async fn on_category_chosen(
        &self,
        user: UserId,
        category: &str,
    ) -> Result<Outcome, EngineError> {
        let mut doc = self.doc.lock().await;
        touch_user(&mut doc, user, None);

        let Ok(category) = category.parse::<Category>() else {
            self.persist(&doc).await?;
            return Ok(Outcome::Rejected {
                error: ValidationError::UnknownCategory(category.to_string()),
            });
        };

        let state = doc.sessions.get(&user).cloned().unwrap_or_default();
        let outcome = match state {
            SessionState::Start | SessionState::AwaitingCategory => {
                doc.sessions
                    .insert(user, SessionState::AwaitingTitle { category });
                Outcome::TitlePrompt { category }
            }
            _ => Outcome::Ignored,
        };
        self.persist(&doc).await?;
        Ok(outcome)
    }

    /// Free-text input, interpreted according to the session state.
    pub async fn on_text_input(&self, user: UserId, text: &str) -> Result<Outcome, EngineError> {
        let mut doc = self.doc.lock().await;
        touch_user(&mut doc, user, None);

        let now = Utc::now();
        let text = text.trim();
        let state = doc.sessions.get(&user).cloned().unwrap_or_default();

        let outcome = match state {
            SessionState::AwaitingTitle { category } => {
                if !registry::can_submit(&doc, user, now.date_naive()) {
                    doc.sessions
                        .insert(user, SessionState::AwaitingSupportConfirmation);
                    Outcome::DailyLimitReached {
                        feed: self.feed(&doc),
                    }
                } else if let Err(error) = validate::validate_title(text) {
                    Outcome::Rejected { error }
                } else {
                    doc.sessions.insert(
                        user,
                        SessionState::AwaitingUrl {
                            category,
                            title: text.to_string(),
                        },
                    );
                    Outcome::UrlPrompt
                }
            }

            SessionState::AwaitingUrl { category, title } => {
                if !validate::is_valid_url(text) {
                    Outcome::Rejected {
                        error: ValidationError::InvalidUrl(text.to_string()),
                    }
                } else if !registry::can_submit(&doc, user, now.date_naive()) {
                    // Re-checked here, inside the same critical section as
                    // the allocation below.
                    doc.sessions
                        .insert(user, SessionState::AwaitingSupportConfirmation);
                    Outcome::DailyLimitReached {
                        feed: self.feed(&doc),
                    }
                } else {
                    let post = registry::allocate_post(
                        &mut doc,
                        user,
                        category,
                        title,
                        text.to_string(),
                        now,
                    );
                    doc.sessions
                        .insert(user, SessionState::AwaitingSupportConfirmation);
                    info!(
                        target: "peerboost::posts",
                        post_id = %post.id,
                        author = %user,
                        category = %post.category,
                        title = %post.title,
                        url = %post.url,
                        "new post"
                    );
                    Outcome::Submitted {
                        post,
                        feed: self.feed(&doc),
                    }
                }
            }

            _ => Outcome::Ignored,
        };

        self.persist(&doc).await?;
        Ok(outcome)
    }

    /// The user confirmed they supported the authors in the feed.
    pub async fn on_support_confirmed(&self, user: UserId) -> Result<Outcome, EngineError> {
        let mut doc = self.doc.lock().await;
        touch_user(&mut doc, user, None);
        doc.sessions.remove(&user);
        self.persist(&doc).await?;
        Ok(Outcome::SupportAcknowledged)
    }

    /// Back-navigation. Data for fields past the target step is discarded;
    /// an unreachable target forces a session reset.
    pub async fn on_back_navigation(
        &self,
        user: UserId,
        target: BackTarget,
    ) -> Result<Outcome, EngineError> {
        let mut doc = self.doc.lock().await;
        touch_user(&mut doc, user, None);

        let state = doc.sessions.get(&user).cloned().unwrap_or_default();
        let outcome = match target {
            BackTarget::Categories => {
                doc.sessions.insert(user, SessionState::AwaitingCategory);
                Outcome::CategoryPrompt
            }
            BackTarget::Title => match state.category() {
                Some(category) => {
                    doc.sessions
                        .insert(user, SessionState::AwaitingTitle { category });
                    Outcome::TitlePrompt { category }
                }
                None => {
                    warn!(user = %user, state = %state, "back to title without a category; resetting session");
                    doc.sessions.remove(&user);
                    Outcome::SessionReset
                }
            },
            BackTarget::Start => {
                doc.sessions.remove(&user);
                Outcome::SessionReset
            }
        };
        self.persist(&doc).await?;
        Ok(outcome)
    }

    // --- Queries ---

    /// Current reciprocation feed.
    pub async fn recent_feed(&self) -> Feed {
        let doc = self.doc.lock().await;
        self.feed(&doc)
    }

    /// Current session state for a user (`Start` when none is stored).
    pub async fn session_state(&self, user: UserId) -> SessionState {
        let doc = self.doc.lock().await;
        doc.sessions.get(&user).cloned().unwrap_or_default()
    }

    /// All stored sessions.
    pub async fn sessions(&self) -> Vec<(UserId, SessionState)> {
        let doc = self.doc.lock().await;
        let mut sessions: Vec<_> = doc
            .sessions
            .iter()
            .map(|(id, state)| (*id, state.clone()))
            .collect();
        sessions.sort_by_key(|(id, _)| *id);
        sessions
    }

    /// All stored posts, oldest first.
    pub async fn posts(&self) -> Vec<Post> {
        self.doc.lock().await.posts.clone()
    }

    /// Known user records.
    pub async fn users(&self) -> Vec<User> {
        let doc = self.doc.lock().await;
        let mut users: Vec<_> = doc.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    // --- Moderation (local operator surface) ---

    /// Delete a post by id. Returns whether a post was removed.
    pub async fn delete_post(&self, id: PostId) -> Result<bool, EngineError> {
        let mut doc = self.doc.lock().await;
        let removed = registry::delete_post(&mut doc, id);
        if removed {
            self.persist(&doc).await?;
            info!(post_id = %id, "post deleted");
        }
        Ok(removed)
    }

    /// Clear all posts. Returns the prior count.
    pub async fn clear_posts(&self) -> Result<usize, EngineError> {
        let mut doc = self.doc.lock().await;
        let count = registry::clear_posts(&mut doc);
        self.persist(&doc).await?;
        info!(count, "post collection cleared");
        Ok(count)
    }

    // --- Moderation (chat-originated, allowlist-gated) ---

    fn require_admin(&self, caller: UserId) -> Result<(), EngineError> {
        if self.options.admin_ids.contains(&caller) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    /// List all posts, for callers on the admin allowlist.
    pub async fn admin_list_posts(&self, caller: UserId) -> Result<Vec<Post>, EngineError> {
        self.require_admin(caller)?;
        Ok(self.posts().await)
    }

    /// Delete a post, for callers on the admin allowlist.
    pub async fn admin_delete_post(
        &self,
        caller: UserId,
        id: PostId,
    ) -> Result<bool, EngineError> {
        self.require_admin(caller)?;
        self.delete_post(id).await
    }

    /// Clear all posts, for callers on the admin allowlist.
    pub async fn admin_delete_all(&self, caller: UserId) -> Result<usize, EngineError> {
        self.require_admin(caller)?;
        self.clear_posts().await
    }
}

/// Create or refresh the caller's user record.
fn touch_user(doc: &mut Document, user: UserId, display_name: Option<&str>) {
    let now = Utc::now();
    doc.users
        .entry(user)
        .and_modify(|record| record.touch(display_name.map(str::to_string), now))
        .or_insert_with(|| User::new(user, display_name.map(str::to_string), now));
}
