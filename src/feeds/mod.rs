pub mod twitter;

#[cfg(test)]
pub(crate) mod fake;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Maximum number of items the v1.1 endpoints return per request.
pub const PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Client the post was sent from, e.g. "Twitter for iPhone".
    pub source: String,
    pub like_count: u64,
    pub repost_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: u64,
    pub screen_name: String,
    pub name: String,
    pub followers_count: u64,
}

/// One page of results plus the cursor for the page after it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// What the filtered feed pushes to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A raw item exactly as received (one line of the feed).
    Data(String),
    /// HTTP status the feed reported instead of data.
    Error(u16),
}

/// Remote operations the fetch and stream paths need.
///
/// `user` is a screen name; `None` means the authenticating account.
/// `cursor` is whatever the previous page returned in `next`.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    async fn user_timeline(
        &self,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Post>>;

    async fn friends(
        &self,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Account>>;

    async fn home_timeline(&self, cursor: Option<&str>, count: usize) -> Result<Page<Post>>;

    /// Open the live feed for `track` and push events into `events` until the
    /// feed closes or the receiver goes away.
    async fn filter_stream(&self, track: &[String], events: mpsc::Sender<StreamEvent>)
        -> Result<()>;
}
