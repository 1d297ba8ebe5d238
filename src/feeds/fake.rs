//! In-memory `TwitterApi` for tests.

use super::{Account, Page, Post, StreamEvent, TwitterApi};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub fn post(id: u64, text: &str) -> Post {
    Post {
        id,
        text: text.to_string(),
        created_at: Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 0).unwrap(),
        source: "Twitter for iPhone".to_string(),
        like_count: id * 10,
        repost_count: id,
    }
}

pub fn account(id: u64, screen_name: &str) -> Account {
    Account {
        id,
        screen_name: screen_name.to_string(),
        name: screen_name.to_uppercase(),
        followers_count: id * 100,
    }
}

#[derive(Default)]
pub struct FakeTwitterApi {
    pub posts: Vec<Post>,
    pub accounts: Vec<Account>,
    /// Caps every page below what was asked for, like a server that pages small.
    pub max_page: Option<usize>,
    pub stream_events: Vec<StreamEvent>,
    pub fail_with: Option<String>,
    /// `(endpoint, user, count)` for every page request.
    pub calls: Mutex<Vec<(&'static str, Option<String>, usize)>>,
}

impl FakeTwitterApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, endpoint: &'static str, user: Option<&str>, count: usize) {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, user.map(str::to_string), count));
    }

    /// Cursor is the index of the first item of the page.
    fn page<T: Clone>(&self, items: &[T], cursor: Option<&str>, count: usize) -> Result<Page<T>> {
        if let Some(message) = &self.fail_with {
            anyhow::bail!("{}", message);
        }

        let start: usize = cursor.map(str::parse).transpose()?.unwrap_or(0);
        let size = self.max_page.map_or(count, |max| count.min(max));
        let end = (start + size).min(items.len());
        let page_items = items.get(start..end).unwrap_or_default().to_vec();
        let next = (end < items.len()).then(|| end.to_string());

        Ok(Page {
            items: page_items,
            next,
        })
    }
}

#[async_trait]
impl TwitterApi for FakeTwitterApi {
    async fn user_timeline(
        &self,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Post>> {
        self.record("user_timeline", user, count);
        self.page(&self.posts, cursor, count)
    }

    async fn friends(
        &self,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Account>> {
        self.record("friends", user, count);
        self.page(&self.accounts, cursor, count)
    }

    async fn home_timeline(&self, cursor: Option<&str>, count: usize) -> Result<Page<Post>> {
        self.record("home_timeline", None, count);
        self.page(&self.posts, cursor, count)
    }

    async fn filter_stream(
        &self,
        _track: &[String],
        events: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        if let Some(message) = &self.fail_with {
            anyhow::bail!("{}", message);
        }
        for event in self.stream_events.clone() {
            if events.send(event).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}
