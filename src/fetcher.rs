use crate::feeds::{Account, Page, Post, TwitterApi, PAGE_SIZE};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;

/// Timeline and friends retrieval for one configured account.
pub struct TwitterFetch {
    api: Arc<dyn TwitterApi>,
    user: Option<String>,
}

impl TwitterFetch {
    pub fn new(api: Arc<dyn TwitterApi>, user: Option<String>) -> Self {
        Self { api, user }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub async fn get_user_timeline(&self, count: usize) -> Result<Vec<Post>> {
        let user = self.user.as_deref();
        collect_pages(count, |cursor, size| async move {
            self.api.user_timeline(user, cursor.as_deref(), size).await
        })
        .await
    }

    pub async fn get_friends(&self, count: usize) -> Result<Vec<Account>> {
        let user = self.user.as_deref();
        collect_pages(count, |cursor, size| async move {
            self.api.friends(user, cursor.as_deref(), size).await
        })
        .await
    }

    pub async fn get_home_timeline(&self, count: usize) -> Result<Vec<Post>> {
        collect_pages(count, |cursor, size| async move {
            self.api.home_timeline(cursor.as_deref(), size).await
        })
        .await
    }
}

/// Request pages until `count` items are collected, a page comes back empty,
/// or the source has no next page. Any error aborts the whole collection.
async fn collect_pages<T, F, Fut>(count: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>, usize) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::with_capacity(count.min(PAGE_SIZE));
    let mut cursor = None;

    while items.len() < count {
        let remaining = count - items.len();
        let page = fetch_page(cursor.take(), remaining.min(PAGE_SIZE)).await?;
        if page.items.is_empty() {
            break;
        }

        items.extend(page.items.into_iter().take(remaining));
        tracing::debug!(collected = items.len(), wanted = count, "fetched page");

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}
