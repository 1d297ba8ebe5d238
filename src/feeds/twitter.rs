use super::{Account, Page, Post, StreamEvent, TwitterApi};
use crate::auth::AuthHandle;
use crate::config::ApiConfig;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

const USER_AGENT: &str = "tweetlens/0.1";
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Twitter API rate limit reached ({0})")]
    RateLimited(StatusCode),

    #[error("Twitter API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid created_at timestamp {0:?}")]
    Timestamp(String),
}

/// v1.1 REST client authenticated with a bearer token.
pub struct HttpTwitterApi {
    base_url: String,
    stream_url: String,
    auth: AuthHandle,
    client: reqwest::Client,
    stream_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: u64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(deserialize_with = "deserialize_created_at")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    favorite_count: u64,
    #[serde(default)]
    retweet_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: u64,
    screen_name: String,
    name: String,
    #[serde(default)]
    followers_count: u64,
}

#[derive(Debug, Deserialize)]
struct FriendsResponse {
    users: Vec<ApiUser>,
    #[serde(default)]
    next_cursor_str: Option<String>,
}

impl HttpTwitterApi {
    pub fn new(config: &ApiConfig, auth: AuthHandle) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // The feed is long-lived, so only the connect phase is bounded.
        let stream_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stream_url: config.stream_url.trim_end_matches('/').to_string(),
            auth,
            client,
            stream_client,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}?{}", self.base_url, endpoint, query_string(params));
        tracing::debug!(%url, "GET");

        let response = self.auth.apply(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn timeline(
        &self,
        endpoint: &str,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Post>> {
        let mut params = vec![
            ("count", count.to_string()),
            ("tweet_mode", "extended".to_string()),
        ];
        if let Some(user) = user {
            params.push(("screen_name", user.to_string()));
        }
        if let Some(max_id) = cursor {
            params.push(("max_id", max_id.to_string()));
        }

        let tweets: Vec<ApiTweet> = self.get_json(endpoint, &params).await?;
        Ok(timeline_page(tweets))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if is_rate_limit(status.as_u16()) {
        return Err(ApiError::RateLimited(status));
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

/// 420 is what the v1.1 stream sends; 429 is the REST equivalent.
pub fn is_rate_limit(status: u16) -> bool {
    status == 420 || status == StatusCode::TOO_MANY_REQUESTS.as_u16()
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_created_at(&raw).map_err(serde::de::Error::custom)
}

fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::Timestamp(raw.to_string()))
}

/// Timelines page backwards by id: the next page holds everything older than
/// the oldest post seen so far.
fn timeline_page(tweets: Vec<ApiTweet>) -> Page<Post> {
    let next = tweets
        .last()
        .and_then(|oldest| oldest.id.checked_sub(1))
        .map(|max_id| max_id.to_string());

    let items = tweets
        .into_iter()
        .map(|t| Post {
            id: t.id,
            text: t.full_text.or(t.text).unwrap_or_default(),
            created_at: t.created_at,
            source: platform_name(&t.source),
            like_count: t.favorite_count,
            repost_count: t.retweet_count,
        })
        .collect();

    Page { items, next }
}

fn friends_page(response: FriendsResponse) -> Page<Account> {
    let next = response.next_cursor_str.filter(|cursor| cursor != "0");
    let items = response
        .users
        .into_iter()
        .map(|u| Account {
            id: u.id,
            screen_name: u.screen_name,
            name: u.name,
            followers_count: u.followers_count,
        })
        .collect();

    Page { items, next }
}

/// The v1.1 `source` field is an HTML anchor around the client name.
fn platform_name(source: &str) -> String {
    if !source.trim_start().starts_with('<') {
        return source.trim().to_string();
    }

    let fragment = Html::parse_fragment(source);
    let anchor_text = Selector::parse("a").ok().and_then(|selector| {
        fragment
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    });

    anchor_text
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| source.trim().to_string())
}

/// Splits the feed body into lines. Keep-alive blank lines are dropped and a
/// trailing `\r` is stripped; a partial line waits for the next chunk.
#[derive(Debug, Default)]
struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end_matches(['\n', '\r']);
            if !text.trim().is_empty() {
                lines.push(text.to_string());
            }
        }
        lines
    }
}

#[async_trait]
impl TwitterApi for HttpTwitterApi {
    async fn user_timeline(
        &self,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Post>> {
        self.timeline("statuses/user_timeline.json", user, cursor, count)
            .await
    }

    async fn friends(
        &self,
        user: Option<&str>,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<Page<Account>> {
        let mut params = vec![
            ("count", count.to_string()),
            ("cursor", cursor.unwrap_or("-1").to_string()),
            ("skip_status", "true".to_string()),
            ("include_user_entities", "false".to_string()),
        ];
        if let Some(user) = user {
            params.push(("screen_name", user.to_string()));
        }

        let response: FriendsResponse = self.get_json("friends/list.json", &params).await?;
        Ok(friends_page(response))
    }

    async fn home_timeline(&self, cursor: Option<&str>, count: usize) -> Result<Page<Post>> {
        self.timeline("statuses/home_timeline.json", None, cursor, count)
            .await
    }

    async fn filter_stream(
        &self,
        track: &[String],
        events: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        let url = format!("{}/statuses/filter.json", self.stream_url);
        let body = query_string(&[("track", track.join(","))]);
        tracing::info!(%url, track = %track.join(","), "opening filtered stream");

        let response = self
            .auth
            .apply(self.stream_client.post(&url))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Receiver gone means the listener already stopped.
            let _ = events.send(StreamEvent::Error(status.as_u16())).await;
            return Ok(());
        }

        let mut framer = LineFramer::default();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for line in framer.push(&chunk) {
                if events.send(StreamEvent::Data(line)).await.is_err() {
                    return Ok(());
                }
            }
        }

        tracing::info!("filtered stream closed by server");
        Ok(())
    }
}
