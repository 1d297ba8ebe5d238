use crate::analysis::{LexiconPolarity, SentimentScorer};
use crate::auth::Authenticator;
use crate::config::{Config, SentimentConfig};
use crate::feeds::twitter::HttpTwitterApi;
use crate::feeds::TwitterApi;
use crate::fetcher::TwitterFetch;
use crate::report::{build_table, render_accounts, Table};
use crate::stream::StreamController;
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub count: usize,
    /// Read the home timeline instead of the user's own posts.
    pub home: bool,
    pub text_width: usize,
}

/// Credential, then auth handle, then a live client.
pub fn connect(config: &Config) -> Result<Arc<dyn TwitterApi>> {
    let credential = config.credential()?;
    let auth = Authenticator::new(credential).authenticate();
    Ok(Arc::new(HttpTwitterApi::new(&config.api, auth)))
}

pub fn scorer(config: &SentimentConfig) -> SentimentScorer {
    SentimentScorer::new(Box::new(LexiconPolarity::new().with_words(&config.words)))
}

/// An empty name means the authenticating account.
pub fn target_user(user: &str) -> Option<String> {
    Some(user.trim().trim_start_matches('@').to_string()).filter(|u| !u.is_empty())
}

pub async fn build_report(
    fetch: &TwitterFetch,
    scorer: &SentimentScorer,
    options: &ReportOptions,
) -> Result<Table> {
    let posts = if options.home {
        fetch.get_home_timeline(options.count).await?
    } else {
        fetch.get_user_timeline(options.count).await?
    };
    tracing::info!(
        user = fetch.user().unwrap_or("<me>"),
        posts = posts.len(),
        "fetched timeline"
    );

    let mut table = build_table(&posts).with_text_width(options.text_width);
    table.attach_sentiment(scorer);
    Ok(table)
}

/// The table, then the summary line when asked for and available. A closed
/// stdout comes back as an error.
pub fn write_report(out: &mut impl Write, table: &Table, summary: bool) -> std::io::Result<()> {
    out.write_all(table.render().as_bytes())?;
    if summary {
        if let Some(summary) = table.summary() {
            writeln!(out, "{}", summary)?;
        }
    }
    out.flush()
}

pub async fn friends_report(fetch: &TwitterFetch, count: usize) -> Result<String> {
    let friends = fetch.get_friends(count).await?;
    tracing::info!(friends = friends.len(), "fetched friends");
    Ok(render_accounts(&friends))
}

pub async fn run_stream(
    api: Arc<dyn TwitterApi>,
    output: &Path,
    track: &[String],
    echo: bool,
) -> Result<()> {
    StreamController::new(api)
        .with_echo(echo)
        .stream(output, track)
        .await
}
