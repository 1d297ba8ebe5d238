pub mod listener;

pub use listener::{ListenerState, StreamListener};

use crate::feeds::TwitterApi;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 64;

/// Opens the keyword-filtered feed and hands every event to a listener.
pub struct StreamController {
    api: Arc<dyn TwitterApi>,
    echo: bool,
}

impl StreamController {
    pub fn new(api: Arc<dyn TwitterApi>) -> Self {
        Self { api, echo: false }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Blocks until the listener stops on a rate limit or the feed closes.
    pub async fn stream(&self, filename: &Path, hashtags: &[String]) -> Result<()> {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);

        let api = self.api.clone();
        let track = hashtags.to_vec();
        let producer = tokio::spawn(async move { api.filter_stream(&track, tx).await });

        let mut listener = StreamListener::new(filename).with_echo(self.echo);
        tracing::info!(path = %filename.display(), "listening");

        if listener.run(&mut rx).await == ListenerState::Stopped {
            producer.abort();
            tracing::info!("stream stopped");
            return Ok(());
        }

        producer.await??;
        tracing::info!("stream ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::fake::FakeTwitterApi;
    use crate::feeds::StreamEvent;

    fn controller(api: FakeTwitterApi) -> StreamController {
        StreamController::new(Arc::new(api))
    }

    #[tokio::test]
    async fn test_stream_stops_on_rate_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let api = FakeTwitterApi {
            stream_events: vec![
                StreamEvent::Data("one".to_string()),
                StreamEvent::Error(420),
                StreamEvent::Data("two".to_string()),
            ],
            ..FakeTwitterApi::default()
        };

        controller(api)
            .stream(&path, &["rust".to_string()])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\n");
    }

    #[tokio::test]
    async fn test_stream_runs_until_feed_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let api = FakeTwitterApi {
            stream_events: vec![
                StreamEvent::Data("one".to_string()),
                StreamEvent::Error(503),
                StreamEvent::Data("two".to_string()),
            ],
            ..FakeTwitterApi::default()
        };

        controller(api)
            .with_echo(true)
            .stream(&path, &[])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[tokio::test]
    async fn test_feed_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeTwitterApi {
            fail_with: Some("connection refused".to_string()),
            ..FakeTwitterApi::default()
        };

        let err = controller(api)
            .stream(&dir.path().join("out.json"), &["rust".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
