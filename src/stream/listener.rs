use crate::feeds::twitter::is_rate_limit;
use crate::feeds::StreamEvent;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Listening,
    Stopped,
}

/// Appends every item of the feed to a file, one per line, until the feed
/// reports a rate limit. Write failures are logged and skipped.
pub struct StreamListener {
    path: PathBuf,
    echo: Option<Box<dyn Write + Send>>,
    state: ListenerState,
}

impl fmt::Debug for StreamListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamListener")
            .field("path", &self.path)
            .field("echo", &self.echo.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl StreamListener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            echo: None,
            state: ListenerState::Listening,
        }
    }

    /// Also print each raw item to stdout.
    pub fn with_echo(self, echo: bool) -> Self {
        if echo {
            self.with_echo_writer(std::io::stdout())
        } else {
            Self { echo: None, ..self }
        }
    }

    pub fn with_echo_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.echo = Some(Box::new(writer));
        self
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn on_data(&mut self, raw: &str) {
        if let Some(out) = self.echo.as_mut() {
            if let Err(e) = writeln!(out, "{}", raw).and_then(|_| out.flush()) {
                tracing::error!(error = %e, "failed to echo stream item");
            }
        }
        if let Err(e) = self.append(raw).await {
            tracing::error!(path = %self.path.display(), error = %e, "failed to append stream item");
        }
    }

    pub fn on_error(&mut self, status: u16) {
        if is_rate_limit(status) {
            tracing::warn!(status, "stream rate limited, stopping");
            self.state = ListenerState::Stopped;
        } else {
            tracing::warn!(status, "stream error");
        }
    }

    pub async fn handle(&mut self, event: StreamEvent) -> ListenerState {
        if self.state == ListenerState::Stopped {
            return self.state;
        }
        match event {
            StreamEvent::Data(raw) => self.on_data(&raw).await,
            StreamEvent::Error(status) => self.on_error(status),
        }
        self.state
    }

    /// Consume events in order until stopped or the sender side is gone.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<StreamEvent>) -> ListenerState {
        while self.state == ListenerState::Listening {
            match events.recv().await {
                Some(event) => {
                    self.handle(event).await;
                }
                None => break,
            }
        }
        self.state
    }

    async fn append(&self, raw: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(raw.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
}
