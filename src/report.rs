use crate::analysis::{SentimentLabel, SentimentScorer};
use crate::feeds::{Account, Post};
use chrono::{DateTime, Utc};
use std::fmt;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct Column {
    header: &'static str,
    numeric: bool,
}

static POST_COLUMNS: [Column; 7] = [
    Column { header: "text", numeric: false },
    Column { header: "id", numeric: true },
    Column { header: "length", numeric: true },
    Column { header: "date", numeric: false },
    Column { header: "platform", numeric: false },
    Column { header: "likes", numeric: true },
    Column { header: "reposts", numeric: true },
];

static SENTIMENT_COLUMN: Column = Column {
    header: "sentiment",
    numeric: true,
};

static ACCOUNT_COLUMNS: [Column; 4] = [
    Column { header: "screen_name", numeric: false },
    Column { header: "name", numeric: false },
    Column { header: "id", numeric: true },
    Column { header: "followers", numeric: true },
];

/// One table row per post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub text: String,
    pub id: u64,
    /// Characters in `text`, not bytes.
    pub length: usize,
    pub date: DateTime<Utc>,
    pub platform: String,
    pub likes: u64,
    pub reposts: u64,
    pub sentiment: Option<SentimentLabel>,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            id: post.id,
            length: post.text.chars().count(),
            date: post.created_at,
            platform: post.source.clone(),
            likes: post.like_count,
            reposts: post.repost_count,
            sentiment: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<PostRecord>,
    has_sentiment: bool,
    text_width: usize,
}

/// Base columns only; sentiment is a second pass via [`Table::attach_sentiment`].
pub fn build_table(posts: &[Post]) -> Table {
    Table {
        rows: posts.iter().map(PostRecord::from).collect(),
        has_sentiment: false,
        text_width: 0,
    }
}

impl Table {
    /// Wrap the text column at `width` columns; 0 disables wrapping.
    pub fn with_text_width(mut self, width: usize) -> Self {
        self.text_width = width;
        self
    }

    pub fn rows(&self) -> &[PostRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.column_specs().iter().map(|c| c.header).collect()
    }

    pub fn attach_sentiment(&mut self, scorer: &SentimentScorer) {
        for row in &mut self.rows {
            row.sentiment = Some(scorer.score(&row.text));
        }
        self.has_sentiment = true;
    }

    /// Counts per label; `None` until sentiment has been attached.
    pub fn summary(&self) -> Option<SentimentSummary> {
        if !self.has_sentiment {
            return None;
        }
        let mut summary = SentimentSummary::default();
        for label in self.rows.iter().filter_map(|row| row.sentiment) {
            match label {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
                SentimentLabel::Negative => summary.negative += 1,
            }
        }
        Some(summary)
    }

    pub fn render(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    wrap_cell(&row.text, self.text_width),
                    row.id.to_string(),
                    row.length.to_string(),
                    row.date.format(DATE_FORMAT).to_string(),
                    row.platform.clone(),
                    row.likes.to_string(),
                    row.reposts.to_string(),
                ];
                if self.has_sentiment {
                    cells.push(
                        row.sentiment
                            .map(|label| label.to_string())
                            .unwrap_or_default(),
                    );
                }
                cells
            })
            .collect();

        render_grid(&self.column_specs(), rows)
    }

    fn column_specs(&self) -> Vec<&'static Column> {
        let mut columns: Vec<&'static Column> = POST_COLUMNS.iter().collect();
        if self.has_sentiment {
            columns.push(&SENTIMENT_COLUMN);
        }
        columns
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentSummary {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn percent(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 * 100.0 / total as f64,
        }
    }
}

impl fmt::Display for SentimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "positive: {} ({:.1}%) | neutral: {} ({:.1}%) | negative: {} ({:.1}%)",
            self.positive,
            self.percent(self.positive),
            self.neutral,
            self.percent(self.neutral),
            self.negative,
            self.percent(self.negative),
        )
    }
}

pub fn render_accounts(accounts: &[Account]) -> String {
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| {
            vec![
                format!("@{}", a.screen_name),
                a.name.clone(),
                a.id.to_string(),
                a.followers_count.to_string(),
            ]
        })
        .collect();
    let columns: Vec<&Column> = ACCOUNT_COLUMNS.iter().collect();
    render_grid(&columns, rows)
}

/// Line breaks become `\n` whatever the source used; tabs become spaces.
fn wrap_cell(text: &str, width: usize) -> String {
    let text = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', " ");
    if width == 0 {
        return text;
    }
    textwrap::fill(&text, width)
}

/// `+---+` bordered grid, one block per record. Multi-line cells make the
/// whole block taller.
fn render_grid(columns: &[&Column], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.header.to_string()));
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::ascii());
    for (index, column) in columns.iter().enumerate() {
        if column.numeric {
            table.modify(Columns::single(index), Alignment::right());
        }
    }

    let mut rendered = table.to_string();
    rendered.push('\n');
    rendered
}
