use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tweetlens::app::{self, ReportOptions};
use tweetlens::config::Config;
use tweetlens::fetcher::TwitterFetch;
use tweetlens::logging;

#[derive(Parser)]
#[command(name = "tweetlens")]
#[command(about = "Fetch tweets, score their sentiment and print them as a table", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a user's timeline with a sentiment column (default)
    Report {
        /// Screen name to analyze
        #[arg(short, long)]
        user: Option<String>,

        /// Number of tweets to fetch
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Use the home timeline instead of the user's own tweets
        #[arg(long)]
        home: bool,

        /// Skip the sentiment summary line
        #[arg(long)]
        no_summary: bool,
    },

    /// List accounts the user follows
    Friends {
        #[arg(short, long)]
        user: Option<String>,

        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Append live tweets matching keywords to a file
    Stream {
        /// File to append raw tweets to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keywords or hashtags to track
        track: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;
    let config = Config::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Command::Report {
        user: None,
        count: None,
        home: false,
        no_summary: false,
    });

    match command {
        Command::Report {
            user,
            count,
            home,
            no_summary,
        } => {
            let api = app::connect(&config)?;
            let user = user.unwrap_or_else(|| config.report.user.clone());
            let fetch = TwitterFetch::new(api, app::target_user(&user));
            let options = ReportOptions {
                count: count.unwrap_or(config.report.count),
                home,
                text_width: config.report.text_width,
            };

            let scorer = app::scorer(&config.sentiment);
            let table = app::build_report(&fetch, &scorer, &options).await?;
            app::write_report(&mut std::io::stdout().lock(), &table, !no_summary)?;
        }
        Command::Friends { user, count } => {
            let api = app::connect(&config)?;
            let user = user.unwrap_or_else(|| config.report.user.clone());
            let fetch = TwitterFetch::new(api, app::target_user(&user));
            let rendered =
                app::friends_report(&fetch, count.unwrap_or(config.report.count)).await?;
            let mut out = std::io::stdout().lock();
            out.write_all(rendered.as_bytes())?;
            out.flush()?;
        }
        Command::Stream { output, track } => {
            let api = app::connect(&config)?;
            let output = output.unwrap_or_else(|| config.stream.output.clone());
            let track = if track.is_empty() {
                config.stream.track.clone()
            } else {
                track
            };
            app::run_stream(api, &output, &track, config.stream.echo).await?;
        }
    }

    Ok(())
}
