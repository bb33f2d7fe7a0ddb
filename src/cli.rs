// Command-line surface: four subcommands, each a thin wrapper around one post
// operation. A spinner runs on stderr while the request is in flight.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::client::LinkedInClient;
use crate::config::Config;
use crate::error::Error;
use crate::posts::{self, ListOptions, Post, Visibility};

const PREVIEW_CHARS: usize = 120;

#[derive(Parser, Debug)]
#[command(name = "linkedin-posts")]
#[command(about = "Manage LinkedIn posts with exported browser cookies")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Cookie file exported from a logged-in browser
    #[arg(long, global = true, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Profile URN cache file
    #[arg(long, global = true, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a LinkedIn post
    Create {
        /// Post content text
        #[arg(long)]
        text: String,

        /// Post visibility
        #[arg(long, value_enum, default_value = "PUBLIC")]
        visibility: Visibility,
    },

    /// Delete LinkedIn post(s)
    Delete {
        /// Share URN(s) of the post(s) to delete
        #[arg(required = true, value_name = "URN")]
        urns: Vec<String>,
    },

    /// List LinkedIn posts for the current user or a specific author
    List {
        /// Author profile URN or id (defaults to current user)
        #[arg(long)]
        author: Option<String>,

        /// Number of posts to fetch
        #[arg(long, default_value_t = 10)]
        count: u32,

        /// Output as JSON
        #[arg(long = "json")]
        as_json: bool,
    },

    /// Update an existing LinkedIn post's text
    Update {
        /// Share URN of the post to update
        #[arg(long)]
        urn: String,

        /// New post content text
        #[arg(long)]
        text: String,
    },
}

impl Cli {
    /// Environment configuration with the command-line overrides applied.
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(path) = &self.cookies {
            config = config.with_cookies_path(path.clone());
        }
        if let Some(path) = &self.cache {
            config = config.with_cache_path(path.clone());
        }
        config
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    LinkedInClient::scoped(&config, |client| match cli.command {
        Commands::Create { text, visibility } => create(client, &text, visibility),
        Commands::Delete { urns } => delete(client, &urns, &mut io::stdout().lock()),
        Commands::List {
            author,
            count,
            as_json,
        } => list(client, author, count, as_json),
        Commands::Update { urn, text } => update(client, &urn, &text),
    })
}

fn create(client: &mut LinkedInClient, text: &str, visibility: Visibility) -> Result<()> {
    let result = with_spinner("Publishing...", || {
        posts::create_post(client, text, visibility)
    })?;
    println!("Post published successfully!");
    print_response(result.as_ref());
    Ok(())
}

/// The report covers only the posts deleted before a failure, which is then
/// returned.
fn delete(client: &mut LinkedInClient, urns: &[String], out: &mut impl Write) -> Result<()> {
    let outcome = with_spinner("Deleting...", || posts::delete_posts(client, urns));
    let deleted = match &outcome {
        Ok(n) => *n,
        Err(Error::PartialDelete { deleted, .. }) => *deleted,
        Err(_) => 0,
    };
    for urn in &urns[..deleted] {
        writeln!(out, "Deleted: {urn}")?;
    }
    writeln!(out, "\n{deleted} post(s) deleted.")?;
    out.flush()?;
    outcome?;
    Ok(())
}

fn list(client: &mut LinkedInClient, author: Option<String>, count: u32, as_json: bool) -> Result<()> {
    let options = ListOptions {
        count,
        profile_urn: author,
        ..ListOptions::default()
    };
    let posts = with_spinner("Fetching posts...", || posts::list_posts(client, &options))?;

    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }

    if as_json {
        let out = serde_json::to_string_pretty(&posts).context("Serializing posts")?;
        println!("{out}");
        return Ok(());
    }

    for (i, post) in posts.iter().enumerate() {
        print_post(i + 1, post);
    }
    Ok(())
}

fn update(client: &mut LinkedInClient, urn: &str, text: &str) -> Result<()> {
    let result = with_spinner("Updating...", || posts::update_post(client, urn, text))?;
    println!("Post updated successfully!");
    print_response(result.as_ref());
    Ok(())
}

fn print_post(index: usize, post: &Post) {
    println!("[{index}] {}", preview(&post.text));
    println!(
        "    Date: {}  Likes: {}  Comments: {}",
        format_timestamp(post.created_at),
        post.num_likes,
        post.num_comments
    );
    println!("    URN: {}", post.urn);
    println!();
}

fn print_response(result: Option<&Value>) {
    if let Some(value) = result {
        println!("Response: {value}");
    }
}

/// First `PREVIEW_CHARS` characters, with an ellipsis when cut.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

/// Milliseconds since the epoch as `YYYY-MM-DD HH:MM` in UTC.
fn format_timestamp(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = f();
    spinner.finish_and_clear();
    out
}
