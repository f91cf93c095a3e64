use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use genius_api::types::{
    AnnotationPayload, ArtistSongsQuery, ReferentsQuery, SongSort, TextFormat, Vote, WebPageQuery,
};
use genius_api::{ClientConfig, DeepFind, DiagnosticSink, GeniusClient, RetryPolicy, TracingSink};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "genius", version, about = "Genius API & lyrics CLI")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Access token (64 characters)
    #[arg(long, env = "GENIUS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, env = "GENIUS_TIMEOUT", default_value = "30", global = true)]
    timeout: u64,
    /// Maximum attempts when scraping lyrics
    #[arg(long, env = "GENIUS_MAX_ATTEMPTS", default_value = "3", global = true)]
    max_attempts: u32,
    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Api(ApiCommand),
    /// Find every value stored under a key in a local JSON document
    Find {
        /// JSON file (`-` for stdin)
        file: PathBuf,
        /// Key to look for
        key: String,
        /// Keep duplicate values
        #[arg(long)]
        all: bool,
    },
}

/// Commands that talk to Genius.
#[derive(Subcommand)]
enum ApiCommand {
    /// Validate the token and report whether the session is authorized
    Login,
    /// Show the token owner's account
    Me {
        /// Only print values of this field
        #[arg(long, value_name = "KEY")]
        field: Option<String>,
    },
    /// Search songs and artists
    Search {
        /// Search query
        query: String,
        /// Only print values found under this key
        #[arg(long = "by", value_name = "KEY")]
        by: Option<String>,
    },
    /// Show song metadata
    Song {
        /// Song ID
        id: u64,
        /// Attach the song page's lyrics document
        #[arg(long)]
        with_lyrics: bool,
    },
    /// Print plain-text lyrics
    Lyrics {
        /// Song ID
        id: u64,
    },
    /// Show an annotation
    Annotation {
        /// Annotation ID
        id: u64,
    },
    /// Create an annotation from a JSON payload file
    Annotate {
        /// Payload file (`-` for stdin)
        payload: PathBuf,
    },
    /// Vote on an annotation
    Vote {
        /// Annotation ID
        id: u64,
        /// Vote direction
        vote: VoteArg,
    },
    /// List referents of a song, web page or user
    Referents {
        #[arg(long, conflicts_with = "web_page_id")]
        song_id: Option<u64>,
        #[arg(long)]
        web_page_id: Option<u64>,
        #[arg(long)]
        created_by_id: Option<u64>,
        /// Text formats (repeatable)
        #[arg(long = "format", value_name = "FORMAT")]
        formats: Vec<FormatArg>,
        #[arg(long)]
        per_page: Option<u32>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show an artist, or list their songs
    Artist {
        /// Artist ID
        id: u64,
        /// List songs instead of the artist
        #[arg(long)]
        songs: bool,
        #[arg(long, requires = "songs")]
        sort: Option<SortArg>,
        #[arg(long, requires = "songs")]
        per_page: Option<u32>,
        #[arg(long, requires = "songs")]
        page: Option<u32>,
    },
    /// Look up a web page by URL
    WebPage {
        #[arg(long)]
        raw_url: Option<String>,
        #[arg(long)]
        canonical_url: Option<String>,
        #[arg(long)]
        og_url: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum VoteArg {
    Up,
    Down,
    Un,
}

#[derive(Clone, ValueEnum)]
enum FormatArg {
    Dom,
    Plain,
    Html,
}

#[derive(Clone, ValueEnum)]
enum SortArg {
    Title,
    Popularity,
}

impl From<VoteArg> for Vote {
    fn from(v: VoteArg) -> Self {
        match v {
            VoteArg::Up => Self::Up,
            VoteArg::Down => Self::Down,
            VoteArg::Un => Self::Clear,
        }
    }
}

impl From<FormatArg> for TextFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Dom => Self::Dom,
            FormatArg::Plain => Self::Plain,
            FormatArg::Html => Self::Html,
        }
    }
}

impl From<SortArg> for SongSort {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Title => Self::Title,
            SortArg::Popularity => Self::Popularity,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.global.verbose, cli.global.quiet);

    let found = run(&cli.global, cli.command)?;
    if !found {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Returns `false` when the operation produced nothing to print.
fn run(global: &GlobalArgs, command: Command) -> Result<bool> {
    match command {
        Command::Find { file, key, all } => cmd_find(&file, &key, all),
        Command::Api(command) => run_api(global, command),
    }
}

fn run_api(global: &GlobalArgs, command: ApiCommand) -> Result<bool> {
    let client = build_client(global)?;
    if let Some(token) = &global.token {
        // A rejected token is reported but not fatal: public endpoints still
        // work, and the session stays empty.
        login(&client, token, &TracingSink);
    }

    match command {
        ApiCommand::Login => Ok(cmd_login(&client)),
        ApiCommand::Me { field } => match field {
            Some(field) => print_found(
                client
                    .account_field(None, &field)?
                    .map(genius_api::Found::into_value),
            ),
            None => print_json(client.me(None)?),
        },
        ApiCommand::Search { query, by } => {
            let result = client.search(None, &query, by.as_deref())?;
            if by.is_some() {
                print_found(result)
            } else {
                print_json(result)
            }
        }
        ApiCommand::Song { id, with_lyrics } => {
            let song = if with_lyrics {
                client.song_with_lyrics(None, id)?
            } else {
                client.song(None, id)?
            };
            print_json(song)
        }
        ApiCommand::Lyrics { id } => {
            let lyrics = client.lyrics(None, id)?;
            if let Some(text) = &lyrics {
                println!("{text}");
            }
            Ok(lyrics.is_some())
        }
        ApiCommand::Annotation { id } => print_json(client.annotation(None, id)?),
        ApiCommand::Annotate { payload } => {
            let payload: AnnotationPayload =
                serde_json::from_str(&read_input(&payload)?).context("invalid annotation payload")?;
            print_json(client.create_annotation(None, &payload)?)
        }
        ApiCommand::Vote { id, vote } => print_json(client.vote_annotation(None, id, vote.into())?),
        ApiCommand::Referents {
            song_id,
            web_page_id,
            created_by_id,
            formats,
            per_page,
            page,
        } => {
            let query = ReferentsQuery {
                created_by_id,
                song_id,
                web_page_id,
                text_format: formats.into_iter().map(Into::into).collect(),
                per_page,
                page,
            };
            print_json(client.referents(None, &query)?)
        }
        ApiCommand::Artist {
            id,
            songs,
            sort,
            per_page,
            page,
        } => {
            if songs {
                let query = ArtistSongsQuery {
                    sort: sort.map(Into::into),
                    per_page,
                    page,
                };
                print_json(client.artist_songs(None, id, &query)?)
            } else {
                print_json(client.artist(None, id)?)
            }
        }
        ApiCommand::WebPage {
            raw_url,
            canonical_url,
            og_url,
        } => {
            let query = WebPageQuery {
                raw_annotatable_url: raw_url,
                canonical_url,
                og_url,
            };
            print_json(client.web_page_lookup(None, &query)?)
        }
    }
}

fn build_client(global: &GlobalArgs) -> Result<GeniusClient> {
    let config = ClientConfig::default()
        .timeout(Duration::from_secs(global.timeout))
        .retry(RetryPolicy::new(global.max_attempts));
    GeniusClient::with_config(config).context("failed to build HTTP client")
}

// ── login ──

/// Store `token` in the client's session, reporting a rejection to `sink`.
fn login(client: &GeniusClient, token: &str, sink: &dyn DiagnosticSink) -> bool {
    match client.login(token) {
        Ok(()) => true,
        Err(e) => {
            sink.report("Auth.login", &e);
            false
        }
    }
}

fn cmd_login(client: &GeniusClient) -> bool {
    if client.authorized() {
        println!("Authorized.");
        true
    } else {
        println!("Not authorized. Pass a valid token with --token or GENIUS_TOKEN.");
        false
    }
}

// ── find ──

fn cmd_find(file: &Path, key: &str, all: bool) -> Result<bool> {
    let doc: Value = serde_json::from_str(&read_input(file)?).context("invalid JSON document")?;
    let found = if all {
        doc.deep_find_all(key)
    } else {
        doc.deep_find(key)
    };
    print_found(Some(found.into_value()))
}

// ── output ──

fn print_json(value: Option<Value>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(true)
}

/// Like [`print_json`], but an empty deep-find result counts as nothing found.
fn print_found(value: Option<Value>) -> Result<bool> {
    let empty = value.as_ref().is_some_and(is_empty_find);
    Ok(print_json(value)? && !empty)
}

/// Deep find never reports `[]` as a match, so `[]` means no match.
fn is_empty_find(value: &Value) -> bool {
    value.as_array().is_some_and(Vec::is_empty)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
