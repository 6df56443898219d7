//! `notesite` command-line entry point.
//!
//! # Responsibility
//! - Render local markdown files with the site renderer.
//! - Drive note/tag/post loaders and the tag reconciler against the
//!   configured data API.

use clap::{Parser, Subcommand};
use log::error;
use notesite_core::{
    escape_text, init_logging, parse_tag_ids, title_to_slug, ApiClient, ApiConfig, IndexPage,
    LogLevel, MarkdownRenderer, NewNote, NoteService, PostService, RendererConfig, TagService,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "notesite", version, about = "Render and manage notesite content")]
struct Cli {
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a local markdown file to HTML on stdout.
    Render {
        file: PathBuf,
        /// Rewrite \( \) and \[ \] math delimiters before rendering.
        #[arg(long)]
        legacy_math: bool,
    },
    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that talk to the data API.
#[derive(Debug, Subcommand)]
enum RemoteCommand {
    /// Fetch and render one note.
    Note { slug: String },
    /// Fetch and render the most recent note.
    Latest,
    /// List notes, optionally filtered by tag slug.
    Notes {
        #[arg(long)]
        tag: Option<String>,
    },
    /// List tags.
    Tags,
    /// Replace a note's tag set with the given tag ids.
    SetTags { slug: String, tag_ids: Vec<String> },
    /// Fetch and render one post.
    Post { slug: String },
    /// Create a note from a local markdown file.
    NewNote {
        file: PathBuf,
        #[arg(long)]
        title: String,
        /// Defaults to a slug derived from the title.
        #[arg(long)]
        slug: Option<String>,
        /// Tag ids to link to the new note.
        #[arg(long = "tag")]
        tag_ids: Vec<String>,
    },
}

type CliResult = Result<(), Box<dyn Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // A missing .env file is not an error; settings may come from the
    // process environment.
    let _ = dotenvy::dotenv();

    if let Err(err) = setup_logging(&cli) {
        eprintln!("notesite: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("notesite: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> CliResult {
    let level = match cli.log_level.as_deref() {
        Some(value) => value.parse::<LogLevel>()?,
        None => LogLevel::build_default(),
    };
    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("notesite-logs"));
    let log_dir = log_dir.to_str().ok_or("log directory must be valid UTF-8")?;
    init_logging(level, log_dir)?;
    Ok(())
}

async fn run(command: Command) -> CliResult {
    let renderer = Arc::new(MarkdownRenderer::new(RendererConfig::default()));
    match command {
        Command::Render { file, legacy_math } => render_file(&renderer, &file, legacy_math),
        Command::Remote(remote) => run_remote(remote, renderer).await,
    }
}

fn render_file(renderer: &MarkdownRenderer, file: &Path, legacy_math: bool) -> CliResult {
    let markdown = std::fs::read_to_string(file)?;
    let html = if legacy_math {
        renderer.render_legacy(&markdown)
    } else {
        renderer.render(&markdown)
    };
    println!("{html}");
    Ok(())
}

async fn run_remote(command: RemoteCommand, renderer: Arc<MarkdownRenderer>) -> CliResult {
    let client = ApiClient::new(&ApiConfig::from_env()?)?;
    match command {
        RemoteCommand::Note { slug } => {
            let page = NoteService::new(client, renderer).note_page(&slug).await?;
            println!("{}", page_html(&page.title, &page.html));
            Ok(())
        }
        RemoteCommand::Latest => {
            let page = NoteService::new(client, renderer)
                .latest_note_page()
                .await?;
            println!("{}", page_html(&page.title, &page.html));
            Ok(())
        }
        RemoteCommand::Notes { tag } => {
            let notes = NoteService::new(client, renderer);
            match notes.notes_index(tag.as_deref()).await? {
                IndexPage::Listing(index) => {
                    for note in index.notes {
                        println!("{}\t{}", note.slug, note.title);
                    }
                }
                IndexPage::UnknownTag(slug) => {
                    eprintln!("unknown tag `{slug}`");
                    for note in notes.list_notes().await? {
                        println!("{}\t{}", note.slug, note.title);
                    }
                }
            }
            Ok(())
        }
        RemoteCommand::Tags => {
            for tag in TagService::new(client).list_tags().await? {
                println!("{}\t{}\t{}", tag.id, tag.slug, tag.title);
            }
            Ok(())
        }
        RemoteCommand::SetTags { slug, tag_ids } => {
            let desired = parse_tag_ids(&tag_ids)?;
            let diff = NoteService::new(client, renderer)
                .set_note_tags(&slug, &desired)
                .await?;
            println!(
                "added={:?} removed={:?}",
                diff.to_add.iter().collect::<Vec<_>>(),
                diff.to_remove.iter().collect::<Vec<_>>()
            );
            Ok(())
        }
        RemoteCommand::Post { slug } => {
            let page = PostService::new(client, renderer).post_page(&slug).await?;
            println!("{}", page_html(&page.post.title, &page.html));
            Ok(())
        }
        RemoteCommand::NewNote {
            file,
            title,
            slug,
            tag_ids,
        } => {
            let markdown = std::fs::read_to_string(file)?;
            let slug = slug.unwrap_or_else(|| title_to_slug(&title));
            let tags = parse_tag_ids(&tag_ids)?;
            let id = NoteService::new(client, renderer)
                .create_note(&NewNote::new(title, slug.as_str(), markdown), &tags)
                .await?;
            println!("{id}\t{slug}");
            Ok(())
        }
    }
}

fn page_html(title: &str, html: &str) -> String {
    format!("<h1>{}</h1>\n{html}", escape_text(title))
}

#[cfg(test)]
mod tests {
    use super::{page_html, Cli, Command, RemoteCommand};
    use clap::Parser;

    #[test]
    fn page_title_is_escaped() {
        let page = page_html("Tom & <Jerry>", "<p>body</p>");
        assert_eq!(page, "<h1>Tom &amp; &lt;Jerry&gt;</h1>\n<p>body</p>");
    }

    #[test]
    fn render_is_a_local_command() {
        let cli = Cli::try_parse_from(["notesite", "render", "doc.md", "--legacy-math"])
            .expect("render should parse");
        assert!(matches!(
            cli.command,
            Command::Render {
                legacy_math: true,
                ..
            }
        ));
    }

    #[test]
    fn remote_commands_parse_under_their_own_enum() {
        let cli = Cli::try_parse_from(["notesite", "set-tags", "hello", "1", "2"])
            .expect("set-tags should parse");
        match cli.command {
            Command::Remote(RemoteCommand::SetTags { slug, tag_ids }) => {
                assert_eq!(slug, "hello");
                assert_eq!(tag_ids, vec!["1".to_string(), "2".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn new_note_slug_is_optional() {
        let cli = Cli::try_parse_from([
            "notesite", "new-note", "doc.md", "--title", "Hello World", "--tag", "3",
        ])
        .expect("new-note should parse");
        match cli.command {
            Command::Remote(RemoteCommand::NewNote { slug, tag_ids, .. }) => {
                assert!(slug.is_none());
                assert_eq!(tag_ids, vec!["3".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
