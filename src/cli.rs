//! Command-line front-end: argument parsing and command dispatch.

use crate::api::{Client, PaperApi};
use crate::browse::BrowseView;
use crate::config::Config;
use crate::detail::{describe_fetch_error, load_paper_context};
use crate::models::{tag_color, PaperUpdate, SignupRequest};
use crate::session::SessionStore;
use crate::submit::{self, PaperDraft};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "paperdeck", about = "Client for the paper-sharing platform", version)]
pub struct Args {
    /// Backend API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory for the persisted session
    #[arg(long, global = true)]
    pub state_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Register a new account and sign in
    Signup {
        #[arg(long)]
        institution: String,
        #[arg(long)]
        fname: String,
        #[arg(long)]
        lname: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// End the session and clear stored credentials
    Logout,
    /// Show the currently signed-in user
    Whoami,
    /// Browse the paper catalog with optional filters
    Browse {
        /// Category id or name ("All" for no filter)
        #[arg(long, default_value = "All")]
        category: String,
        /// Case-insensitive title/description search
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Show one paper in full
    Show { id: String },
    /// Submit a new paper
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Category id
        #[arg(long)]
        category: String,
        /// Path to the PDF/DOC/DOCX attachment
        #[arg(long)]
        file: PathBuf,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Co-author user id (repeatable)
        #[arg(long = "coauthor")]
        coauthors: Vec<String>,
        /// Free-form metadata
        #[arg(long, default_value = "")]
        meta: String,
        /// Enter tags interactively (commit with Enter or comma)
        #[arg(long)]
        interactive_tags: bool,
    },
    /// List candidate co-authors for submissions
    Authors,
    /// List your own submissions
    Mine,
    /// Update one of your papers
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Replacement tag list (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete one of your papers
    Delete { id: String },
    /// List categories
    Categories,
    /// List known tags
    Tags,
}

struct Context {
    config: Config,
    api: Client,
    session: SessionStore,
}

impl Context {
    fn token_required(&self) -> Result<&str> {
        self.session
            .token()
            .ok_or_else(|| anyhow!("not signed in — run `paperdeck login` first"))
    }
}

pub async fn run(args: Args) -> Result<()> {
    let config = Config::resolve(args.base_url.as_deref(), args.state_dir.as_deref());
    let api = Client::new(&config.base_url);
    let mut session = SessionStore::new(&config.state_dir);
    session.initialize();

    let mut ctx = Context {
        config,
        api,
        session,
    };

    match args.command {
        Command::Login { email, password } => cmd_login(&mut ctx, &email, password).await,
        Command::Signup {
            institution,
            fname,
            lname,
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let req = SignupRequest {
                institution,
                fname,
                lname,
                username,
                email,
                password,
            };
            cmd_signup(&mut ctx, &req).await
        }
        Command::Logout => {
            ctx.session.logout(&ctx.api).await;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => cmd_whoami(&ctx),
        Command::Browse { category, query } => cmd_browse(&ctx, &category, &query).await,
        Command::Show { id } => cmd_show(&ctx, &id).await,
        Command::Submit {
            title,
            description,
            category,
            file,
            tags,
            coauthors,
            meta,
            interactive_tags,
        } => {
            let mut draft = PaperDraft::new();
            draft.title = title;
            draft.description = description;
            draft.category_id = category;
            draft.file = Some(file);
            draft.coauthors = coauthors;
            draft.meta = meta;
            for tag in &tags {
                if !draft.add_tag(tag) {
                    eprintln!("[submit] skipping duplicate or empty tag: {:?}", tag);
                }
            }
            if interactive_tags {
                collect_tags(&mut draft)?;
            }
            cmd_submit(&ctx, &mut draft).await
        }
        Command::Authors => cmd_authors(&ctx).await,
        Command::Mine => cmd_mine(&ctx).await,
        Command::Update {
            id,
            title,
            description,
            category,
            tags,
        } => {
            let update = PaperUpdate {
                id,
                paper_name: title,
                description,
                category_id: category,
                tags: if tags.is_empty() { None } else { Some(tags) },
            };
            cmd_update(&ctx, &update).await
        }
        Command::Delete { id } => cmd_delete(&ctx, &id).await,
        Command::Categories => cmd_categories(&ctx).await,
        Command::Tags => cmd_tags(&ctx).await,
    }
}

async fn cmd_login(ctx: &mut Context, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    let resp = ctx.session.login(&ctx.api, email, &password).await?;
    // A previously persisted session may still be present after a failed
    // attempt; only report the user when this response committed one.
    match ctx.session.user() {
        Some(user) if resp.is_success() => {
            println!("Signed in as {} <{}>", user.display_name(), user.email);
            Ok(())
        }
        _ => Err(anyhow!(
            "login failed: {}",
            resp.error_message().unwrap_or("unknown error")
        )),
    }
}

async fn cmd_signup(ctx: &mut Context, req: &SignupRequest) -> Result<()> {
    let resp = ctx.session.signup(&ctx.api, req).await?;
    match ctx.session.user() {
        Some(user) if resp.is_success() => {
            println!("Account created. Signed in as {}", user.display_name());
            Ok(())
        }
        _ => Err(anyhow!(
            "signup failed: {}",
            resp.error_message().unwrap_or("unknown error")
        )),
    }
}

fn cmd_whoami(ctx: &Context) -> Result<()> {
    match ctx.session.user() {
        Some(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            if let Some(institution) = &user.institution {
                println!("  {}", institution);
            }
            Ok(())
        }
        None => {
            println!("Not signed in.");
            Ok(())
        }
    }
}

async fn cmd_browse(ctx: &Context, category: &str, query: &str) -> Result<()> {
    let mut view = BrowseView::new();
    view.load(&ctx.api).await.map_err(|e| anyhow!("failed to load papers: {}", e))?;

    if !view.select_category(category) {
        let names: Vec<&str> = view.categories().iter().map(|c| c.name.as_str()).collect();
        return Err(anyhow!(
            "unknown category {:?} (available: {})",
            category,
            names.join(", ")
        ));
    }
    view.query = query.to_string();

    let filtered = view.filtered();
    if filtered.is_empty() {
        println!("No papers found.");
        return Ok(());
    }

    for paper in filtered {
        let category_name = paper
            .category_id
            .as_deref()
            .and_then(|id| view.categories().iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");
        let date = paper
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  [{}]  {}  ({})", paper.id, category_name, paper.name, date);
        if !paper.description.is_empty() {
            println!("    {}", truncate(&paper.description, 100));
        }
    }
    Ok(())
}

async fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let result = load_paper_context(&ctx.api, ctx.session.token(), id).await;
    let context = match result {
        Ok(c) => c,
        Err(e) => {
            let mut message = describe_fetch_error(&e);
            if e.is_transient() {
                message.push_str(" Check your connection and run the command again to retry.");
            }
            return Err(anyhow!(message));
        }
    };

    let paper = &context.paper;
    println!("{}", paper.name);
    println!("  Category: {}", context.category_name());
    if let Some(date) = paper.created_at {
        println!("  Published: {}", date.format("%Y-%m-%d"));
    }
    if !paper.description.is_empty() {
        println!("\n{}\n", paper.description);
    }
    if !paper.tags.is_empty() {
        let tags: Vec<String> = paper
            .tags
            .iter()
            .map(|t| format!("{} ({})", t, tag_color(t)))
            .collect();
        println!("  Tags: {}", tags.join(", "));
    }
    let coauthors = context.coauthor_names();
    if !coauthors.is_empty() {
        println!("  Co-authors: {}", coauthors.join(", "));
    }
    if let Some(url) = paper.resolved_file_url(ctx.config.base_url.as_str()) {
        println!("  File: {}", url);
    }
    Ok(())
}

async fn cmd_submit(ctx: &Context, draft: &mut PaperDraft) -> Result<()> {
    let token = ctx.token_required()?;
    match submit::submit(&ctx.api, token, draft).await {
        Ok(_) => {
            draft.reset();
            println!("Paper submitted successfully.");
            Ok(())
        }
        Err(e) => Err(anyhow!("{}", e)),
    }
}

async fn cmd_authors(ctx: &Context) -> Result<()> {
    let token = ctx.token_required()?;
    let authors = submit::coauthor_candidates(&ctx.api, token).await;
    if authors.is_empty() {
        println!("No authors available.");
        return Ok(());
    }
    for author in authors {
        println!("{}  {}", author.id, author.display_name());
    }
    Ok(())
}

async fn cmd_mine(ctx: &Context) -> Result<()> {
    let user = ctx
        .session
        .user()
        .ok_or_else(|| anyhow!("not signed in — run `paperdeck login` first"))?;
    let papers = ctx
        .api
        .papers_by_publisher(&user.id)
        .await
        .map_err(|e| anyhow!("failed to load your papers: {}", e))?;

    if papers.is_empty() {
        println!("No papers found.");
        return Ok(());
    }
    for paper in papers {
        println!("{}  {}", paper.id, paper.name);
    }
    Ok(())
}

async fn cmd_update(ctx: &Context, update: &PaperUpdate) -> Result<()> {
    let token = ctx.token_required()?;
    ctx.api
        .update_paper(token, update)
        .await
        .map_err(|e| anyhow!("update failed: {}", e))?;
    println!("Paper {} updated.", update.id);
    Ok(())
}

async fn cmd_delete(ctx: &Context, id: &str) -> Result<()> {
    let token = ctx.token_required()?;
    ctx.api
        .delete_paper(token, id)
        .await
        .map_err(|e| anyhow!("delete failed: {}", e))?;
    println!("Paper {} deleted.", id);
    Ok(())
}

async fn cmd_categories(ctx: &Context) -> Result<()> {
    let categories = ctx
        .api
        .list_categories()
        .await
        .map_err(|e| anyhow!("failed to load categories: {}", e))?;
    for cat in categories {
        println!("{}  {}", cat.id, cat.name);
    }
    Ok(())
}

async fn cmd_tags(ctx: &Context) -> Result<()> {
    let tags = ctx
        .api
        .list_tags()
        .await
        .map_err(|e| anyhow!("failed to load tags: {}", e))?;
    for tag in tags {
        println!("{}", tag.name);
    }
    Ok(())
}

/// Interactive tag entry. Each line is committed on Enter; commas inside a
/// line commit multiple tags at once. A blank line finishes.
fn collect_tags(draft: &mut PaperDraft) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Enter tags (Enter or comma commits, blank line to finish):");
    loop {
        let line = match editor.readline("tag> ") {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            break;
        }
        for piece in line.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            if draft.add_tag(piece) {
                println!("  + {}", piece);
            } else {
                println!("  duplicate: {}", piece);
            }
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    let mut editor = DefaultEditor::new()?;
    Ok(editor.readline(label)?.trim().to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcde...");
    }

    #[test]
    fn test_args_parse_browse() {
        let args = Args::parse_from(["paperdeck", "browse", "--query", "quantum"]);
        match args.command {
            Command::Browse { category, query } => {
                assert_eq!(category, "All");
                assert_eq!(query, "quantum");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_parse_submit_repeatable_tags() {
        let args = Args::parse_from([
            "paperdeck",
            "submit",
            "--title",
            "T",
            "--description",
            "D",
            "--category",
            "c1",
            "--file",
            "paper.pdf",
            "--tag",
            "a",
            "--tag",
            "b",
        ]);
        match args.command {
            Command::Submit { tags, .. } => assert_eq!(tags, vec!["a", "b"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
