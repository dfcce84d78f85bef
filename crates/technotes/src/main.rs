//! `technotes` - CLI and web server for the tech notes blog
//!
//! This binary serves the blog and provides terminal access to the posts,
//! the activity heatmap, the icon catalog and the configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;

use technotes::cli::{output, Cli, Command, ConfigCommand, ListCommand, PostCommand, ServeCommand};
use technotes::store::{MutableStore, PostReader, StoreHandle};
use technotes::{icons, init_logging, ActivityCalendar, Config, Error, PostDraft};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, &serve_cmd),
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Show(show_cmd) => {
            let store = StoreHandle::open(&config)?;
            let post = store
                .get(&show_cmd.id)
                .ok_or_else(|| Error::post_not_found(&show_cmd.id))?;
            output::write_post(&mut io::stdout().lock(), &post, show_cmd.format)?;
            Ok(())
        }
        Command::Activity => {
            let store = StoreHandle::open(&config)?;
            let calendar = ActivityCalendar::from_timestamps(&Local::now(), &store.all_timestamps());
            output::write_activity(&mut io::stdout().lock(), &calendar)?;
            Ok(())
        }
        Command::Icons(icons_cmd) => {
            let groups = icons::search(icons_cmd.query.as_deref().unwrap_or_default());
            output::write_icons(&mut io::stdout().lock(), &groups)?;
            Ok(())
        }
        Command::Post(post_cmd) => handle_post(&config, post_cmd),
        Command::Config(config_cmd) => handle_config(&config, cli.config, config_cmd),
    }
}

fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(bind) = &cmd.bind {
        config.server.bind_addr.clone_from(bind);
    }
    if let Some(mode) = cmd.mode {
        config.mode = mode.into();
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(technotes::server::serve(&config))?;
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = StoreHandle::open(config)?;
    let page_size = config.server.page_size;
    let offset = cmd.page.max(1).saturating_sub(1).saturating_mul(page_size);
    let page = store.list(page_size, offset);
    output::write_posts(&mut io::stdout().lock(), &page, cmd.format)?;
    Ok(())
}

fn handle_post(config: &Config, cmd: PostCommand) -> anyhow::Result<()> {
    let handle = StoreHandle::open(config)?;
    let store: &MutableStore = handle
        .writable()
        .ok_or_else(|| Error::read_only(config.mode))?;
    let mut stdout = io::stdout().lock();

    match cmd {
        PostCommand::New { content, icon } => {
            let draft = PostDraft::new(&content, &icon)?;
            let id = store.create(draft)?;
            writeln!(stdout, "Created {id}")?;
        }
        PostCommand::Edit { id, content, icon } => {
            let post = store.get(&id).ok_or_else(|| Error::post_not_found(&id))?;
            let content = content.unwrap_or(post.content);
            let icon = icon.unwrap_or(post.tech_icon);
            let draft = PostDraft::new(&content, &icon)?;
            if !store.update(&id, draft)? {
                return Err(Error::post_not_found(&id).into());
            }
            writeln!(stdout, "Updated {id}")?;
        }
        PostCommand::Delete { id } => {
            if !store.delete(&id)? {
                return Err(Error::post_not_found(&id).into());
            }
            writeln!(stdout, "Deleted {id}")?;
        }
    }
    Ok(())
}

fn handle_config(
    config: &Config,
    config_path: Option<std::path::PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("Mode:           {}", config.mode);
                println!();
                println!("[Server]");
                println!("  Bind address: {}", config.server.bind_addr);
                println!("  Page size:    {}", config.server.page_size);
                println!();
                println!("[Storage]");
                println!("  Posts path:   {}", config.posts_path().display());
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.or(config_path).unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
