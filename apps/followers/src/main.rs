use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{FollowerListController, GithubClient};
use storage::Storage;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod presenter;

use config::{load_settings, normalize_database_url};
use presenter::{describe, Action, GridLayout, Presenter};

#[derive(Parser, Debug)]
#[command(name = "followers", about = "Browse, search and favorite a GitHub user's followers")]
struct Args {
    /// GitHub login whose followers are listed.
    #[arg(value_parser = parse_username)]
    username: String,
    /// Number of pages to scroll through.
    #[arg(long, default_value_t = 1)]
    pages: u32,
    /// Filter the loaded followers by login.
    #[arg(long)]
    search: Option<String>,
    /// Select the follower at this position of the displayed list.
    #[arg(long)]
    select: Option<usize>,
    /// After selecting, list the selected follower's own followers.
    #[arg(long, requires = "select")]
    browse_selected: bool,
    /// Add the displayed user to favorites.
    #[arg(long)]
    favorite: bool,
    /// Print stored favorites.
    #[arg(long)]
    favorites: bool,
    /// Remove a favorite by login.
    #[arg(long)]
    unfavorite: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_username(raw: &str) -> Result<String, String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err("username must not be blank".into());
    }
    Ok(username.to_string())
}

impl Args {
    fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(term) = &self.search {
            actions.push(Action::Search(term.clone()));
        }
        if let Some(index) = self.select {
            actions.push(Action::Select(index));
            if self.browse_selected {
                actions.push(Action::BrowseSelected);
            }
        }
        if self.favorite {
            actions.push(Action::Favorite);
        }
        if self.favorites || self.unfavorite.is_some() {
            actions.push(Action::ListFavorites);
        }
        if let Some(login) = &self.unfavorite {
            actions.push(Action::Unfavorite(login.clone()));
        }
        actions
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await?;
    let github = GithubClient::new(settings.github_options())?;
    info!(api = %github.base_url(), %database_url, "follower browser ready");

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (commands_tx, commands_rx) = mpsc::channel(32);
    let controller = FollowerListController::new(
        args.username.clone(),
        Arc::new(github),
        Arc::new(storage),
        events_tx,
    );
    let controller_task = tokio::spawn(controller.run(commands_rx));

    let layout = GridLayout::default();
    let mut presenter = Presenter::new(args.username.clone(), layout, args.pages, args.actions());
    while let Some(event) = events_rx.recv().await {
        if let Some(text) = describe(&event, &layout) {
            println!("{text}");
        }
        if let Some(command) = presenter.on_event(&event) {
            commands_tx
                .send(command)
                .await
                .context("follower list controller stopped")?;
        }
        if presenter.is_done() {
            break;
        }
    }

    info!(username = presenter.username(), "follower browser finished");
    drop(commands_tx);
    controller_task
        .await
        .context("follower list controller panicked")?;
    Ok(())
}
