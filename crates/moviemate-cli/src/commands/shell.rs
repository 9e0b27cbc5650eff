use super::{prompts, render};
use crate::output::Output;
use crate::terminal::{PromptFocus, TerminalTitle};
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use moviemate_config::{Config, PathManager};
use moviemate_core::{CatalogController, CatalogError, FileStore, Key, Keymap, ViewCommand};
use moviemate_sources::OmdbClient;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

/// One line typed at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Query(String),
    Open(usize),
    Close,
    Watch(Option<u8>),
    Later,
    RemoveWatched(String),
    RemoveLater(String),
    List,
    Refresh,
    Key(Key),
    Help,
    Quit,
    Invalid(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> ShellCommand {
        let line = line.trim();
        if line.is_empty() {
            return ShellCommand::Key(Key::Enter);
        }
        let Some(command) = line.strip_prefix(':') else {
            return ShellCommand::Query(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match (name, arg) {
            ("open" | "o", n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => ShellCommand::Open(n),
                _ => ShellCommand::Invalid("Usage: :open N (N is the result number)".to_string()),
            },
            ("close" | "c", "") => ShellCommand::Close,
            ("watch" | "w", "") => ShellCommand::Watch(None),
            ("watch" | "w", rating) => match prompts::parse_rating(rating) {
                Some(rating) => ShellCommand::Watch(Some(rating)),
                None => ShellCommand::Invalid("Rating must be a number from 1 to 10".to_string()),
            },
            ("later" | "l", "") => ShellCommand::Later,
            ("rm-watched", id) if !id.is_empty() => ShellCommand::RemoveWatched(id.to_string()),
            ("rm-later", id) if !id.is_empty() => ShellCommand::RemoveLater(id.to_string()),
            ("list" | "ls", "") => ShellCommand::List,
            ("refresh" | "r", "") => ShellCommand::Refresh,
            ("esc", "") => ShellCommand::Key(Key::Escape),
            ("key", name) => match Key::from_name(name) {
                Some(key) => ShellCommand::Key(key),
                None => ShellCommand::Invalid(format!("Unknown key: {}", name)),
            },
            ("help" | "h" | "?", "") => ShellCommand::Help,
            ("quit" | "q" | "exit", "") => ShellCommand::Quit,
            _ => ShellCommand::Invalid(format!("Unknown command: {}", line)),
        }
    }
}

const HELP: &str = "\
  <text>             search for movies
  :open N            show details for result N (again to close)
  :close             close the details
  :watch [rating]    mark the open movie as watched
  :later             add the open movie to your watch list
  :rm-watched ID     remove a movie from your watched list
  :rm-later ID       remove a movie from your watch list
  :list              show your lists
  :refresh           run the current search again
  :esc, :key NAME    send Escape or another key
  <empty line>       send Enter (clears the search)
  :quit              leave";

pub async fn run_shell(config: Config, paths: &PathManager, output: &Output) -> Result<()> {
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    let data_dir = config.data_dir(paths.data_dir());
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directory {}: {}", data_dir.display(), e))?;

    let catalog = OmdbClient::from_config(&config.omdb)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create OMDb client: {}", e))?;
    let title = Arc::new(TerminalTitle::new(&config.display.default_title));
    let mut controller = CatalogController::new(
        Arc::new(catalog),
        Arc::new(FileStore::new(&data_dir)),
        title,
        Keymap::new(),
    );

    tracing::info!(data_dir = %data_dir.display(), "Shell started");
    output.info(format!(
        "{} type a title to search, :help for commands",
        config.display.default_title.bright_cyan().bold()
    ));

    loop {
        let prompt = match controller.selected_detail() {
            Some(movie) => movie.title.clone(),
            None => "search".to_string(),
        };
        let line = prompts::read_line(&prompt)?;

        match ShellCommand::parse(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => output.info(HELP),
            ShellCommand::Invalid(message) => output.error(message),
            ShellCommand::Query(query) => {
                controller.set_query(&query);
                wait_for_fetches(&mut controller, "Searching...").await;
                render::search(output, &controller);
            }
            ShellCommand::Refresh => {
                controller.refresh_search();
                wait_for_fetches(&mut controller, "Searching...").await;
                render::search(output, &controller);
            }
            ShellCommand::Open(n) => {
                let Some(id) = controller.results().get(n - 1).map(|m| m.id.clone()) else {
                    output.error(format!("No result #{}", n));
                    continue;
                };
                controller.toggle_selection(&id);
                wait_for_fetches(&mut controller, "Loading details...").await;
                render::detail(output, &controller);
            }
            ShellCommand::Close => controller.close_detail(),
            ShellCommand::Watch(rating) => {
                if controller.selected_detail().is_none() {
                    output.error(CatalogError::NoDetailLoaded.to_string());
                    continue;
                }
                if controller.is_selected_watched() {
                    output.warn("You already watched this movie");
                    continue;
                }
                let rating = match rating {
                    Some(rating) => rating,
                    None => prompts::prompt_rating(output)?,
                };
                match controller.commit_selected_watched(rating) {
                    Ok(_) => output.success("Added to your watched list"),
                    Err(e) => output.error(e.to_string()),
                }
            }
            ShellCommand::Later => match controller.commit_selected_to_watch() {
                Ok(true) => output.success("Added to your watch list"),
                Ok(false) => output.warn("Already in your lists"),
                Err(e) => output.error(e.to_string()),
            },
            ShellCommand::RemoveWatched(id) => {
                if controller.delete_watched(&id) {
                    output.success(format!("Removed {} from your watched list", id));
                } else {
                    output.warn(format!("{} is not in your watched list", id));
                }
            }
            ShellCommand::RemoveLater(id) => {
                if controller.delete_to_watch(&id) {
                    output.success(format!("Removed {} from your watch list", id));
                } else {
                    output.warn(format!("{} is not in your watch list", id));
                }
            }
            ShellCommand::List => render::collections(
                output,
                controller.watched().snapshot(),
                controller.to_watch().snapshot(),
            ),
            ShellCommand::Key(key) => {
                for command in controller.press_key(&key, &PromptFocus) {
                    match command {
                        ViewCommand::CloseDetail => output.info("Details closed"),
                        ViewCommand::FocusSearch => output.info("Search cleared"),
                    }
                }
            }
        }
    }

    // Restores the terminal title
    drop(controller);
    Ok(())
}

/// Apply fetch results as they arrive, with a spinner while any are pending.
async fn wait_for_fetches(controller: &mut CatalogController, message: &str) {
    if controller.pending_fetches() == 0 {
        return;
    }

    let spinner = if std::io::stderr().is_terminal() {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    } else {
        None
    };

    while let Some(changed) = controller.next_update().await {
        tracing::trace!(changed, remaining = controller.pending_fetches(), "Fetch applied");
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}
