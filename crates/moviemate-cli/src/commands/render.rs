use crate::output::Output;
use comfy_table::{Attribute, Cell, Color, Table};
use moviemate_core::{
    result_count_line, watch_list_line, CatalogController, DetailState, SearchState, WatchedSummary,
};
use moviemate_models::{MovieDetail, MovieSummary, WatchEntry};
use owo_colors::OwoColorize;
use serde_json::json;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn rating_text(rating: Option<f32>) -> String {
    rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "N/A".to_string())
}

pub fn search(output: &Output, controller: &CatalogController) {
    match controller.search_state() {
        SearchState::Idle => {}
        SearchState::Loading => output.info("Searching..."),
        SearchState::Failure(message) => output.error(message),
        SearchState::Success(results) => search_results(output, results),
    }
}

fn search_results(output: &Output, results: &[MovieSummary]) {
    if !output.is_human() {
        output.json(&json!({ "type": "results", "results": results }));
        return;
    }

    output.info(result_count_line(results.len()).bright_cyan().to_string());
    if results.is_empty() {
        return;
    }

    let mut table = new_table(vec!["#", "Title", "Year", "IMDb ID"]);
    for (index, movie) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&movie.title),
            Cell::new(&movie.year),
            Cell::new(&movie.id).fg(Color::DarkGrey),
        ]);
    }
    output.info(table.to_string());
}

pub fn detail(output: &Output, controller: &CatalogController) {
    match controller.detail_state() {
        DetailState::Idle => {}
        DetailState::Loading { id } => output.info(format!("Loading {}...", id)),
        DetailState::Failed { id, message } => output.error(format!("Could not load {}: {}", id, message)),
        DetailState::Loaded(movie) => {
            let watched = controller.watched().get(&movie.id);
            detail_card(output, movie, watched);
        }
    }
}

fn detail_card(output: &Output, movie: &MovieDetail, watched: Option<&WatchEntry>) {
    if !output.is_human() {
        output.json(&json!({
            "type": "detail",
            "movie": movie,
            "watched": watched.is_some(),
            "userRating": watched.and_then(|w| w.user_rating),
        }));
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(format!("{} ({})", movie.title, movie.year))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(&movie.id),
    ]);
    table.add_row(vec![Cell::new("Released"), Cell::new(&movie.release_date)]);
    table.add_row(vec![Cell::new("Runtime"), Cell::new(&movie.runtime)]);
    table.add_row(vec![Cell::new("Genre"), Cell::new(&movie.genre)]);
    table.add_row(vec![Cell::new("IMDb rating"), Cell::new(rating_text(movie.imdb_rating))]);
    table.add_row(vec![Cell::new("Plot"), Cell::new(&movie.plot)]);
    table.add_row(vec![Cell::new("Starring"), Cell::new(&movie.actors)]);
    table.add_row(vec![Cell::new("Directed by"), Cell::new(&movie.director)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    output.info(table.to_string());

    match watched {
        Some(entry) => output.info(format!(
            "{} You rated this movie {}",
            "★".yellow(),
            entry.user_rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
        )),
        None => output.info(":watch [rating] to mark as watched, :later to add to your watch list".bright_black().to_string()),
    }
}

pub fn collections(output: &Output, watched: &[WatchEntry], to_watch: &[WatchEntry]) {
    let summary = WatchedSummary::from_entries(watched);

    if !output.is_human() {
        output.json(&json!({
            "type": "collections",
            "watched": watched,
            "toWatch": to_watch,
            "summary": {
                "count": summary.count,
                "avgImdbRating": summary.avg_imdb_rating,
                "avgUserRating": summary.avg_user_rating,
                "avgRuntimeMinutes": summary.avg_runtime_minutes,
            },
        }));
        return;
    }

    output.info(format!(
        "{}  {} movies  ⭐ {:.2}  🌟 {:.2}  ⏳ {:.0} min",
        "Movies you watched".bright_cyan().bold(),
        summary.count,
        summary.avg_imdb_rating,
        summary.avg_user_rating,
        summary.avg_runtime_minutes,
    ));
    if !watched.is_empty() {
        let mut table = new_table(vec!["IMDb ID", "Title", "Year", "IMDb", "Yours", "Runtime"]);
        for entry in watched {
            table.add_row(vec![
                Cell::new(&entry.id).fg(Color::DarkGrey),
                Cell::new(&entry.title),
                Cell::new(&entry.year),
                Cell::new(rating_text(entry.imdb_rating)),
                Cell::new(entry.user_rating.map(|r| r.to_string()).unwrap_or_default()),
                Cell::new(format!("{} min", entry.runtime_minutes)),
            ]);
        }
        output.info(table.to_string());
    }

    output.info(watch_list_line(to_watch.len()).bright_cyan().bold().to_string());
    if !to_watch.is_empty() {
        let mut table = new_table(vec!["IMDb ID", "Title", "Year", "IMDb", "Runtime"]);
        for entry in to_watch {
            table.add_row(vec![
                Cell::new(&entry.id).fg(Color::DarkGrey),
                Cell::new(&entry.title),
                Cell::new(&entry.year),
                Cell::new(rating_text(entry.imdb_rating)),
                Cell::new(format!("{} min", entry.runtime_minutes)),
            ]);
        }
        output.info(table.to_string());
    }
}
