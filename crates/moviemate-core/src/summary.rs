use moviemate_models::WatchEntry;

/// Aggregate figures shown above the watched list.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime_minutes: f32,
}

impl WatchedSummary {
    /// Averages skip entries without a value and are 0 for an empty list
    pub fn from_entries(entries: &[WatchEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().filter_map(|e| e.user_rating.map(f32::from))),
            avg_runtime_minutes: average(entries.iter().map(|e| e.runtime_minutes as f32)),
        }
    }
}

fn average(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0_f32, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// "No movies left to watch...", "1 movie left to watch...", "3 movies left to watch..."
pub fn watch_list_line(count: usize) -> String {
    match count {
        0 => "No movies left to watch...".to_string(),
        1 => "1 movie left to watch...".to_string(),
        n => format!("{} movies left to watch...", n),
    }
}

pub fn result_count_line(count: usize) -> String {
    format!("Found {} results", count)
}
