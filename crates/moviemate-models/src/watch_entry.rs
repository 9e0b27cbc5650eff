use serde::{Deserialize, Serialize};

/// Items stored in an id-deduplicated collection.
pub trait Keyed {
    fn id(&self) -> &str;
}

/// A movie the user has committed to one of their personal lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub id: String, // Same key as the MovieDetail it was derived from
    pub poster_url: String,
    pub title: String,
    pub year: String,
    pub imdb_rating: Option<f32>,
    pub runtime_minutes: u32,
    #[serde(default)]
    pub user_rating: Option<u8>, // Unset for "to watch", 1-10 for "watched"
}

impl Keyed for WatchEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_entry_without_user_rating_deserializes() {
        let json = r#"{"id":"tt1","posterUrl":"","title":"A","year":"2001","imdbRating":7.1,"runtimeMinutes":100}"#;
        let entry: WatchEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id(), "tt1");
        assert_eq!(entry.runtime_minutes, 100);
        assert_eq!(entry.user_rating, None);
    }

    #[test]
    fn test_watch_entry_keeps_missing_imdb_rating() {
        let json = r#"{"id":"tt2","posterUrl":"","title":"B","year":"2002","imdbRating":null,"runtimeMinutes":95,"userRating":8}"#;
        let entry: WatchEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.imdb_rating, None);
        assert_eq!(entry.user_rating, Some(8));
    }
}
