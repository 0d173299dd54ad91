// src/catalog.rs
use crate::podcast::{AudioUrl, EntryKey, PodcastEntry};

/// Sentinel category that matches every entry.
pub const ALL_CATEGORIES: &str = "All";

/// The static, ordered list of podcast entries. Built once at startup;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<PodcastEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<PodcastEntry>) -> Self {
        Self { entries }
    }

    /// The compiled-in featured podcasts.
    pub fn builtin() -> Self {
        let entries = vec![
            PodcastEntry::new(
                "The Daily".to_string(),
                "News and insights from The New York Times.".to_string(),
                "https://static01.nyt.com/images/2019/06/18/podcasts/the-daily-album-art/the-daily-album-art-square320.jpg".to_string(),
                "https://www.nytimes.com/column/the-daily".to_string(),
                "News".to_string(),
                AudioUrl::new("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3"),
            ),
            PodcastEntry::new(
                "99% Invisible".to_string(),
                "Design and architecture stories you didn't know you needed.".to_string(),
                "https://99percentinvisible.org/app/uploads/2021/02/99invisible_logo-320x320.png".to_string(),
                "https://99percentinvisible.org/".to_string(),
                "Design".to_string(),
                AudioUrl::new("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3"),
            ),
            PodcastEntry::new(
                "SmartLess".to_string(),
                "Funny, inspiring, and insightful conversations with celebrities.".to_string(),
                "https://m.media-amazon.com/images/I/71m7d3hn5iL._SL500_.jpg".to_string(),
                "https://www.smartless.com/".to_string(),
                "Comedy".to_string(),
                AudioUrl::new("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3"),
            ),
            PodcastEntry::new(
                "Planet Money".to_string(),
                "The economy explained in a fun, engaging way.".to_string(),
                "https://media.npr.org/assets/img/2021/07/06/planet-money_sq-187379f9759d0030f7c09c6ce1c5a92edaa9d31d.jpg".to_string(),
                "https://www.npr.org/sections/money/".to_string(),
                "Finance".to_string(),
                AudioUrl::new("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3"),
            ),
            PodcastEntry::new(
                "Science Vs".to_string(),
                "Science Vs myths, fads and bad advice.".to_string(),
                "https://images.megaphone.fm/sVm5cdOjEpYWSNkFdqbs8vqw7iG1Q0RA0DWU1WXvbh4/plain/s3://megaphone-prod/podcasts/776fb4e8-6db1-11e8-b14a-ff3e84fb8c35/image/sciencevs_2020_final.jpg".to_string(),
                "https://gimletmedia.com/shows/science-vs".to_string(),
                "Science".to_string(),
                AudioUrl::new("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-5.mp3"),
            ),
        ];
        Self { entries }
    }

    pub fn list(&self) -> &[PodcastEntry] {
        &self.entries
    }

    /// Distinct categories in catalog order, with the "All" sentinel prepended.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = vec![ALL_CATEGORIES.to_string()];
        for entry in &self.entries {
            if !categories.iter().any(|c| c == entry.category()) {
                categories.push(entry.category().to_string());
            }
        }
        categories
    }

    pub fn get(&self, key: &EntryKey) -> Option<&PodcastEntry> {
        self.entries.iter().find(|e| &e.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_featured_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.list().len(), 5);
        assert_eq!(catalog.list()[0].title(), "The Daily");
        assert_eq!(catalog.list()[4].title(), "Science Vs");
    }

    #[test]
    fn test_categories_start_with_all_sentinel() {
        let catalog = Catalog::builtin();
        let categories = catalog.categories();
        assert_eq!(categories[0], ALL_CATEGORIES);
        assert_eq!(categories, vec!["All", "News", "Design", "Comedy", "Finance", "Science"]);
    }

    #[test]
    fn test_categories_are_distinct() {
        let entry = |title: &str, category: &str| {
            PodcastEntry::new(
                title.to_string(),
                String::new(),
                String::new(),
                String::new(),
                category.to_string(),
                AudioUrl::new("http://example.com/a.mp3"),
            )
        };
        let catalog = Catalog::new(vec![
            entry("A", "Finance"),
            entry("B", "Science"),
            entry("C", "Finance"),
        ]);
        assert_eq!(catalog.categories(), vec!["All", "Finance", "Science"]);
    }

    #[test]
    fn test_get_by_key() {
        let catalog = Catalog::builtin();
        let key = catalog.list()[3].key();
        assert_eq!(catalog.get(&key).map(|e| e.title()), Some("Planet Money"));
    }
}
