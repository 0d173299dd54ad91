// src/podcast.rs
use serde::{Deserialize, Serialize};
use std::fmt;

// === URL STRUCTURES ===
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioUrl(String);

impl std::fmt::Display for AudioUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for AudioUrl {
    fn eq(&self, other: &Self) -> bool {
        // Normalize URLs by trimming trailing slashes
        let a = self.0.trim_end_matches('/');
        let b = other.0.trim_end_matches('/');
        a == b
    }
}

impl Eq for AudioUrl {}

impl AudioUrl {
    pub fn new(s: &str) -> Self {
        AudioUrl(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AudioUrl {
    // Useful for passing to functions expecting &str
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// === ENTRY IDENTITY ===
// Entries are static, so title plus audio URL is a stable key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey(String);

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl EntryKey {
    pub fn new(title: &str, audio_url: &AudioUrl) -> Self {
        EntryKey(format!("{}::{}", title, audio_url.as_str().trim_end_matches('/')))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastEntry {
    #[serde(rename = "title")]
    title: String,
    #[serde(rename = "description")]
    description: String,
    #[serde(rename = "image_url")]
    image_url: String,
    #[serde(rename = "website_url")]
    website_url: String,
    #[serde(rename = "category")]
    category: String,
    #[serde(rename = "audio_url")]
    audio_url: AudioUrl,
}

impl PodcastEntry {
    pub fn new(
        title: String,
        description: String,
        image_url: String,
        website_url: String,
        category: String,
        audio_url: AudioUrl,
    ) -> Self {
        Self { title, description, image_url, website_url, category, audio_url }
    }

    // Accessor methods

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn audio_url(&self) -> &AudioUrl {
        &self.audio_url
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(&self.title, &self.audio_url)
    }
}

impl fmt::Display for PodcastEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title       : {}", self.title)?;
        writeln!(f, "Category    : {}", self.category)?;
        writeln!(f, "Description : {}", self.description)?;
        writeln!(f, "Image URL   : {}", self.image_url)?;
        writeln!(f, "Website URL : {}", self.website_url)?;
        writeln!(f, "Audio URL   : {}", self.audio_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_url_ignores_trailing_slash() {
        let a = AudioUrl::new("http://example.com/ep.mp3");
        let b = AudioUrl::new("http://example.com/ep.mp3/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_entry_key_is_stable_for_same_entry() {
        let url = AudioUrl::new("http://example.com/ep.mp3");
        assert_eq!(EntryKey::new("The Daily", &url), EntryKey::new("The Daily", &url));
        assert_ne!(EntryKey::new("The Daily", &url), EntryKey::new("Science Vs", &url));
    }
}
