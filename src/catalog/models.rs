//! Episode descriptors supplied by the host page

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use url::Url;

use super::error::CatalogError;

/// Selection key of an episode, unique within an [`EpisodeList`].
pub type EpisodeId = u32;

/// One playable unit within a playlist.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: EpisodeId,
    pub title: String,
    /// Short label such as "EP 28"
    #[serde(alias = "episode", default)]
    pub label: String,
    /// Display-only duration string, never authoritative for playback
    #[serde(default)]
    pub duration: String,
    /// Image reference, either an id on the image host or an absolute URL
    #[serde(default)]
    pub thumbnail: String,
    #[serde(alias = "videoUrl")]
    pub source_url: String,
}

impl Episode {
    /// Builds the single entry used by the watch page, where a movie has
    /// one video and an optional poster.
    pub fn single(source_url: impl Into<String>, poster: Option<String>) -> Self {
        Episode {
            id: 1,
            title: String::new(),
            label: String::new(),
            duration: String::new(),
            thumbnail: poster.unwrap_or_default(),
            source_url: source_url.into(),
        }
    }

    /// Full-size poster shown before playback starts.
    pub fn poster_url(&self, image_base: &str) -> String {
        self.image_url(image_base, 1920, 1080)
    }

    /// Small preview used in the episode list.
    pub fn thumbnail_url(&self, image_base: &str) -> String {
        self.image_url(image_base, 120, 68)
    }

    fn image_url(&self, image_base: &str, width: u32, height: u32) -> String {
        if Url::parse(&self.thumbnail).is_ok() {
            return self.thumbnail.clone();
        }
        format!(
            "{}/{}?w={}&h={}&fit=crop",
            image_base.trim_end_matches('/'),
            self.thumbnail,
            width,
            height
        )
    }

    /// Parses the display duration ("24:15" or "1:02:03") into seconds.
    pub fn display_duration_seconds(&self) -> Option<f64> {
        let parts = self
            .duration
            .trim()
            .split(':')
            .map(|p| p.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;

        let (hours, minutes, seconds) = match parts.as_slice() {
            [m, s] => (0, *m, *s),
            [h, m, s] => {
                if *m >= 60 {
                    return None;
                }
                (*h, *m, *s)
            }
            _ => return None,
        };
        if seconds >= 60 {
            return None;
        }
        let total = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?.checked_add(seconds)?;
        Some(f64::from(total))
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.label.is_empty(), self.title.is_empty()) {
            (false, false) => write!(f, "{} - {}", self.label, self.title),
            (false, true) => write!(f, "{}", self.label),
            (true, false) => write!(f, "{}", self.title),
            (true, true) => write!(f, "#{}", self.id),
        }
    }
}

/// Ordered playlist. Order is display and navigation order; ids need not be
/// contiguous.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct EpisodeList {
    episodes: Vec<Episode>,
}

impl EpisodeList {
    pub fn new(episodes: Vec<Episode>) -> Self {
        EpisodeList { episodes }
    }

    /// The three placeholder episodes shown when the page supplies none.
    pub fn fallback() -> Self {
        super::defaults::fallback_episodes()
    }

    pub fn find(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes.iter().find(|ep| ep.id == id)
    }

    pub fn contains(&self, id: EpisodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn first(&self) -> Option<&Episode> {
        self.episodes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Episode> {
        self.episodes.iter()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Checks id uniqueness and that every source is a parseable URL.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for episode in &self.episodes {
            if !seen.insert(episode.id) {
                return Err(CatalogError::DuplicateId(episode.id));
            }
            Url::parse(&episode.source_url).map_err(|source| CatalogError::InvalidSourceUrl {
                id: episode.id,
                source,
            })?;
        }
        Ok(())
    }
}

impl From<Vec<Episode>> for EpisodeList {
    fn from(episodes: Vec<Episode>) -> Self {
        EpisodeList::new(episodes)
    }
}

impl<'a> IntoIterator for &'a EpisodeList {
    type Item = &'a Episode;
    type IntoIter = std::slice::Iter<'a, Episode>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}
