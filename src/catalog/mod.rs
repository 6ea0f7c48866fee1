//! Catalog records: channels, seasons, shows and their episodes.

pub mod store;

use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::media::scanner::list_media_files;

/// A named folder played as a continuous, re-scanned sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub folder_path: String,
}

/// One persisted, season-scoped episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub filename: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub seasons: Vec<String>,
}

/// A channel entry computed from the folder listing. Never persisted;
/// `index` shifts whenever the folder contents change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEpisode {
    pub index: usize,
    pub filename: String,
    pub path: String,
}

/// Whole-document snapshot of every catalog collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Ordered by numeric id, i.e. creation order.
    pub channels: Vec<Channel>,
    pub seasons: Vec<Season>,
    pub shows: Vec<Show>,
}

impl Catalog {
    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn season_mut(&mut self, id: &str) -> Option<&mut Season> {
        self.seasons.iter_mut().find(|s| s.id == id)
    }

    /// Register a channel and return a copy of the stored record.
    pub fn add_channel(&mut self, name: String, folder_path: String) -> Channel {
        let channel = Channel {
            id: next_id(self.channels.iter().map(|c| c.id.as_str())),
            name,
            folder_path,
        };
        self.channels.push(channel.clone());
        channel
    }

    /// Returns false when no channel had that id.
    pub fn remove_channel(&mut self, id: &str) -> bool {
        let before = self.channels.len();
        self.channels.retain(|c| c.id != id);
        self.channels.len() != before
    }

    pub fn add_season(&mut self, name: String) -> Season {
        let season = Season {
            id: next_id(self.seasons.iter().map(|s| s.id.as_str())),
            name,
            episodes: Vec::new(),
        };
        self.seasons.push(season.clone());
        season
    }

    pub fn remove_season(&mut self, id: &str) {
        self.seasons.retain(|s| s.id != id);
    }

    /// The id the next `add_show` will assign.
    pub fn next_show_id(&self) -> String {
        next_id(self.shows.iter().map(|s| s.id.as_str()))
    }

    pub fn add_show(&mut self, name: String, poster: String) -> Show {
        let show = Show {
            id: self.next_show_id(),
            name,
            poster,
            seasons: Vec::new(),
        };
        self.shows.push(show.clone());
        show
    }
}

impl Season {
    /// Append `filenames` (already sorted) from `folder` as new episodes,
    /// numbering them after the highest existing episode id.
    pub fn append_episodes(&mut self, folder: &Path, filenames: Vec<String>) {
        let mut counter = max_numeric_id(self.episodes.iter().map(|e| e.id.as_str()));
        for filename in filenames {
            counter += 1;
            let path = folder.join(&filename).to_string_lossy().into_owned();
            self.episodes.push(Episode {
                id: counter.to_string(),
                filename,
                path,
            });
        }
    }
}

impl Channel {
    /// Re-scan the channel folder and number its playable files.
    pub fn episodes(&self) -> Vec<ChannelEpisode> {
        let folder = Path::new(&self.folder_path);
        list_media_files(folder)
            .into_iter()
            .enumerate()
            .map(|(index, filename)| ChannelEpisode {
                index,
                path: folder.join(&filename).to_string_lossy().into_owned(),
                filename,
            })
            .collect()
    }
}

fn max_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0)
}

/// Next decimal id after the largest numeric id in `ids`.
///
/// Matches `len + 1` for collections that never lost a record, and never
/// hands out an id that is still in use after deletions.
pub fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    (max_numeric_id(ids) + 1).to_string()
}

/// Serializes channels as a JSON object keyed by id, the layout of
/// `channels.json` and of `GET /api/channels`.
pub struct ChannelIndex<'a>(pub &'a [Channel]);

impl Serialize for ChannelIndex<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for channel in self.0 {
            map.serialize_entry(&channel.id, channel)?;
        }
        map.end()
    }
}

/// Order channels by numeric id, with non-numeric ids last.
pub(crate) fn sort_channels(channels: &mut [Channel]) {
    channels.sort_by(|a, b| {
        let key = |c: &Channel| (c.id.parse::<u64>().unwrap_or(u64::MAX), c.id.clone());
        key(a).cmp(&key(b))
    });
}
