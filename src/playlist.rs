//! The playlist document consumed by the player application.
//!
//! ```json
//! {
//!   "name": "...", "author": "...", "info": "...", "image": "...",
//!   "groups": [
//!     { "name": "...", "image": "...", "stations": [
//!       { "name": "...", "info": "...", "image": "...", "url": "...",
//!         "referer": "...", "userAgent": "..." }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A group holds either `stations` or nested `groups`, never both.

use std::path::{Path, PathBuf};

use football_playlist_utils::fs_json_util::write_json_pretty;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub author: String,
    pub info: String,
    pub image: String,
    pub groups: Vec<Group>,
}

impl Playlist {
    pub fn station_count(&self) -> usize {
        self.groups.iter().map(Group::station_count).sum()
    }

    /// Writes the playlist to `dir/file_name`, creating `dir` if needed.
    pub fn save(&self, dir: &Path, file_name: &str) -> anyhow::Result<PathBuf> {
        fs_err::create_dir_all(dir)?;
        let path = dir.join(file_name);
        write_json_pretty(&path, self)?;
        Ok(path)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(flatten)]
    pub entries: GroupEntries,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupEntries {
    Groups(Vec<Group>),
    Stations(Vec<Station>),
}

impl Group {
    pub fn with_stations(name: String, image: String, stations: Vec<Station>) -> Self {
        Self {
            name,
            image,
            info: None,
            entries: GroupEntries::Stations(stations),
        }
    }

    pub fn with_groups(name: String, image: String, groups: Vec<Group>) -> Self {
        Self {
            name,
            image,
            info: None,
            entries: GroupEntries::Groups(groups),
        }
    }

    pub fn info(self, info: impl Into<String>) -> Self {
        Self {
            info: Some(info.into()),
            ..self
        }
    }

    pub fn station_count(&self) -> usize {
        match &self.entries {
            GroupEntries::Groups(groups) => groups.iter().map(Group::station_count).sum(),
            GroupEntries::Stations(stations) => stations.len(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    pub info: String,
    pub image: String,
    pub url: String,
    pub referer: String,
    pub user_agent: String,
}

/// Request headers the player must send for every station of a site.
#[derive(Clone, Copy, Debug)]
pub struct Headers {
    pub referer: &'static str,
    pub user_agent: &'static str,
}

impl Station {
    pub fn new(name: String, info: String, image: String, url: String, headers: Headers) -> Self {
        Self {
            name,
            info,
            image,
            url,
            referer: headers.referer.to_owned(),
            user_agent: headers.user_agent.to_owned(),
        }
    }
}
