use std::{
    fmt::Debug,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use clap::ValueEnum;
use derive_more::{Display, From};
use log::{debug, info};
use scraper::{ElementRef, Html};
use url::Url;

use crate::{
    browser::{self, LaunchConfig, RenderOptions},
    playlist::Playlist,
};

pub mod ball67;
pub mod dooballfree;
pub mod dookeela;

pub use ball67::Ball67;
pub use dooballfree::Dooballfree;
pub use dookeela::Dookeela;

/// A streaming site whose fixture page can be turned into a playlist.
pub trait Site {
    /// Identifier used in logs.
    const ID: &'static str;
    const URL: &'static str;
    const OUTPUT_FILE: &'static str;

    type Match: Debug;

    fn render_options() -> RenderOptions;

    /// Extracts every match that can be read from the page.
    /// Records that fail to parse are skipped.
    fn parse(html: &Html, now: NaiveDateTime) -> Vec<Self::Match>;

    fn build_playlist(matches: Vec<Self::Match>, now: NaiveDateTime) -> Playlist;
}

pub fn playlist_from_html<S: Site>(html: &str, now: NaiveDateTime) -> Playlist {
    let html = Html::parse_document(html);
    let matches = S::parse(&html, now);
    info!("{}: parsed {} matches", S::ID, matches.len());
    S::build_playlist(matches, now)
}

/// Renders the site, builds its playlist and writes it into `output_dir`.
pub fn scrape<S: Site>(
    launch: &LaunchConfig,
    output_dir: &Path,
    now: NaiveDateTime,
) -> anyhow::Result<PathBuf> {
    let html = browser::render(S::URL, &S::render_options(), launch)?;
    let playlist = playlist_from_html::<S>(&html, now);
    let path = playlist.save(output_dir, S::OUTPUT_FILE)?;
    info!(
        "{}: saved {} groups, {} stations to {path:?}",
        S::ID,
        playlist.groups.len(),
        playlist.station_count(),
    );
    Ok(path)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum SiteId {
    Ball67,
    Dooballfree,
    Dookeela,
}

impl SiteId {
    pub fn output_file(self) -> &'static str {
        match self {
            Self::Ball67 => Ball67::OUTPUT_FILE,
            Self::Dooballfree => Dooballfree::OUTPUT_FILE,
            Self::Dookeela => Dookeela::OUTPUT_FILE,
        }
    }

    pub fn playlist_from_html(self, html: &str, now: NaiveDateTime) -> Playlist {
        match self {
            Self::Ball67 => playlist_from_html::<Ball67>(html, now),
            Self::Dooballfree => playlist_from_html::<Dooballfree>(html, now),
            Self::Dookeela => playlist_from_html::<Dookeela>(html, now),
        }
    }

    pub fn scrape(
        self,
        launch: &LaunchConfig,
        output_dir: &Path,
        now: NaiveDateTime,
    ) -> anyhow::Result<PathBuf> {
        match self {
            Self::Ball67 => scrape::<Ball67>(launch, output_dir, now),
            Self::Dooballfree => scrape::<Dooballfree>(launch, output_dir, now),
            Self::Dookeela => scrape::<Dookeela>(launch, output_dir, now),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, From, Display)]
pub struct League(String);

#[derive(Clone, PartialEq, Eq, Debug, Default, From, Display)]
pub struct TeamName(String);

/// Keeps the successfully parsed records and logs the rest.
pub fn best_effort<T>(items: impl IntoIterator<Item = anyhow::Result<T>>, what: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Skipping {what}: {e:#}");
                None
            }
        })
        .collect()
}

pub fn absolute_url(base: &str, href: &str) -> anyhow::Result<String> {
    Ok(Url::parse(base)?.join(href)?.into())
}

/// Text nodes trimmed one by one and concatenated.
pub fn stripped_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// The whole text content, trimmed at both ends.
pub fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}

pub fn has_class(element: ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// The first later sibling `<name class="... class ...">`, not necessarily adjacent.
pub fn next_sibling_with_class<'a>(
    element: ElementRef<'a>,
    name: &str,
    class: &str,
) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == name && has_class(*e, class))
}
