//! dooballfree.cam renders the schedule as a flat run of elements: a date
//! heading, then league headings, then one row per match followed by its
//! team box and channel strip.

use std::time::Duration;

use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime};
use football_playlist_utils::selector;
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use scraper::{ElementRef, Html};

use super::{has_class, next_sibling_with_class, stripped_text, League, Site, TeamName};
use crate::{
    browser::RenderOptions,
    chrono_util::{clock_minutes, parse_thai_date},
    playlist::{Group, Headers, Playlist, Station},
};

pub struct Dooballfree;

const LOGO: &str = "https://dooballfree.cam/wp-content/uploads/2025/05/logo-1-1.png";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const HEADERS: Headers = Headers {
    referer: Dooballfree::URL,
    user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 14_4_2 like Mac OS X)",
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fixture {
    /// As shown on the page, e.g. `17 ต.ค. 2569`.
    pub date: String,
    pub league: League,
    pub time: String,
    pub home: TeamName,
    pub away: TeamName,
    pub home_logo: String,
    pub away_logo: String,
    pub channels: Vec<Channel>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Channel {
    pub image: String,
    pub url: String,
}

impl Site for Dooballfree {
    const ID: &'static str = "dooballfree";
    const URL: &'static str = "https://dooballfree.cam/";
    const OUTPUT_FILE: &'static str = "dbf.txt";

    type Match = Fixture;

    fn render_options() -> RenderOptions {
        RenderOptions::builder()
            .user_agent(BROWSER_USER_AGENT)
            .wait_timeout(Duration::from_secs(30))
            .settle(Duration::from_secs(5))
            .scroll_to_bottom(true)
            .build()
    }

    fn parse(html: &Html, _now: NaiveDateTime) -> Vec<Fixture> {
        let mut date = String::new();
        let mut league = League::default();
        let mut fixtures = vec![];
        for element in html.root_element().descendants().filter_map(ElementRef::wrap) {
            match element.value().name() {
                "b" if has_class(element, "fs-4") => date = stripped_text(element),
                "strong" if has_class(element, "text-white") => {
                    league = stripped_text(element).into()
                }
                "div" if has_class(element, "border-end") => {
                    match parse_fixture(element, &date, &league) {
                        Ok(fixture) => fixtures.push(fixture),
                        Err(e) => debug!("Skipping dooballfree match: {e:#}"),
                    }
                }
                _ => {}
            }
        }
        fixtures
    }

    fn build_playlist(fixtures: Vec<Fixture>, now: NaiveDateTime) -> Playlist {
        let today = now.date();
        let fixtures = fixtures
            .into_iter()
            .enumerate()
            .sorted_by_cached_key(|(index, f)| sort_key(f, *index, today))
            .map(|(_, f)| f)
            .collect_vec();

        let first_date = fixtures.first().map(|f| f.date.clone()).unwrap_or_default();

        let mut by_date = IndexMap::<_, Vec<_>>::new();
        for fixture in fixtures {
            by_date
                .entry(fixture.date.clone())
                .or_default()
                .push(fixture.into_group());
        }
        let groups = by_date
            .into_iter()
            .map(|(date, matches)| {
                Group::with_groups(format!("วันที่ {date}"), LOGO.to_owned(), matches)
            })
            .collect();

        let title = format!("dooballfree.cam@{first_date}");
        Playlist {
            name: title.clone(),
            author: format!("Update@{first_date}"),
            info: title,
            image: LOGO.to_owned(),
            groups,
        }
    }
}

/// Unreadable times count as midnight. An unreadable date sorts after the
/// real fixtures of today, in page order and regardless of its time.
fn sort_key(
    fixture: &Fixture,
    index: usize,
    today: NaiveDate,
) -> (NaiveDate, Option<usize>, u32) {
    let time = clock_minutes(&fixture.time).unwrap_or(0);
    match parse_thai_date(&fixture.date) {
        Ok(date) => (date, None, time),
        Err(_) => (today, Some(index), time),
    }
}

impl Fixture {
    pub fn title(&self) -> String {
        format!("{} | {} vs {}", self.time, self.home, self.away)
    }

    fn into_group(self) -> Group {
        let title = self.title();
        let league = self.league.to_string();
        let stations = self
            .channels
            .into_iter()
            .map(|channel| {
                Station::new(
                    title.clone(),
                    league.clone(),
                    channel.image,
                    channel.url,
                    HEADERS,
                )
            })
            .collect();
        let image = if self.home_logo.is_empty() {
            self.away_logo
        } else {
            self.home_logo
        };
        Group::with_stations(title, image, stations).info(league)
    }
}

fn parse_fixture(row: ElementRef, date: &str, league: &League) -> anyhow::Result<Fixture> {
    let time = stripped_text(row);
    let team_box = next_sibling_with_class(row, "div", "bg-dark").context("Team box not found")?;

    let teams = team_box.select(selector!("p[style]")).collect_vec();
    let (home, away) = match teams[..] {
        [home, .., away] => (home, away),
        _ => bail!("Expected two teams, found {}", teams.len()),
    };
    let mut logos = team_box
        .select(selector!("img[height='35px']"))
        .map(|img| img.attr("src").unwrap_or_default().to_owned());
    let home_logo = logos.next().unwrap_or_default();
    let away_logo = logos.next().unwrap_or_default();

    let channels = next_sibling_with_class(team_box, "div", "bg-secondary")
        .map(|strip| {
            strip
                .select(selector!("img.iam-list-tv"))
                .map(|img| Channel {
                    image: img.attr("src").unwrap_or_default().to_owned(),
                    url: img.attr("data-url").unwrap_or_default().to_owned(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Fixture {
        date: date.to_owned(),
        league: league.clone(),
        time,
        home: stripped_text(home).into(),
        away: stripped_text(away).into(),
        home_logo,
        away_logo,
        channels,
    })
}
