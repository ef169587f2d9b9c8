//! dookeela4.live shows one card per match. Kick-off times are printed in
//! UTC; matches in progress carry a "watching" badge instead.

use std::{collections::BTreeMap, time::Duration};

use anyhow::{anyhow, Context};
use chrono::{NaiveDate, NaiveDateTime};
use football_playlist_utils::selector;
use itertools::Itertools;
use scraper::{ElementRef, Html};

use super::{absolute_url, best_effort, trimmed_text, League, Site, TeamName};
use crate::{
    browser::RenderOptions,
    chrono_util::{utc_to_bangkok, FULL_DATE, SHORT_DATE},
    playlist::{Group, Headers, Playlist, Station},
};

pub struct Dookeela;

const LOGO: &str = "https://dookeela4.live/images/logo-bar.png";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:146.0) Gecko/20100101 Firefox/146.0";
const HEADERS: Headers = Headers {
    referer: Dookeela::URL,
    user_agent: USER_AGENT,
};
const LIVE_BADGE: &str = "กำลังดู";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kickoff {
    Live,
    /// Bangkok time.
    At(NaiveDateTime),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fixture {
    pub kickoff: Kickoff,
    pub home: TeamName,
    pub away: TeamName,
    pub league: League,
    pub league_logo: String,
    pub url: String,
}

impl Site for Dookeela {
    const ID: &'static str = "dookeela";
    const URL: &'static str = "https://dookeela4.live/";
    const OUTPUT_FILE: &'static str = "kl.txt";

    type Match = Fixture;

    fn render_options() -> RenderOptions {
        RenderOptions::builder()
            .user_agent(USER_AGENT)
            .wait_timeout(Duration::from_secs(20))
            .settle(Duration::from_secs(3))
            .build()
    }

    fn parse(html: &Html, _now: NaiveDateTime) -> Vec<Fixture> {
        best_effort(
            html.select(selector!("a[href^='/football/match/']"))
                .map(parse_card),
            "dookeela match card",
        )
    }

    fn build_playlist(fixtures: Vec<Fixture>, now: NaiveDateTime) -> Playlist {
        let mut live = vec![];
        let mut by_date = BTreeMap::<NaiveDate, Vec<_>>::new();
        for fixture in fixtures {
            match fixture.kickoff {
                Kickoff::Live => live.push(fixture),
                Kickoff::At(at) => by_date.entry(at.date()).or_default().push((at, fixture)),
            }
        }

        let mut groups = vec![];
        if !live.is_empty() {
            let stations = live
                .into_iter()
                .map(|f| {
                    let name = format!("🔴 กำลังแข่ง {} vs {}", f.home, f.away);
                    f.into_station(name)
                })
                .collect();
            groups.push(Group::with_stations(
                "🔴 Live Now".to_owned(),
                LOGO.to_owned(),
                stations,
            ));
        }
        for (date, fixtures) in by_date {
            let stations = fixtures
                .into_iter()
                .sorted_by_key(|&(at, _)| at)
                .map(|(at, f)| {
                    let name = format!("{} {} vs {}", at.format("%H:%M"), f.home, f.away);
                    f.into_station(name)
                })
                .collect();
            groups.push(Group::with_stations(
                format!("📅 วันที่ {}", date.format(SHORT_DATE)),
                LOGO.to_owned(),
                stations,
            ));
        }

        let stamp = now.format(FULL_DATE);
        Playlist {
            name: format!("ดู dookeela4.live update @{stamp}"),
            author: format!("Update@{stamp}"),
            info: format!("dookeela4.live Update@{stamp}"),
            image: LOGO.to_owned(),
            groups,
        }
    }
}

impl Fixture {
    fn into_station(self, name: String) -> Station {
        Station::new(
            name,
            self.league.to_string(),
            self.league_logo,
            self.url,
            HEADERS,
        )
    }
}

fn parse_card(card: ElementRef) -> anyhow::Result<Fixture> {
    let href = card.attr("href").context("Match card has no href")?;
    let badge = card
        .select(selector!("div.mb-2 span.text-sub"))
        .next()
        .context("Kick-off time not found")?;
    let kickoff = parse_kickoff(&trimmed_text(badge))?;
    let (league, league_logo) = parse_league(card);

    let mut teams = card
        .select(selector!("div.flex.items-center.gap-2 span"))
        .map(trimmed_text);
    let mut next_team = || TeamName::from(teams.next().unwrap_or_else(|| "-".to_owned()));
    let home = next_team();
    let away = next_team();

    Ok(Fixture {
        kickoff,
        home,
        away,
        league,
        league_logo,
        url: absolute_url(Dookeela::URL, href)?,
    })
}

fn parse_kickoff(text: &str) -> anyhow::Result<Kickoff> {
    if text.contains(LIVE_BADGE) {
        return Ok(Kickoff::Live);
    }
    let [date, time]: [&str; 2] = text
        .split_whitespace()
        .collect_vec()
        .try_into()
        .map_err(|parts| anyhow!("Expected `dd/mm/yy HH:MM`, found {parts:?}"))?;
    let utc = NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%d/%m/%y %H:%M")
        .with_context(|| format!("Invalid kick-off time {text:?}"))?;
    Ok(Kickoff::At(utc_to_bangkok(utc)))
}

fn parse_league(card: ElementRef) -> (League, String) {
    let img = card
        .select(selector!("div.mb-2"))
        .next()
        .and_then(|block| block.select(selector!("img")).next());
    match img {
        Some(img) => (
            img.attr("alt").unwrap_or("Unknown").trim().to_owned().into(),
            img.attr("src").unwrap_or(LOGO).to_owned(),
        ),
        None => ("Unknown League".to_owned().into(), LOGO.to_owned()),
    }
}
