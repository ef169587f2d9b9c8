//! ball67.com lists fixtures under one card per league.
//! Each fixture shows a kick-off time and a `dd/mm/yy` date.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDateTime;
use football_playlist_utils::selector;
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use scraper::{ElementRef, Html};

use super::{absolute_url, best_effort, stripped_text, League, Site, TeamName};
use crate::{
    browser::RenderOptions,
    chrono_util::{minutes_of_day, parse_short_date, FULL_DATE},
    playlist::{Group, Headers, Playlist, Station},
};

pub struct Ball67;

const LOGO: &str = "https://img2.pic.in.th/sitelogo.md.png";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:146.0) Gecko/20100101 Firefox/146.0";
const HEADERS: Headers = Headers {
    referer: Ball67::URL,
    user_agent: USER_AGENT,
};
/// Fixtures without a readable time go to the end of their day.
const UNKNOWN_TIME_MINUTES: u32 = 23 * 60 + 59;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fixture {
    pub league: League,
    pub time: String,
    pub date: String,
    pub home: TeamName,
    pub away: TeamName,
    pub home_logo: String,
    pub url: String,
}

impl Site for Ball67 {
    const ID: &'static str = "ball67";
    const URL: &'static str = "https://ball67.com/";
    const OUTPUT_FILE: &'static str = "b67m.txt";

    type Match = Fixture;

    fn render_options() -> RenderOptions {
        RenderOptions::builder()
            .user_agent(USER_AGENT)
            .wait_for("#livefixtures-wrapper")
            .wait_timeout(Duration::from_secs(30))
            .settle(Duration::from_secs(3))
            .build()
    }

    fn parse(html: &Html, _now: NaiveDateTime) -> Vec<Fixture> {
        let mut fixtures = vec![];
        for block in html.select(selector!("#livefixtures-wrapper > div > div.rounded-xl")) {
            let league = match parse_league(block) {
                Ok(league) => league,
                Err(e) => {
                    debug!("Skipping league block: {e:#}");
                    continue;
                }
            };
            fixtures.extend(best_effort(
                block
                    .select(selector!("a[href^='/live/']"))
                    .map(|a| parse_fixture(a, &league)),
                "ball67 fixture",
            ));
        }
        fixtures
    }

    fn build_playlist(fixtures: Vec<Fixture>, now: NaiveDateTime) -> Playlist {
        let mut by_date = IndexMap::<_, Vec<_>>::new();
        for fixture in fixtures {
            by_date.entry(fixture.date.clone()).or_default().push(fixture);
        }

        let groups = by_date
            .into_iter()
            // Unreadable dates sort after every real one.
            .sorted_by_key(|(date, _)| {
                let date = parse_short_date(date);
                (date.is_none(), date)
            })
            .map(|(date, fixtures)| {
                let stations = fixtures
                    .into_iter()
                    .sorted_by_key(|f| time_sort_key(&f.time))
                    .map(Fixture::into_station)
                    .collect();
                Group::with_stations(format!("วันที่ {date}"), LOGO.to_owned(), stations)
            })
            .collect();

        let stamp = now.format(FULL_DATE);
        Playlist {
            name: format!("ball67 update @{stamp}"),
            author: format!("Update@{stamp}"),
            info: format!("ball67 Update@{stamp}"),
            image: LOGO.to_owned(),
            groups,
        }
    }
}

impl Fixture {
    fn into_station(self) -> Station {
        Station::new(
            format!("{} {} vs {}", self.time, self.home, self.away),
            self.league.to_string(),
            self.home_logo,
            self.url,
            HEADERS,
        )
    }
}

fn time_sort_key(time: &str) -> u32 {
    time.split(' ')
        .next()
        .and_then(minutes_of_day)
        .unwrap_or(UNKNOWN_TIME_MINUTES)
}

fn parse_league(block: ElementRef) -> anyhow::Result<League> {
    let title = block
        .select(selector!("div.bg-gradient-to-r"))
        .next()
        .context("League header not found")?
        .select(selector!("h2"))
        .next()
        .context("League title not found")?;
    Ok(title
        .text()
        .flat_map(str::split_whitespace)
        .join(" ")
        .into())
}

fn parse_fixture(a: ElementRef, league: &League) -> anyhow::Result<Fixture> {
    let href = a.attr("href").context("Fixture link has no href")?;
    let status = a
        .select(selector!(".match-status"))
        .next()
        .context("Match status not found")?;
    let [time, date]: [&str; 2] = status
        .text()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect_vec()
        .try_into()
        .map_err(|parts| anyhow!("Expected time and date in match status, found {parts:?}"))?;

    let teams = a.select(selector!(".space-y-3 > div")).collect_vec();
    let [home, away, ..] = teams[..] else {
        bail!("Expected two teams, found {}", teams.len());
    };
    let home_logo = home
        .select(selector!("img"))
        .next()
        .and_then(|img| img.attr("src"))
        .context("Home team logo not found")?
        .to_owned();

    Ok(Fixture {
        league: league.clone(),
        time: time.to_owned(),
        date: date.to_owned(),
        home: team_name(home)?,
        away: team_name(away)?,
        home_logo,
        url: absolute_url(Ball67::URL, href)?,
    })
}

fn team_name(team: ElementRef) -> anyhow::Result<TeamName> {
    Ok(stripped_text(
        team.select(selector!("div.flex-1"))
            .next()
            .context("Team name not found")?,
    )
    .into())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use scraper::Html;

    use super::{time_sort_key, Ball67, Fixture};
    use crate::{
        playlist::GroupEntries,
        site::{Site, TeamName},
    };

    fn fixture_html(href: &str, status: &str, home: &str, away: &str) -> String {
        format!(
            r#"<a href="{href}">
                <div class="match-status">{status}</div>
                <div class="space-y-3">
                    <div><img src="https://img/{home}.png"><div class="flex-1"> {home} </div></div>
                    <div><img src="https://img/{away}.png"><div class="flex-1">{away}</div></div>
                </div>
            </a>"#
        )
    }

    fn page(leagues: &[(&str, Vec<String>)]) -> Html {
        let blocks: String = leagues
            .iter()
            .map(|(name, fixtures)| {
                format!(
                    r#"<div class="rounded-xl">
                        <div class="bg-gradient-to-r"><h2> {name} </h2></div>
                        {}
                    </div>"#,
                    fixtures.concat()
                )
            })
            .collect();
        Html::parse_document(&format!(
            r#"<html><body><div id="livefixtures-wrapper"><div>{blocks}</div></div></body></html>"#
        ))
    }

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_fixtures_and_skips_broken_ones() {
        let html = page(&[(
            "Premier \n  League",
            vec![
                fixture_html("/live/1", "<span>19:30</span><span>01/02/25</span>", "Arsenal", "Chelsea"),
                fixture_html("/live/2", "<span>LIVE</span>", "Spurs", "Fulham"),
                fixture_html("/news/3", "<span>20:00</span><span>01/02/25</span>", "A", "B"),
            ],
        )]);
        let fixtures = Ball67::parse(&html, now());
        assert_eq!(
            fixtures,
            [Fixture {
                league: "Premier League".to_owned().into(),
                time: "19:30".to_owned(),
                date: "01/02/25".to_owned(),
                home: TeamName::from("Arsenal".to_owned()),
                away: TeamName::from("Chelsea".to_owned()),
                home_logo: "https://img/Arsenal.png".to_owned(),
                url: "https://ball67.com/live/1".to_owned(),
            }]
        );
    }

    #[test]
    fn status_split_on_newlines() {
        let html = page(&[(
            "Serie A",
            vec![fixture_html("/live/9", "\n 02:45 \n 03/02/25 \n", "Roma", "Lazio")],
        )]);
        let fixtures = Ball67::parse(&html, now());
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].time, "02:45");
        assert_eq!(fixtures[0].date, "03/02/25");
    }

    #[test]
    fn league_without_header_is_skipped() {
        let html = Html::parse_document(&format!(
            r#"<div id="livefixtures-wrapper"><div><div class="rounded-xl">{}</div></div></div>"#,
            fixture_html("/live/1", "<i>19:30</i><i>01/02/25</i>", "A", "B")
        ));
        assert!(Ball67::parse(&html, now()).is_empty());
    }

    #[test]
    fn groups_sorted_by_date_then_time() {
        let html = page(&[
            (
                "La Liga",
                vec![
                    fixture_html("/live/1", "<i>21:00</i><i>02/02/25</i>", "Real", "Getafe"),
                    fixture_html("/live/2", "<i>TBC</i><i>01/02/25</i>", "Betis", "Celta"),
                ],
            ),
            (
                "Bundesliga",
                vec![
                    fixture_html("/live/3", "<i>18:30</i><i>01/02/25</i>", "Bayern", "Mainz"),
                    fixture_html("/live/4", "<i>09:00</i><i>02/02/25</i>", "Koln", "Bochum"),
                ],
            ),
        ]);
        let playlist = Ball67::build_playlist(Ball67::parse(&html, now()), now());

        assert_eq!(playlist.name, "ball67 update @01/02/2025");
        assert_eq!(playlist.author, "Update@01/02/2025");
        assert_eq!(playlist.info, "ball67 Update@01/02/2025");
        let summary = playlist
            .groups
            .iter()
            .map(|g| {
                let GroupEntries::Stations(stations) = &g.entries else {
                    panic!("nested group")
                };
                (
                    g.name.as_str(),
                    stations.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                (
                    "วันที่ 01/02/25",
                    vec!["18:30 Bayern vs Mainz", "TBC Betis vs Celta"]
                ),
                (
                    "วันที่ 02/02/25",
                    vec!["09:00 Koln vs Bochum", "21:00 Real vs Getafe"]
                ),
            ]
        );
    }

    #[test]
    fn unreadable_dates_sort_last_in_first_seen_order() {
        let html = page(&[(
            "FA Cup",
            vec![
                fixture_html("/live/1", "<i>19:00</i><i>TBD</i>", "Leeds", "Hull"),
                fixture_html("/live/2", "<i>18:00</i><i>??</i>", "Stoke", "Derby"),
                fixture_html("/live/3", "<i>20:00</i><i>02/02/25</i>", "Wigan", "Bolton"),
            ],
        )]);
        let playlist = Ball67::build_playlist(Ball67::parse(&html, now()), now());
        let names = playlist.groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["วันที่ 02/02/25", "วันที่ TBD", "วันที่ ??"]);
    }

    #[test]
    fn unknown_time_sorts_last() {
        assert_eq!(time_sort_key("00:15"), 15);
        assert_eq!(time_sort_key("พักครึ่ง"), 23 * 60 + 59);
        assert!(time_sort_key("23:59") == time_sort_key("?"));
    }
}
