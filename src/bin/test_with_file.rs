use std::path::PathBuf;

use clap::Parser;
use football_playlist::{
    chrono_util::bangkok_now,
    site::{Ball67, Dooballfree, Dookeela, Site, SiteId},
};
use scraper::Html;

#[derive(Parser)]
struct Opts {
    #[arg(value_enum)]
    site: SiteId,
    input_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(opts.input_file)?);
    match opts.site {
        SiteId::Ball67 => show::<Ball67>(&html),
        SiteId::Dooballfree => show::<Dooballfree>(&html),
        SiteId::Dookeela => show::<Dookeela>(&html),
    }
    Ok(())
}

fn show<S: Site>(html: &Html) {
    let now = bangkok_now();
    let matches = S::parse(html, now);
    println!("{}: {} matches", S::ID, matches.len());
    for m in &matches {
        println!("  {m:?}");
    }
    let playlist = S::build_playlist(matches, now);
    for group in &playlist.groups {
        println!("{} ({} stations)", group.name, group.station_count());
    }
}
