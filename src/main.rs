use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use football_playlist::{chrono_util::bangkok_now, config::Config, site::SiteId};
use log::{error, info};

#[derive(Parser)]
struct Opts {
    #[command(subcommand)]
    sub: Sub,
}

#[derive(Subcommand)]
enum Sub {
    /// Render sites in headless Chrome and write their playlists.
    Scrape(Scrape),
    /// Build a playlist from a saved page.
    Parse(Parse),
}

#[derive(Args)]
struct Scrape {
    /// Sites to scrape; all of them when omitted.
    #[arg(value_enum)]
    sites: Vec<SiteId>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long)]
    chrome_path: Option<PathBuf>,
    /// Remote debugging port for Chrome.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args)]
struct Parse {
    #[arg(value_enum)]
    site: SiteId,
    html_file: PathBuf,
    /// Write the playlist here instead of printing it.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.sub {
        Sub::Scrape(sub) => scrape(sub),
        Sub::Parse(sub) => parse(sub),
    }
}

fn scrape(opts: Scrape) -> anyhow::Result<()> {
    let mut config = Config::load(opts.config.as_deref())?;
    if opts.output_dir.is_some() {
        config.output_dir = opts.output_dir;
    }
    if opts.chrome_path.is_some() {
        config.chrome_path = opts.chrome_path;
    }
    if opts.port.is_some() {
        config.remote_debugging_port = opts.port;
    }
    let output_dir = config.output_dir();
    let launch = config.launch_config();

    let sites = if opts.sites.is_empty() {
        vec![SiteId::Ball67, SiteId::Dooballfree, SiteId::Dookeela]
    } else {
        opts.sites
    };
    let mut failed = vec![];
    for site in sites {
        match site.scrape(&launch, &output_dir, bangkok_now()) {
            Ok(path) => info!("{site:?}: done, {path:?}"),
            Err(e) => {
                error!("{site:?}: {e:#}");
                failed.push(site);
            }
        }
    }
    if !failed.is_empty() {
        bail!("Failed to scrape {failed:?}");
    }
    Ok(())
}

fn parse(opts: Parse) -> anyhow::Result<()> {
    let html = fs_err::read_to_string(&opts.html_file)?;
    let playlist = opts.site.playlist_from_html(&html, bangkok_now());
    match opts.output {
        Some(path) => {
            let dir = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(opts.site.output_file());
            let path = playlist.save(dir, file_name)?;
            info!("Successfully saved playlist to {path:?}.");
        }
        None => println!("{}", serde_json::to_string_pretty(&playlist)?),
    }
    Ok(())
}
