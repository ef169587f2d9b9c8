use std::{ffi::OsStr, path::PathBuf, thread::sleep, time::Duration};

use anyhow::Context;
use headless_chrome::{Browser, LaunchOptionsBuilder};
use log::{debug, info};
use typed_builder::TypedBuilder;

/// How to wait for a page before taking its HTML.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RenderOptions {
    pub user_agent: &'static str,
    /// CSS selector of an element whose presence means the page has loaded.
    #[builder(default = "body")]
    pub wait_for: &'static str,
    #[builder(default = Duration::from_secs(30))]
    pub wait_timeout: Duration,
    /// Extra time for client-side scripts after `wait_for` appears.
    #[builder(default = Duration::from_secs(3))]
    pub settle: Duration,
    /// Scroll to the bottom once, then settle again, for lazily loaded lists.
    #[builder(default = false)]
    pub scroll_to_bottom: bool,
    #[builder(default = (1920, 1080))]
    pub window_size: (u32, u32),
}

#[derive(Clone, Debug, Default)]
pub struct LaunchConfig {
    pub chrome_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub sandbox: bool,
}

/// Loads `url` in a fresh headless Chrome and returns the rendered document.
///
/// The browser process is killed when `Browser` is dropped, so it does not
/// outlive this call even if waiting for the page fails.
pub fn render(url: &str, options: &RenderOptions, launch: &LaunchConfig) -> anyhow::Result<String> {
    let user_agent_arg = format!("--user-agent={}", options.user_agent);
    let args = [
        "--disable-dev-shm-usage",
        "--disable-blink-features=AutomationControlled",
        user_agent_arg.as_str(),
    ]
    .map(OsStr::new);

    let browser = Browser::new(
        LaunchOptionsBuilder::default()
            .headless(true)
            .sandbox(launch.sandbox)
            .window_size(Some(options.window_size))
            .port(launch.port)
            .path(launch.chrome_path.clone())
            .args(args.to_vec())
            .build()?,
    )
    .context("Failed to launch Chrome")?;
    let tab = browser.new_tab().context("Failed to open a tab")?;
    tab.set_user_agent(options.user_agent, None, None)?;

    info!("Navigating to {url}");
    tab.navigate_to(url)
        .with_context(|| format!("Failed to navigate to {url}"))?;
    tab.wait_for_element_with_custom_timeout(options.wait_for, options.wait_timeout)
        .with_context(|| {
            format!(
                "`{}` did not appear on {url} within {:?}",
                options.wait_for, options.wait_timeout
            )
        })?;
    sleep(options.settle);

    if options.scroll_to_bottom {
        debug!("Scrolling to the bottom of {url}");
        tab.evaluate("window.scrollTo(0, document.body.scrollHeight);", false)?;
        sleep(options.settle);
    }

    let html = tab.get_content()?;
    info!("Rendered {url} ({} bytes)", html.len());
    Ok(html)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RenderOptions;

    #[test]
    fn defaults() {
        let options = RenderOptions::builder().user_agent("UA").build();
        assert_eq!(options.wait_for, "body");
        assert_eq!(options.wait_timeout, Duration::from_secs(30));
        assert_eq!(options.settle, Duration::from_secs(3));
        assert!(!options.scroll_to_bottom);
        assert_eq!(options.window_size, (1920, 1080));
    }
}
