use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::PageRenderer;
use crate::config::BrowserConfig;
use crate::error::ScrapeError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);
const BROWSER_EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Locate a Chrome/Chromium binary: configured path first, then PATH.
pub fn find_chromium(configured: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.clone());
        }
        warn!("Configured chrome executable {} does not exist", path.display());
    }

    ["google-chrome", "chromium", "chromium-browser"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Renders pages in a fresh Chromium instance per call.
pub struct ChromiumRenderer {
    settings: BrowserConfig,
}

impl ChromiumRenderer {
    pub fn new(settings: BrowserConfig) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str, ready_selector: &str) -> Result<String, ScrapeError> {
        let session = ChromiumSession::launch(&self.settings).await?;
        let result = session.render(url, ready_selector, &self.settings).await;
        session.close().await;
        result
    }
}

/// A running browser process and the task pumping its CDP events.
///
/// Must be finished with `close`; if it is dropped instead (panic,
/// cancelled future) chromiumoxide kills the child process.
struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    async fn launch(settings: &BrowserConfig) -> Result<Self, ScrapeError> {
        let mut builder = LaunchConfig::builder()
            .request_timeout(settings.navigation_timeout())
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if !settings.headless {
            builder = builder.with_head();
        }

        match find_chromium(settings.chrome_executable.as_ref()) {
            Some(path) => {
                debug!("Using browser executable {}", path.display());
                builder = builder.chrome_executable(path);
            }
            None => debug!("No browser found on PATH, deferring to chromiumoxide detection"),
        }

        let config = builder.build().map_err(ScrapeError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {}", e);
                }
            }
        });

        info!("Browser launched (headless: {})", settings.headless);
        Ok(Self { browser, handler })
    }

    async fn render(
        &self,
        url: &str,
        ready_selector: &str,
        settings: &BrowserConfig,
    ) -> Result<String, ScrapeError> {
        let navigation_error = |reason: String| ScrapeError::Navigation {
            url: url.to_string(),
            reason,
        };

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        info!("Navigating to {}", url);
        let nav_timeout = settings.navigation_timeout();
        match timeout(nav_timeout, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(navigation_error(e.to_string())),
            Err(_) => return Err(navigation_error(format!("timed out after {:?}", nav_timeout))),
        }
        if let Err(e) = page.wait_for_navigation().await {
            debug!("Waiting for navigation to settle failed: {}", e);
        }

        wait_for_selector(&page, ready_selector, settings.render_wait()).await;

        let html = page
            .content()
            .await
            .map_err(|e| navigation_error(format!("could not read page content: {}", e)))?;

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        Ok(html)
    }

    async fn close(mut self) {
        shutdown(&mut self.browser, BROWSER_EXIT_TIMEOUT).await;
        self.handler.abort();
        info!("Browser closed");
    }
}

/// The parts of a browser process that shutdown needs.
#[async_trait]
trait BrowserProcess: Send {
    /// Ask the browser to exit through CDP.
    async fn request_close(&mut self) -> Result<(), String>;
    async fn wait_exit(&mut self) -> std::io::Result<()>;
    async fn force_kill(&mut self);
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn request_close(&mut self) -> Result<(), String> {
        self.close().await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn wait_exit(&mut self) -> std::io::Result<()> {
        self.wait().await.map(|_| ())
    }

    async fn force_kill(&mut self) {
        if let Some(Err(e)) = self.kill().await {
            warn!("Failed to kill browser process: {}", e);
        }
    }
}

/// Close the browser, killing it if the close request fails or the process
/// outlives `exit_timeout`. Never waits unbounded on the child.
async fn shutdown<P: BrowserProcess + ?Sized>(process: &mut P, exit_timeout: Duration) {
    if let Err(e) = process.request_close().await {
        warn!("Failed to close browser cleanly, killing it: {}", e);
        process.force_kill().await;
    }

    match timeout(exit_timeout, process.wait_exit()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to wait for browser exit: {}", e),
        Err(_) => {
            warn!("Browser still running after {:?}, killing it", exit_timeout);
            process.force_kill().await;
        }
    }
}

/// Poll until `selector` matches or `max_wait` elapses. Running out of time
/// is not an error: a page with no card rows is a valid, empty result.
async fn wait_for_selector(page: &Page, selector: &str, max_wait: Duration) {
    let started = Instant::now();

    loop {
        if page.find_element(selector).await.is_ok() {
            debug!("{} appeared after {:?}", selector, started.elapsed());
            return;
        }
        if started.elapsed() >= max_wait {
            warn!("{} did not appear within {:?}, using page as rendered", selector, max_wait);
            return;
        }
        sleep(READY_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in process that only exits once closed or killed.
    #[derive(Default)]
    struct FakeProcess {
        close_fails: bool,
        ignores_close: bool,
        closed: bool,
        kills: usize,
    }

    #[async_trait]
    impl BrowserProcess for FakeProcess {
        async fn request_close(&mut self) -> Result<(), String> {
            if self.close_fails {
                return Err("channel closed".to_string());
            }
            self.closed = !self.ignores_close;
            Ok(())
        }

        async fn wait_exit(&mut self) -> std::io::Result<()> {
            if self.closed || self.kills > 0 {
                Ok(())
            } else {
                std::future::pending().await
            }
        }

        async fn force_kill(&mut self) {
            self.kills += 1;
        }
    }

    #[tokio::test]
    async fn clean_close_does_not_kill() {
        let mut process = FakeProcess::default();
        shutdown(&mut process, Duration::from_millis(50)).await;
        assert_eq!(process.kills, 0);
    }

    #[tokio::test]
    async fn failed_close_kills_before_waiting() {
        let mut process = FakeProcess {
            close_fails: true,
            ..Default::default()
        };
        timeout(Duration::from_secs(5), shutdown(&mut process, Duration::from_secs(60)))
            .await
            .expect("shutdown blocked on a live browser");
        assert_eq!(process.kills, 1);
    }

    #[tokio::test]
    async fn browser_that_never_exits_is_killed_after_timeout() {
        let mut process = FakeProcess {
            ignores_close: true,
            ..Default::default()
        };
        timeout(Duration::from_secs(5), shutdown(&mut process, Duration::from_millis(50)))
            .await
            .expect("shutdown did not give up waiting");
        assert_eq!(process.kills, 1);
    }

    #[test]
    fn missing_configured_executable_is_ignored() {
        let bogus = PathBuf::from("/definitely/not/a/browser");
        let found = find_chromium(Some(&bogus));
        assert_ne!(found, Some(bogus));
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn renders_script_generated_rows() {
        let settings = BrowserConfig {
            headless: true,
            render_wait_secs: 5,
            navigation_timeout_secs: 20,
            chrome_executable: None,
        };
        let renderer = ChromiumRenderer::new(settings);

        let url = "data:text/html,<div id='root'></div><script>\
                   document.getElementById('root').innerHTML = \
                   '<div class=\"text-row\"><p class=\"centerText\">Goblin</p></div>';\
                   </script>";
        let html = renderer.render(url, "div.text-row").await.expect("render failed");

        assert!(html.contains("centerText"));
        assert!(html.contains("Goblin"));
    }
}
