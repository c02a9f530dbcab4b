//! Card rasterisation through a headless browser.

use crate::config::RenderSettings;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Renders a standalone HTML page to a PNG file.
pub trait Rasterizer {
    fn rasterize(&self, name: &str, page: &str, output: &Path) -> Result<()>;
}

/// Chromium/Chrome `--headless --screenshot`.
#[derive(Debug, Clone)]
pub struct HeadlessBrowser {
    browser: String,
    timeout: Duration,
    width: u32,
    height: u32,
}

impl HeadlessBrowser {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            browser: settings.browser.clone(),
            timeout: settings.timeout(),
            width: settings.viewport_width,
            height: settings.viewport_height,
        }
    }

    fn command(&self, page_path: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.browser);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--default-background-color=00000000")
            .arg(format!("--window-size={},{}", self.width, self.height))
            .arg(format!("--screenshot={}", output.display()))
            .arg(format!("file://{}", page_path.display()));
        cmd
    }
}

impl Rasterizer for HeadlessBrowser {
    fn rasterize(&self, name: &str, page: &str, output: &Path) -> Result<()> {
        let render_error = |message: String| Error::Render {
            card: name.to_string(),
            message,
        };

        let work_dir = TempDir::with_prefix("badgesmith_card_")?;
        let page_path = work_dir.path().join("card.html");
        std::fs::write(&page_path, page)?;
        let log_path = work_dir.path().join("browser.log");
        let log = File::create(&log_path)?;

        let output = absolute(output)?;
        if output.exists() {
            std::fs::remove_file(&output)?;
        }

        let mut child = self
            .command(&page_path, &output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|e| render_error(format!("failed to launch '{}': {}", self.browser, e)))?;

        let status = match wait_with_timeout(&mut child, self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::RenderTimeout {
                    card: name.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        if !status.success() {
            let log = std::fs::read_to_string(&log_path).unwrap_or_default();
            let last = log.lines().last().unwrap_or("").trim();
            return Err(render_error(format!("browser exited with {}: {}", status, last)));
        }
        if !output.is_file() {
            return Err(render_error("browser produced no screenshot".to_string()));
        }

        tracing::debug!("Rendered {} to {}", name, output.display());
        Ok(())
    }
}

fn wait_with_timeout(
    child: &mut std::process::Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
