//! Opening directory pages in a browser.
//!
//! Purely cosmetic: the session logs failures and carries on.

use crate::{Error, Result};
use std::process::{Command, Stdio};

/// Something that can show a URL to the user.
pub trait UrlOpener {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL could not be handed off.
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let status = Self::command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::operation("open_browser", e))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::operation(
                "open_browser",
                format!("browser launcher exited with {status}"),
            ))
        }
    }
}

/// Opener that does nothing, for debug mode and `--no-browser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOpener;

impl UrlOpener for NoopOpener {
    fn open(&self, url: &str) -> Result<()> {
        tracing::trace!(url, "Browser disabled, not opening");
        Ok(())
    }
}
