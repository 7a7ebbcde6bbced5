use std::io::Write;

use super::{describe, Action};
use crate::error::ActionError;
use crate::models::Notification;

/// Opens a URL in the system's default browser.
pub fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();

    #[cfg(target_os = "linux")]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    let result: std::io::Result<std::process::Child> = Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Unsupported platform",
    ));

    result.map(|_| ())
}

/// Opens the subject page, or the repository page when there is none.
pub struct OpenAction {
    launcher: fn(&str) -> std::io::Result<()>,
}

impl Default for OpenAction {
    fn default() -> Self {
        Self::with_launcher(open_in_browser)
    }
}

impl OpenAction {
    pub fn with_launcher(launcher: fn(&str) -> std::io::Result<()>) -> Self {
        Self { launcher }
    }
}

impl Action for OpenAction {
    fn run(&self, n: &mut Notification, _: &[String], out: &mut dyn Write) -> Result<(), ActionError> {
        let url = n.web_url().ok_or_else(|| ActionError::MissingUrl {
            id: n.id.clone(),
            what: "web URL",
        })?;
        (self.launcher)(url).map_err(ActionError::Browser)?;
        writeln!(out, "opened {}: {}", url, describe(n))?;
        Ok(())
    }
}
