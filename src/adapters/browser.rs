//! Opens a generated report with the platform's default handler.

use std::path::Path;
use std::process::Command;

use crate::domain::error::HhhlError;

/// Command that hands `path` to the desktop's default browser.
pub fn open_command(path: &Path) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    }
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

pub fn open_in_browser(path: &Path) -> Result<(), HhhlError> {
    let absolute = path.canonicalize()?;
    tracing::debug!(path = %absolute.display(), "opening report in browser");
    let status = open_command(&absolute).status()?;
    if !status.success() {
        return Err(HhhlError::Io(std::io::Error::other(format!(
            "browser launcher exited with {}",
            status
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_passes_report_path() {
        let cmd = open_command(Path::new("/tmp/result/report.html"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(
            args.last().and_then(|a| a.to_str()),
            Some("/tmp/result/report.html")
        );
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    #[test]
    fn linux_uses_xdg_open() {
        let cmd = open_command(Path::new("report.html"));
        assert_eq!(cmd.get_program(), "xdg-open");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = open_in_browser(Path::new("/nonexistent/report.html")).unwrap_err();
        assert!(matches!(err, HhhlError::Io(_)));
    }
}
