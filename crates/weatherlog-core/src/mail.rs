//! Mail interface and attachment selection

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A message with file attachments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// `From` address
    pub sender: String,
    /// Addresses the message goes to
    pub recipients: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub body: String,
    /// Files attached in this order
    pub attachments: Vec<PathBuf>,
    /// Put recipients into blind copy instead of `To`
    pub bcc: bool,
}

/// Errors that can occur while collecting or sending mail
#[derive(Error, Debug)]
pub enum MailError {
    /// An attachment or directory could not be read
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The message could not be handed over for delivery
    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Delivers messages
pub trait Mailer {
    /// Deliver `message` with its attachments
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Regular files in `dirs` whose names start with `prefix`, sorted by path
pub fn select_attachments(dirs: &[&Path], prefix: &str) -> Result<Vec<PathBuf>, MailError> {
    let mut selected = Vec::new();
    for dir in dirs {
        let entries = fs::read_dir(dir).map_err(|e| MailError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| MailError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(prefix))
                .unwrap_or(false);
            if matches && path.is_file() {
                selected.push(path);
            }
        }
    }
    selected.sort();
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_select_attachments_by_prefix() {
        let images = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        fs::write(images.path().join("2024-10-27_Temperature.svg"), "x").unwrap();
        fs::write(images.path().join("2024-10-26_Temperature.svg"), "x").unwrap();
        fs::write(data.path().join("2024-10-27_weather.txt"), "x").unwrap();
        fs::write(data.path().join("continuous_weather.txt"), "x").unwrap();
        fs::create_dir(data.path().join("2024-10-27_dir")).unwrap();

        let selected = select_attachments(&[images.path(), data.path()], "2024-10-27").unwrap();
        let names: Vec<&str> = selected
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"2024-10-27_Temperature.svg"));
        assert!(names.contains(&"2024-10-27_weather.txt"));
    }

    #[test]
    fn test_select_attachments_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            select_attachments(&[missing.as_path()], "x"),
            Err(MailError::Io { .. })
        ));
    }
}
