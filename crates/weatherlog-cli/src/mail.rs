//! Mail delivery through a local `sendmail`
//!
//! The message is assembled as `multipart/mixed` with an HTML body and one
//! base64 part per attachment, then piped to `sendmail -t`, which takes the
//! recipients from the headers.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Local;
use tracing::debug;
use weatherlog_core::mail::{MailError, MailMessage, Mailer};

const BOUNDARY: &str = "weatherlog-part-boundary";
const LINE_WIDTH: usize = 76;

/// Sends mail by piping it to a sendmail-compatible program
#[derive(Debug, Clone)]
pub struct SendmailMailer {
    program: PathBuf,
}

impl SendmailMailer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Mailer for SendmailMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let raw = build_message(message)?;

        let mut child = Command::new(&self.program)
            .arg("-t")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MailError::Io {
                path: self.program.clone(),
                source: e,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MailError::Transport("Failed to get sendmail stdin".to_string()))?;
        stdin.write_all(raw.as_bytes()).map_err(|e| MailError::Io {
            path: self.program.clone(),
            source: e,
        })?;
        drop(stdin);

        let output = child.wait_with_output().map_err(|e| MailError::Io {
            path: self.program.clone(),
            source: e,
        })?;
        if !output.status.success() {
            return Err(MailError::Transport(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!(
            "Mail '{}' sent to {} recipients with {} attachments",
            message.subject,
            message.recipients.len(),
            message.attachments.len()
        );
        Ok(())
    }
}

/// Assemble the complete MIME message
pub fn build_message(message: &MailMessage) -> Result<String, MailError> {
    let recipients = message.recipients.join(", ");
    let mut out = String::new();

    out.push_str(&format!("From: {}\r\n", message.sender));
    if message.bcc {
        out.push_str(&format!("To: {}\r\n", message.sender));
        out.push_str(&format!("Bcc: {}\r\n", recipients));
    } else {
        out.push_str(&format!("To: {}\r\n", recipients));
    }
    out.push_str(&format!("Subject: {}\r\n", message.subject));
    out.push_str(&format!("Date: {}\r\n", Local::now().to_rfc2822()));
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
        BOUNDARY
    ));

    out.push_str(&format!("--{}\r\n", BOUNDARY));
    out.push_str("Content-Type: text/html; charset=utf-8\r\n");
    out.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
    out.push_str(&message.body);
    out.push_str("\r\n");

    for path in &message.attachments {
        let data = fs::read(path).map_err(|e| MailError::Io {
            path: path.clone(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        out.push_str(&format!("--{}\r\n", BOUNDARY));
        out.push_str(&format!(
            "Content-Type: {}; name=\"{}\"\r\n",
            content_type(path),
            name
        ));
        out.push_str("Content-Transfer-Encoding: base64\r\n");
        out.push_str(&format!(
            "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
            name
        ));
        let encoded = STANDARD.encode(&data);
        for line in encoded.as_bytes().chunks(LINE_WIDTH).map(String::from_utf8_lossy) {
            out.push_str(&line);
            out.push_str("\r\n");
        }
    }
    out.push_str(&format!("--{}--\r\n", BOUNDARY));
    Ok(out)
}

/// MIME type of an attachment, guessed from its extension
fn content_type(path: &Path) -> String {
    mime_guess2::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
