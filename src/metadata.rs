use crate::session::SessionInfo;
use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub enum MetadataError {
    /// The prompt was dismissed (EOF or blank participant) before anything
    /// was created; the process exits without opening a window or a file.
    Cancelled,
    Io(io::Error),
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "session setup cancelled"),
            Self::Io(e) => write!(f, "cannot read session setup: {}", e),
        }
    }
}

impl Error for MetadataError {}

impl From<io::Error> for MetadataError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

fn read_field<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>, MetadataError> {
    write!(out, "{}: ", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

/// Blocking pre-session prompt on the plain terminal, before raw mode.
/// Collects participant identifier, timepoint, and administrator name.
/// EOF anywhere or a blank participant is cancellation. A blank timepoint
/// defaults to "1" so the filename stem stays well formed.
pub fn prompt_session_info<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
) -> Result<SessionInfo, MetadataError> {
    let participant = read_field(&mut input, &mut out, "Participant ID")?
        .filter(|p| !p.is_empty())
        .ok_or(MetadataError::Cancelled)?;
    let timepoint = read_field(&mut input, &mut out, "Timepoint")?
        .ok_or(MetadataError::Cancelled)?;
    let administrator = read_field(&mut input, &mut out, "RA Name")?
        .ok_or(MetadataError::Cancelled)?;

    let timepoint = if timepoint.is_empty() {
        "1".to_string()
    } else {
        timepoint
    };

    Ok(SessionInfo::new(&participant, &timepoint, &administrator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_collects_all_three_fields() {
        let input = b"p01\n2\nKB\n" as &[u8];
        let mut out = Vec::new();
        let info = prompt_session_info(input, &mut out).unwrap();
        assert_eq!(info.participant, "p01");
        assert_eq!(info.timepoint, "2");
        assert_eq!(info.administrator, "KB");

        let prompts = String::from_utf8(out).unwrap();
        assert!(prompts.contains("Participant ID"));
        assert!(prompts.contains("Timepoint"));
        assert!(prompts.contains("RA Name"));
    }

    #[test]
    fn test_blank_participant_cancels() {
        let input = b"\n2\nKB\n" as &[u8];
        assert_matches!(
            prompt_session_info(input, Vec::new()),
            Err(MetadataError::Cancelled)
        );
    }

    #[test]
    fn test_eof_cancels() {
        let input = b"p01\n" as &[u8];
        assert_matches!(
            prompt_session_info(input, Vec::new()),
            Err(MetadataError::Cancelled)
        );
    }

    #[test]
    fn test_blank_timepoint_defaults() {
        let input = b"p01\n\nKB\n" as &[u8];
        let info = prompt_session_info(input, Vec::new()).unwrap();
        assert_eq!(info.timepoint, "1");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let input = b"  p01  \n 2 \n KB \n" as &[u8];
        let info = prompt_session_info(input, Vec::new()).unwrap();
        assert_eq!(info.participant, "p01");
        assert_eq!(info.administrator, "KB");
    }
}
