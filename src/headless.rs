//! Headless helpers: JSON output on stdout, no terminal UI

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sqlcoach_app::session_identity::SessionInfo;
use sqlcoach_core::segment;

/// Print the segmentation of a text file as pretty JSON
pub fn print_segments(path: &Path, out: &mut impl Write) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::to_writer_pretty(&mut *out, &segment(&text))?;
    writeln!(out)?;
    Ok(())
}

/// Print the session description as pretty JSON
pub fn print_session(info: &SessionInfo, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, info)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcoach_app::SessionIdentity;
    use tempfile::tempdir;

    #[test]
    fn test_print_segments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answer.md");
        std::fs::write(&path, "Try this:\n```sql\nSELECT 1\n```\nDone.").unwrap();

        let mut out = Vec::new();
        print_segments(&path, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let segments = json.as_array().unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1]["content"], "SELECT 1");
    }

    #[test]
    fn test_print_segments_missing_file() {
        let dir = tempdir().unwrap();
        let mut out = Vec::new();
        let err = print_segments(&dir.path().join("nope.md"), &mut out).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_print_session() {
        let identity = SessionIdentity::ephemeral();
        let id = identity.get_id();

        let mut out = Vec::new();
        print_session(&identity.session_info(), &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["user_id"], id.as_str());
        assert!(json["client"]["timestamp"].is_string());
    }
}
