//! Small helpers shared by the scrapers, the activity generator and the store.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Strip line-break control characters and surrounding whitespace.
///
/// Line breaks are removed outright (not replaced by spaces), matching how
/// publisher markup splits words across lines only at tag boundaries.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_text("  Hello\r\nworld \n"), "Helloworld");
/// ```
pub fn sanitize_text(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Encode a search term the way most publisher search forms do: spaces become `+`.
pub fn plus_encode(term: &str) -> String {
    term.trim().replace(' ', "+")
}

/// Percent-encode a search term (`%20` for spaces).
pub fn percent_encode(term: &str) -> String {
    urlencoding::encode(term.trim()).into_owned()
}

/// Model replies and page bodies cut to `max` bytes for log fields, with the
/// dropped byte count appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create the store directory if needed and prove it accepts writes.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe = Path::new(path).join(".statewatch-probe");
    fs::write(&probe, b"").await?;
    if let Err(e) = fs::remove_file(&probe).await {
        debug!(error = %e, probe = %probe.display(), "Could not remove probe file");
    }
    info!("Store directory is writable");
    Ok(())
}
