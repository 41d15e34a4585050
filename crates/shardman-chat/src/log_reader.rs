//! Game chat log tailing.

use std::path::Path;

use tracing::{debug, warn};

/// Read the most recent chat lines from the cluster chat log.
///
/// The dashboard refreshes this on every paint, so the function stays cheap
/// and infallible: a missing or unreadable file yields placeholder lines
/// instead of an error, and an empty log yields a friendly hint.
pub fn recent_chat_lines(chat_log: &Path, max_lines: usize) -> Vec<String> {
    if !chat_log.exists() {
        return vec![format!(
            "Chat log not found at {}. Make sure the server is running.",
            chat_log.display()
        )];
    }

    let contents = match std::fs::read_to_string(chat_log) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %chat_log.display(), error = %e, "failed to read chat log");
            return vec![format!("Error reading chat log: {e}")];
        }
    };

    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return vec!["No chat messages yet.".to_string()];
    }

    let start = lines.len().saturating_sub(max_lines);
    debug!(total = lines.len(), shown = lines.len() - start, "chat tail");
    lines[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_log_yields_placeholder() {
        let lines = recent_chat_lines(Path::new("/nonexistent/server_chat_log.txt"), 10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Chat log not found"));
    }

    #[test]
    fn test_empty_log_yields_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server_chat_log.txt");
        std::fs::write(&path, "\n\n").unwrap();
        assert_eq!(recent_chat_lines(&path, 10), vec!["No chat messages yet."]);
    }

    #[test]
    fn test_tail_keeps_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server_chat_log.txt");
        let contents: String = (1..=10).map(|i| format!("[Say] line {i}\n")).collect();
        std::fs::write(&path, contents).unwrap();

        let lines = recent_chat_lines(&path, 3);
        assert_eq!(
            lines,
            vec!["[Say] line 8", "[Say] line 9", "[Say] line 10"]
        );
    }

    #[test]
    fn test_short_log_returned_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server_chat_log.txt");
        std::fs::write(&path, "[Join] wilson\n").unwrap();
        assert_eq!(recent_chat_lines(&path, 50), vec!["[Join] wilson"]);
    }
}
