//! Full-screen viewer for journal output.
//!
//! The viewer holds a static snapshot of lines fetched when it was opened;
//! it never follows the journal live. Scrolling is tracked as a line
//! offset from the top and clamped lazily against the viewport height at
//! render time, since the terminal can resize while the viewer is open.

/// A static page of log lines with a scroll offset.
#[derive(Debug, Clone)]
pub struct LogView {
    /// Shard whose journal is shown, used for the title.
    pub shard: String,
    lines: Vec<String>,
    offset: usize,
}

impl LogView {
    pub fn new(shard: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            shard: shard.into(),
            lines,
            offset: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Scroll toward older output, clamping at the first line.
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Scroll toward newer output. Unbounded here; the render-time clamp
    /// pulls the offset back within range.
    pub fn scroll_down(&mut self) {
        self.offset += 1;
    }

    /// The offset adjusted so the viewport never scrolls past the end.
    pub fn clamped_offset(&self, viewport_height: usize) -> usize {
        let max = self.lines.len().saturating_sub(viewport_height);
        self.offset.min(max)
    }

    /// Normalize the stored offset against the current viewport so a
    /// subsequent `scroll_up` takes effect immediately instead of eating
    /// through overshoot.
    pub fn clamp_to(&mut self, viewport_height: usize) {
        self.offset = self.clamped_offset(viewport_height);
    }

    /// The slice of lines visible in a viewport of the given height.
    pub fn visible(&self, viewport_height: usize) -> &[String] {
        let start = self.clamped_offset(viewport_height);
        let end = (start + viewport_height).min(self.lines.len());
        &self.lines[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(n: usize) -> LogView {
        LogView::new("Master", (0..n).map(|i| format!("line {i}")).collect())
    }

    #[test]
    fn test_scroll_up_clamps_at_top() {
        let mut v = view(10);
        v.scroll_up();
        assert_eq!(v.clamped_offset(5), 0);
    }

    #[test]
    fn test_scroll_down_clamps_at_end() {
        let mut v = view(10);
        for _ in 0..100 {
            v.scroll_down();
        }
        // 10 lines, 4 visible: the last valid top offset is 6.
        assert_eq!(v.clamped_offset(4), 6);
        assert_eq!(v.visible(4).first().map(String::as_str), Some("line 6"));
        assert_eq!(v.visible(4).last().map(String::as_str), Some("line 9"));
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut v = view(3);
        v.scroll_down();
        v.scroll_down();
        assert_eq!(v.clamped_offset(10), 0);
        assert_eq!(v.visible(10).len(), 3);
    }

    #[test]
    fn test_resize_reclamps_without_mutation() {
        let mut v = view(20);
        for _ in 0..50 {
            v.scroll_down();
        }
        // A taller viewport allows a smaller maximum offset.
        assert_eq!(v.clamped_offset(5), 15);
        assert_eq!(v.clamped_offset(18), 2);
        // After normalization a single scroll_up is visible immediately.
        v.clamp_to(5);
        v.scroll_up();
        assert_eq!(v.clamped_offset(5), 14);
    }

    #[test]
    fn test_empty_view() {
        let v = view(0);
        assert_eq!(v.clamped_offset(10), 0);
        assert!(v.visible(10).is_empty());
    }
}
