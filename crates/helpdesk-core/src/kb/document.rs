use crate::clock::Clock;
use chrono::{DateTime, Local};
use std::ops::Range;
use tracing::info;

/// Content a fresh knowledgebase document starts with.
pub const WELCOME_CONTENT: &str = "# Welcome to the Knowledgebase\n\nStart editing this document...";

/// The single document behind the knowledgebase editor.
///
/// Lives as long as the editor view; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgebaseDocument {
    pub content: String,
    preview_mode: bool,
    last_saved_at: Option<DateTime<Local>>,
}

impl Default for KnowledgebaseDocument {
    fn default() -> Self {
        Self::new(WELCOME_CONTENT)
    }
}

impl KnowledgebaseDocument {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            preview_mode: false,
            last_saved_at: None,
        }
    }

    pub fn toggle_preview(&mut self) {
        self.preview_mode = !self.preview_mode;
    }

    #[must_use]
    pub const fn preview_mode(&self) -> bool {
        self.preview_mode
    }

    /// Record a save at the clock's current time. There is no backing
    /// store; the timestamp is the only effect.
    pub fn save(&mut self, clock: &dyn Clock) -> DateTime<Local> {
        let now = clock.now();
        info!(
            chars = self.content.chars().count(),
            at = %now.format("%H:%M:%S"),
            "knowledgebase document saved"
        );
        self.last_saved_at = Some(now);
        now
    }

    #[must_use]
    pub const fn last_saved_at(&self) -> Option<DateTime<Local>> {
        self.last_saved_at
    }

    /// Number of characters in the document.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Surround the characters in `start..end` with `prefix` and `suffix`.
    ///
    /// Offsets count characters, are clamped to the content and reordered if
    /// reversed. Returns the range now covering the originally selected
    /// text, shifted right by the prefix length.
    pub fn wrap_selection(
        &mut self,
        start: usize,
        end: usize,
        prefix: &str,
        suffix: &str,
    ) -> Range<usize> {
        let len = self.char_len();
        let (start, end) = (start.min(len), end.min(len));
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        let start_byte = byte_index_at_char(&self.content, start);
        let end_byte = byte_index_at_char(&self.content, end);
        let mut wrapped =
            String::with_capacity(self.content.len() + prefix.len() + suffix.len());
        wrapped.push_str(&self.content[..start_byte]);
        wrapped.push_str(prefix);
        wrapped.push_str(&self.content[start_byte..end_byte]);
        wrapped.push_str(suffix);
        wrapped.push_str(&self.content[end_byte..]);
        self.content = wrapped;

        let shift = prefix.chars().count();
        (start + shift)..(end + shift)
    }
}

/// Byte offset of the `char_idx`-th character, or the string length past the end.
#[must_use]
pub fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;

    #[test]
    fn starts_with_welcome_text() {
        let doc = KnowledgebaseDocument::default();
        assert_eq!(
            doc.content,
            "# Welcome to the Knowledgebase\n\nStart editing this document..."
        );
        assert!(!doc.preview_mode());
        assert!(doc.last_saved_at().is_none());
    }

    #[test]
    fn toggle_twice_restores_preview_mode() {
        let mut doc = KnowledgebaseDocument::default();
        let before = doc.preview_mode();
        doc.toggle_preview();
        assert_ne!(doc.preview_mode(), before);
        doc.toggle_preview();
        assert_eq!(doc.preview_mode(), before);
    }

    #[test]
    fn save_records_the_clock_time_only() {
        let at = Local
            .with_ymd_and_hms(2024, 2, 29, 8, 30, 0)
            .single()
            .expect("unambiguous local time");
        let mut doc = KnowledgebaseDocument::new("body");
        let saved = doc.save(&FixedClock::new(at));
        assert_eq!(saved, at);
        assert_eq!(doc.last_saved_at(), Some(at));
        assert_eq!(doc.content, "body");
        assert!(!doc.preview_mode());
    }

    #[test]
    fn wraps_leading_word_in_bold_markers() {
        let mut doc = KnowledgebaseDocument::new("Hello world");
        let selection = doc.wrap_selection(0, 5, "**", "**");
        assert_eq!(doc.content, "**Hello** world");
        assert_eq!(selection, 2..7);
        assert_eq!(&doc.content[selection], "Hello");
    }

    #[test]
    fn wraps_middle_selection() {
        let mut doc = KnowledgebaseDocument::new("Hello world");
        let selection = doc.wrap_selection(4, 8, "_", "_");
        assert_eq!(doc.content, "Hell_o wo_rld");
        assert_eq!(selection, 5..9);
    }

    #[test]
    fn empty_selection_inserts_markers_at_cursor() {
        let mut doc = KnowledgebaseDocument::new("abc");
        let selection = doc.wrap_selection(3, 3, "`", "`");
        assert_eq!(doc.content, "abc``");
        assert_eq!(selection, 4..4);
    }

    #[test]
    fn reversed_and_out_of_range_offsets_are_normalised() {
        let mut doc = KnowledgebaseDocument::new("abc");
        let selection = doc.wrap_selection(99, 1, "[", "]");
        assert_eq!(doc.content, "a[bc]");
        assert_eq!(selection, 2..4);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let mut doc = KnowledgebaseDocument::new("héllo wörld");
        let selection = doc.wrap_selection(6, 11, "**", "**");
        assert_eq!(doc.content, "héllo **wörld**");
        assert_eq!(selection, 8..13);
    }
}
