//! Scrollable message container the controller renders into

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::message::ChatRole;

/// Handle to a rendered entry, used to remove transient entries later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Mirrors a message in the transcript
    Message,
    /// Transient "Thinking..." indicator while a reply is pending
    Placeholder,
    /// Failure notice shown to the user but never sent to the endpoint
    Notice,
}

#[derive(Debug, Clone)]
pub struct PanelEntry {
    pub id: EntryId,
    pub role: ChatRole,
    pub kind: EntryKind,
    pub lines: Vec<String>,
}

impl PanelEntry {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The chat panel: an ordered list of entries plus scroll position.
///
/// Appending an entry re-enables following the tail, so the newest entry is
/// brought into view on the next render.
#[derive(Debug)]
pub struct Panel {
    entries: Vec<PanelEntry>,
    next_id: u64,
    scroll: u16,
    follow_tail: bool,
    viewport_width: u16,
    viewport_height: u16,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            scroll: 0,
            follow_tail: true,
            viewport_width: 0,
            viewport_height: 0,
        }
    }

    /// Append an entry. Newlines split the content into separate display
    /// lines; the text is otherwise left as-is.
    pub fn append(&mut self, role: ChatRole, kind: EntryKind, content: &str) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        self.entries.push(PanelEntry {
            id,
            role,
            kind,
            lines: content.split('\n').map(str::to_string).collect(),
        });
        self.scroll_to_bottom();
        id
    }

    /// Remove an entry by id. Returns false if it was already gone.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.clamp_scroll();
        }
        removed
    }

    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&PanelEntry> {
        self.entries.last()
    }

    pub fn has_placeholder(&self) -> bool {
        self.entries.iter().any(|entry| entry.kind == EntryKind::Placeholder)
    }

    /// True if any entry's text contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.text().contains(needle))
    }

    // Scrolling

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Record the inner size of the area the panel is drawn into
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        if self.follow_tail {
            self.scroll = self.max_scroll();
        } else {
            self.clamp_scroll();
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow_tail = true;
        self.scroll = self.max_scroll();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_tail = self.scroll >= self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
        self.follow_tail = self.scroll >= self.max_scroll();
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_size());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_size());
    }

    fn page_size(&self) -> u16 {
        (self.viewport_height / 2).max(1)
    }

    fn max_scroll(&self) -> u16 {
        self.total_lines().saturating_sub(self.viewport_height)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Number of terminal rows the panel occupies once wrapped
    pub fn total_lines(&self) -> u16 {
        // Default to 50 columns until the first render reports the real width
        let wrap_width = if self.viewport_width > 0 {
            self.viewport_width as usize
        } else {
            50
        };

        let mut total: usize = 0;
        for entry in &self.entries {
            total += 1; // Role line ("You:" or "AI:")
            total += entry.lines.iter().map(|line| wrapped_rows(line, wrap_width)).sum::<usize>();
            total += 1; // Blank line after entry
        }
        total.min(u16::MAX as usize) as u16
    }
}

/// Rows a line occupies when word-wrapped to `width` columns. Widths are
/// display columns, so CJK characters and emoji count as two.
fn wrapped_rows(line: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut rows = 1;
    let mut col = 0;

    for word in line.split_inclusive(char::is_whitespace) {
        let word_width = UnicodeWidthStr::width(word);
        if col + word_width <= width {
            col += word_width;
        } else if col > 0 && UnicodeWidthStr::width(word.trim_end()) <= width {
            rows += 1;
            col = word_width.min(width);
        } else {
            // Longer than a row: broken at character boundaries
            for c in word.chars() {
                let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
                if col + char_width > width {
                    rows += 1;
                    col = 0;
                }
                col += char_width;
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_splits_newlines() {
        let mut panel = Panel::new();
        panel.append(ChatRole::Assistant, EntryKind::Message, "line one\nline two\n\nline four");
        let entry = panel.last().unwrap();
        assert_eq!(entry.lines, vec!["line one", "line two", "", "line four"]);
        assert_eq!(entry.text(), "line one\nline two\n\nline four");
    }

    #[test]
    fn test_append_keeps_markup_untouched() {
        let mut panel = Panel::new();
        panel.append(ChatRole::User, EntryKind::Message, "**bold** <b>tag</b>");
        assert_eq!(panel.last().unwrap().lines, vec!["**bold** <b>tag</b>"]);
    }

    #[test]
    fn test_append_empty_content_gives_one_line() {
        let mut panel = Panel::new();
        panel.append(ChatRole::Assistant, EntryKind::Message, "");
        assert_eq!(panel.last().unwrap().lines, vec![String::new()]);
    }

    #[test]
    fn test_append_twice_gives_two_entries() {
        let mut panel = Panel::new();
        let a = panel.append(ChatRole::User, EntryKind::Message, "same");
        let b = panel.append(ChatRole::User, EntryKind::Message, "same");
        assert_ne!(a, b);
        assert_eq!(panel.len(), 2);
    }

    #[test]
    fn test_remove_entry() {
        let mut panel = Panel::new();
        panel.append(ChatRole::User, EntryKind::Message, "question");
        let placeholder = panel.append(ChatRole::Assistant, EntryKind::Placeholder, "Thinking...");
        assert!(panel.has_placeholder());

        assert!(panel.remove(placeholder));
        assert!(!panel.has_placeholder());
        assert_eq!(panel.len(), 1);

        // Already removed
        assert!(!panel.remove(placeholder));
    }

    #[test]
    fn test_total_lines_wraps_long_lines() {
        let mut panel = Panel::new();
        panel.set_viewport(10, 5);
        panel.append(ChatRole::User, EntryKind::Message, &"x".repeat(25));
        // role line + 3 wrapped rows + blank line
        assert_eq!(panel.total_lines(), 5);
    }

    #[test]
    fn test_wrapped_rows_counts_display_width() {
        assert_eq!(wrapped_rows("", 20), 1);
        assert_eq!(wrapped_rows("hello world", 20), 1);
        // 60 double-width characters fill 6 rows of 20 columns, END takes a 7th
        let wide = format!("{}END", "漢".repeat(60));
        assert_eq!(wrapped_rows(&wide, 20), 7);
        // A wide character never straddles the right edge
        assert_eq!(wrapped_rows(&"漢".repeat(3), 5), 2);
    }

    #[test]
    fn test_wrapped_rows_moves_words_to_next_row() {
        assert_eq!(wrapped_rows("aaaa bbbb", 6), 2);
        assert_eq!(wrapped_rows("    indented", 20), 1);
    }

    #[test]
    fn test_wide_reply_scrolls_to_its_last_row() {
        let mut panel = Panel::new();
        panel.set_viewport(20, 9);
        let reply = format!("{}END", "漢".repeat(60));
        for _ in 0..2 {
            panel.append(ChatRole::User, EntryKind::Message, "q");
            panel.append(ChatRole::Assistant, EntryKind::Message, &reply);
        }
        // (3 + 9) rows per pair
        assert_eq!(panel.total_lines(), 24);
        assert_eq!(panel.scroll(), 15);
    }

    #[test]
    fn test_append_scrolls_to_newest_entry() {
        let mut panel = Panel::new();
        panel.set_viewport(40, 4);
        for i in 0..5 {
            panel.append(ChatRole::User, EntryKind::Message, &format!("message {}", i));
        }
        // 5 entries * 3 rows, 4 visible
        assert_eq!(panel.scroll(), 11);
    }

    #[test]
    fn test_manual_scroll_stops_following_until_bottom() {
        let mut panel = Panel::new();
        panel.set_viewport(40, 4);
        for i in 0..5 {
            panel.append(ChatRole::User, EntryKind::Message, &format!("message {}", i));
        }

        panel.scroll_up(5);
        assert_eq!(panel.scroll(), 6);
        panel.set_viewport(40, 4);
        assert_eq!(panel.scroll(), 6);

        panel.scroll_down(100);
        assert_eq!(panel.scroll(), 11);

        panel.append(ChatRole::Assistant, EntryKind::Message, "reply");
        assert_eq!(panel.scroll(), 14);
    }
}
