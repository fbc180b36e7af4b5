//! ConversationView Widget
//!
//! A borderless, scrollable message list. Agent turns are left-aligned
//! behind a name prefix; user turns are right-aligned. The newest turn sits
//! at the bottom.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{StatefulWidget, Widget};
use textwrap::{wrap, Options};

use zenorb_core::TurnView;

use crate::theme::{CURSOR_GLOW, ORB_VIOLET, USER_GREEN};

/// Shown before the first line of an agent turn
pub const AGENT_PREFIX: &str = "Orb: ";

const REVEAL_CURSOR: &str = "▎";

/// State for a scrollable conversation
#[derive(Default)]
pub struct ConversationState {
    /// Scroll offset (lines from bottom, 0 = latest)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
}

impl ConversationState {
    /// Scroll by delta (positive = towards older lines)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Jump back to the newest line
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Wrap every turn to `width` columns
///
/// A blank line separates turns. A turn that is still revealing ends in a
/// cursor.
pub fn conversation_lines<'a>(
    views: impl IntoIterator<Item = TurnView<'a>>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }

    for view in views {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        if view.is_agent {
            push_agent(&mut lines, &view, width);
        } else {
            push_user(&mut lines, view.text, width);
        }
    }
    lines
}

fn push_agent(lines: &mut Vec<Line<'static>>, view: &TurnView<'_>, width: usize) {
    let style = Style::default().fg(ORB_VIOLET);
    let mut wrapped: Vec<Line<'static>> = if view.text.is_empty() {
        vec![Line::from(Span::styled(AGENT_PREFIX, style))]
    } else {
        // Reserve a column for the cursor so it never wraps alone
        let wrap_width = if view.is_revealing { width.saturating_sub(1).max(1) } else { width };
        let indent = " ".repeat(AGENT_PREFIX.len());
        let options = Options::new(wrap_width)
            .initial_indent(AGENT_PREFIX)
            .subsequent_indent(&indent);
        wrap(view.text, options)
            .into_iter()
            .map(|l| Line::from(Span::styled(l.into_owned(), style)))
            .collect()
    };

    if view.is_revealing {
        if let Some(last) = wrapped.last_mut() {
            last.push_span(Span::styled(REVEAL_CURSOR, Style::default().fg(CURSOR_GLOW)));
        }
    }
    lines.extend(wrapped);
}

fn push_user(lines: &mut Vec<Line<'static>>, text: &str, width: usize) {
    let style = Style::default().fg(USER_GREEN);
    lines.extend(wrap(text, width).into_iter().map(|l| {
        Line::from(Span::styled(l.into_owned(), style)).alignment(Alignment::Right)
    }));
}

/// A borderless, scrollable list of wrapped turns
pub struct ConversationView {
    lines: Vec<Line<'static>>,
}

impl ConversationView {
    pub fn new(lines: Vec<Line<'static>>) -> Self {
        Self { lines }
    }
}

impl StatefulWidget for ConversationView {
    type State = ConversationState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.total_lines = self.lines.len();

        // Clamp scroll
        let height = usize::from(area.height);
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let end = state.total_lines - state.scroll_offset;
        let start = end.saturating_sub(height);
        let visible = end - start;
        // Bottom-anchored: a short conversation hugs the input line
        let top = area.y + area.height - u16::try_from(visible).unwrap_or(area.height);

        for (i, line) in self.lines.into_iter().skip(start).take(visible).enumerate() {
            let y = top + u16::try_from(i).unwrap_or(0);
            line.render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn agent(text: &str, is_revealing: bool) -> TurnView<'_> {
        TurnView { is_agent: true, text, is_revealing }
    }

    fn user(text: &str) -> TurnView<'_> {
        TurnView { is_agent: false, text, is_revealing: false }
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_agent_turn_gets_prefix_and_indent() {
        let lines = conversation_lines([agent("one two three", false)], 12);
        assert_eq!(plain(&lines), vec!["Orb: one two", "     three"]);
    }

    #[test]
    fn test_revealing_turn_ends_in_cursor() {
        let lines = conversation_lines([agent("hel", true)], 40);
        assert_eq!(plain(&lines), vec!["Orb: hel▎"]);
    }

    #[test]
    fn test_empty_revealing_turn_shows_prefix_and_cursor() {
        let lines = conversation_lines([agent("", true)], 40);
        assert_eq!(plain(&lines), vec!["Orb: ▎"]);
    }

    #[test]
    fn test_user_turns_are_right_aligned_and_separated() {
        let lines = conversation_lines([user("hi"), agent("hello", false)], 40);
        assert_eq!(plain(&lines), vec!["hi", "", "Orb: hello"]);
        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        assert_eq!(lines[2].alignment, None);
    }

    #[test]
    fn test_zero_width_yields_nothing() {
        assert!(conversation_lines([user("hi")], 0).is_empty());
    }

    #[test]
    fn test_render_is_bottom_anchored() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let mut state = ConversationState::default();
        ConversationView::new(vec![Line::from("a")]).render(area, &mut buf, &mut state);

        assert_eq!(buf[(0, 2)].symbol(), "a");
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(state.total_lines, 1);
    }

    #[test]
    fn test_scroll_is_clamped_to_history() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut state = ConversationState { scroll_offset: 99, total_lines: 0 };
        let lines = vec![Line::from("1"), Line::from("2"), Line::from("3"), Line::from("4")];
        ConversationView::new(lines).render(area, &mut buf, &mut state);

        assert_eq!(state.scroll_offset, 2);
        assert_eq!(buf[(0, 0)].symbol(), "1");
        assert_eq!(buf[(0, 1)].symbol(), "2");
    }
}
