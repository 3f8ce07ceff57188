//! Conversation transcript widget.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::domain::entities::Message;
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::{format_timestamp, wrap_text};

const COMPANION_NAME: &str = "Luci";
const INDENT: &str = "  ";

/// Transcript rendered bottom-up, newest message last.
pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    scroll: usize,
    timestamp_format: Option<&'a str>,
    awaiting_reply: bool,
}

impl<'a> MessageList<'a> {
    #[must_use]
    pub const fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
            timestamp_format: None,
            awaiting_reply: false,
        }
    }

    /// Lines scrolled up from the bottom.
    #[must_use]
    pub const fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub const fn timestamps(mut self, format: Option<&'a str>) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub const fn awaiting_reply(mut self, awaiting: bool) -> Self {
        self.awaiting_reply = awaiting;
        self
    }

    /// Lays out every message for the given width.
    #[must_use]
    pub fn build_lines(&self, width: u16) -> Vec<Line<'a>> {
        let body_width = usize::from(width).saturating_sub(INDENT.len()).max(1);
        let mut lines = Vec::new();

        for message in self.messages {
            let (author, style) = if message.is_from_user() {
                ("You", self.theme.user_style)
            } else {
                (COMPANION_NAME, self.theme.model_style)
            };

            let mut header = vec![Span::styled(author, style)];
            if let Some(format) = self.timestamp_format {
                header.push(Span::styled(
                    format!("  {}", format_timestamp(message.timestamp(), format)),
                    self.theme.dimmed_style,
                ));
            }
            lines.push(Line::from(header));

            lines.extend(
                wrap_text(message.content(), body_width)
                    .into_iter()
                    .map(|text| Line::from(format!("{INDENT}{text}"))),
            );
            lines.push(Line::default());
        }

        if self.awaiting_reply {
            lines.push(Line::from(Span::styled(
                format!("{COMPANION_NAME} is typing…"),
                self.theme.dimmed_style.add_modifier(Modifier::ITALIC),
            )));
        }

        lines
    }

    /// Returns the largest useful scroll offset for a viewport.
    #[must_use]
    pub fn max_scroll(&self, area: Rect) -> usize {
        self.build_lines(area.width)
            .len()
            .saturating_sub(usize::from(area.height))
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.messages.is_empty() && !self.awaiting_reply {
            let y = area.y + area.height / 2;
            Paragraph::new(Line::from(Span::styled(
                format!("Say hello to {COMPANION_NAME} to start chatting."),
                self.theme.dimmed_style,
            )))
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, y, area.width, 1), buf);
            return;
        }

        let lines = self.build_lines(area.width);
        let height = usize::from(area.height);
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);
        let end = lines.len() - scroll;
        let start = end.saturating_sub(height);

        Paragraph::new(lines[start..end].to_vec())
            .style(Style::default())
            .render(area, buf);
    }
}
