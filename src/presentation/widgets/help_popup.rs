use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::domain::keybinding::Keybind;
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::centered_area;
use crate::presentation::widgets::footer_bar::FooterBar;

pub struct HelpPopup<'a> {
    keybindings: &'a [Keybind],
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    #[must_use]
    pub const fn new(keybindings: &'a [Keybind], theme: &'a Theme) -> Self {
        Self { keybindings, theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        #[allow(clippy::cast_possible_truncation)]
        let height = (self.keybindings.len() as u16).saturating_add(2);
        let popup = centered_area(area, 44, height);
        Clear.render(popup, buf);

        let lines: Vec<Line> = self
            .keybindings
            .iter()
            .map(|binding| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:>8} ", FooterBar::format_key(&binding.key)),
                        self.theme.title_style,
                    ),
                    Span::raw(format!(" {}", binding.label)),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.accent))
                    .title(" Keys "),
            )
            .render(popup, buf);
    }
}
