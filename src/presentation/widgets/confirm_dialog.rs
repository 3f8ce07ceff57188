//! Confirmation dialog for destructive profile actions.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::application::DangerAction;
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::centered_area;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 8;

/// Modal asking the user to confirm a pending [`DangerAction`].
pub struct ConfirmDialog<'a> {
    action: DangerAction,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    #[must_use]
    pub const fn new(action: DangerAction, theme: &'a Theme) -> Self {
        Self { action, theme }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_area(area, DIALOG_WIDTH, DIALOG_HEIGHT);
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.danger_style)
            .title(format!(" {} ", self.action.title()))
            .title_alignment(Alignment::Center);
        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let [prompt_area, _, hint_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(self.action.prompt())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White))
            .render(prompt_area, buf);

        let hint = Line::from(vec![
            Span::styled(" y ", self.theme.selection_style),
            Span::raw(" Confirm    "),
            Span::styled(
                " n/Esc ",
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Cancel"),
        ]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(hint_area, buf);
    }
}
