//! Navigation sidebar, docked or shown as a drawer.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::domain::entities::{AppView, UserProfile};
use crate::presentation::theme::Theme;

/// Columns taken by the sidebar.
pub const SIDEBAR_WIDTH: u16 = 26;

const fn icon(view: AppView) -> &'static str {
    match view {
        AppView::Chat => "✉",
        AppView::Voice => "☎",
        AppView::Profile => "☺",
    }
}

/// Sidebar listing the views and the current profile.
pub struct Sidebar<'a> {
    active: AppView,
    highlighted: Option<AppView>,
    profile: &'a UserProfile,
    theme: &'a Theme,
    drawer: bool,
}

impl<'a> Sidebar<'a> {
    #[must_use]
    pub const fn new(active: AppView, profile: &'a UserProfile, theme: &'a Theme) -> Self {
        Self {
            active,
            highlighted: None,
            profile,
            theme,
            drawer: false,
        }
    }

    /// Highlights the entry under the keyboard cursor.
    #[must_use]
    pub const fn highlight(mut self, view: Option<AppView>) -> Self {
        self.highlighted = view;
        self
    }

    /// Renders floating over the content instead of docked beside it.
    #[must_use]
    pub const fn overlay(mut self) -> Self {
        self.drawer = true;
        self
    }

    fn nav_line(&self, view: AppView) -> Line<'static> {
        let is_active = view == self.active;
        let is_highlighted = self.highlighted == Some(view);

        let marker = if is_active { "▌" } else { " " };
        let style = if is_highlighted {
            self.theme.selection_style
        } else if is_active {
            self.theme.title_style
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(marker, self.theme.title_style),
            Span::styled(format!(" {}  {}", icon(view), view.label()), style),
        ])
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.drawer {
            Clear.render(area, buf);
        }

        let block = if self.drawer {
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.accent))
        } else {
            Block::default()
                .borders(Borders::RIGHT)
                .border_style(self.theme.dimmed_style)
        };
        let inner = block.inner(area);
        block.render(area, buf);

        let [header, _, nav, profile_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(inner);

        Paragraph::new(vec![
            Line::from(Span::styled(
                " LUCI",
                self.theme.title_style.add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(" AI COMPANION", self.theme.dimmed_style)),
        ])
        .render(header, buf);

        let nav_lines: Vec<Line> = AppView::ALL
            .iter()
            .flat_map(|&view| [self.nav_line(view), Line::default()])
            .collect();
        Paragraph::new(nav_lines).render(nav, buf);

        Paragraph::new(vec![
            Line::from(Span::styled(
                format!(" {}", self.profile.name()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", self.profile.personality_preference()),
                self.theme.dimmed_style,
            )),
        ])
        .render(profile_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_lists_every_view_and_profile_name() {
        let theme = Theme::default();
        let mut profile = UserProfile::default();
        profile.rename("Mina");
        let area = Rect::new(0, 0, SIDEBAR_WIDTH, 20);
        let mut buf = Buffer::empty(area);

        Sidebar::new(AppView::Voice, &profile, &theme).render(area, &mut buf);

        let text = rendered_text(&buf);
        for view in AppView::ALL {
            assert!(text.contains(view.label()), "missing {view}");
        }
        assert!(text.contains("Mina"));
    }
}
