use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::domain::entities::UserProfile;
use crate::presentation::theme::Theme;

/// Voice view. Audio is not available in the terminal, so this only explains
/// where to go instead.
pub struct VoiceScreen<'a> {
    profile: &'a UserProfile,
    theme: &'a Theme,
}

impl<'a> VoiceScreen<'a> {
    #[must_use]
    pub const fn new(profile: &'a UserProfile, theme: &'a Theme) -> Self {
        Self { profile, theme }
    }
}

impl Widget for VoiceScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, content, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(area);

        let lines = vec![
            Line::from(Span::styled("☎  Voice Call", self.theme.title_style)),
            Line::default(),
            Line::from(format!(
                "Voice calls are not available in the terminal, {}.",
                self.profile.name()
            )),
            Line::default(),
            Line::from(Span::styled(
                "Switch to Chat (Alt+1) to keep talking with Luci.",
                self.theme.dimmed_style,
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content, buf);
    }
}
