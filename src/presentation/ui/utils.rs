use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Returns a `width` x `height` rect centered in `area`, clamped to fit.
#[must_use]
pub fn centered_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

const FALLBACK_TIMESTAMP_FORMAT: &str = "%H:%M";

/// Formats a UTC timestamp in local time.
///
/// A format chrono cannot render falls back to `HH:MM`.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>, format: &str) -> String {
    let local = timestamp.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_ok() {
        return out;
    }
    local.format(FALLBACK_TIMESTAMP_FORMAT).to_string()
}

/// Greedy word wrap by display width.
///
/// Existing line breaks are kept; words wider than `width` are split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(current_width > 0);

            if current_width + gap + word_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if current_width + char_width > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
