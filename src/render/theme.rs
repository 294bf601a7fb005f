use std::collections::HashMap;

use crossterm::style::Color;

use crate::model::task::{OVERDUE_TAG, Priority};

/// Palette for colorized task lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Punctuation, creation date, comments and deferred tasks
    pub neutral: Color,
    /// Priority `A`
    pub priority_high: Color,
    /// Priorities `B` and `C`
    pub priority_mid: Color,
    /// Priorities `D`..`Z`
    pub priority_low: Color,
    pub due_date: Color,
    pub project: Color,
    pub project_seq: Color,
    pub tag: Color,
    /// The derived `OVERDUE` tag
    pub overdue: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            neutral: Color::White,
            priority_high: Color::Red,
            priority_mid: Color::Yellow,
            priority_low: Color::Green,
            due_date: Color::Magenta,
            project: Color::Blue,
            project_seq: Color::Cyan,
            tag: Color::Green,
            overdue: Color::Red,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}

impl Theme {
    /// Create a theme from the config `[colors]` table, falling back to
    /// defaults for missing or unparsable entries
    pub fn from_config(colors: &HashMap<String, String>) -> Self {
        let mut theme = Theme::default();

        for (key, value) in colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "neutral" => theme.neutral = color,
                    "priority_a" => theme.priority_high = color,
                    "priority_bc" => theme.priority_mid = color,
                    "priority_other" => theme.priority_low = color,
                    "due_date" => theme.due_date = color,
                    "project" => theme.project = color,
                    "project_seq" => theme.project_seq = color,
                    "tag" => theme.tag = color,
                    "overdue" => theme.overdue = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Get the color for a priority letter
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority.letter() {
            'A' => self.priority_high,
            'B' | 'C' => self.priority_mid,
            _ => self.priority_low,
        }
    }

    /// Get the color for a tag
    pub fn tag_color(&self, tag: &str) -> Color {
        if tag == OVERDUE_TAG {
            self.overdue
        } else {
            self.tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb {
                r: 0xFF,
                g: 0x44,
                b: 0x44
            })
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
    }

    #[test]
    fn test_from_config_overrides() {
        let mut colors = HashMap::new();
        colors.insert("priority_a".to_string(), "#112233".to_string());
        colors.insert("tag".to_string(), "not a color".to_string());
        colors.insert("unknown".to_string(), "#000000".to_string());

        let theme = Theme::from_config(&colors);
        assert_eq!(
            theme.priority_high,
            Color::Rgb {
                r: 0x11,
                g: 0x22,
                b: 0x33
            }
        );
        // Unchanged defaults still present
        assert_eq!(theme.tag, Color::Green);
        assert_eq!(theme.neutral, Color::White);
    }

    #[test]
    fn test_priority_color() {
        let theme = Theme::default();
        let p = |c| Priority::from_char(c).unwrap();
        assert_eq!(theme.priority_color(p('A')), Color::Red);
        assert_eq!(theme.priority_color(p('B')), Color::Yellow);
        assert_eq!(theme.priority_color(p('C')), Color::Yellow);
        assert_eq!(theme.priority_color(p('D')), Color::Green);
        assert_eq!(theme.priority_color(p('Z')), Color::Green);
    }

    #[test]
    fn test_tag_color() {
        let theme = Theme::default();
        assert_eq!(theme.tag_color("OVERDUE"), Color::Red);
        assert_eq!(theme.tag_color("WORK"), Color::Green);
    }
}
