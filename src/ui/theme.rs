use crossterm::style::{Attribute, Color, ContentStyle};
use ratatui::style::{Color as TuiColor, Modifier, Style};

// ── Helpers ─────────────────────────────────────────────────────────────

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: ((hex >> 16) & 0xFF) as u8,
        g: ((hex >>  8) & 0xFF) as u8,
        b: ( hex        & 0xFF) as u8,
    }
}

const fn tui_rgb(hex: u32) -> TuiColor {
    TuiColor::Rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >>  8) & 0xFF) as u8,
        ( hex        & 0xFF) as u8,
    )
}

fn fg(color: Color) -> ContentStyle {
    ContentStyle { foreground_color: Some(color), ..ContentStyle::default() }
}

fn bold(mut style: ContentStyle) -> ContentStyle {
    style.attributes.set(Attribute::Bold);
    style
}

// ── Theme variant selector ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeVariant {
    Default,
    Dracula,
    Mono,
}

impl ThemeVariant {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::Dracula,
            "mono"    => Self::Mono,
            _         => Self::Default,
        }
    }
}

// ── Theme struct ────────────────────────────────────────────────────────

/// Console and chart styling. Built once at startup and passed around
/// by reference; nothing in here changes afterwards.
#[derive(Debug, Clone)]
pub struct Theme {
    // console
    pub header: ContentStyle,
    pub title:  ContentStyle,
    pub item:   ContentStyle,
    pub info:   ContentStyle,
    pub accent: ContentStyle,
    pub ok:     ContentStyle,
    pub warn:   ContentStyle,
    pub fail:   ContentStyle,
    pub dim:    ContentStyle,

    // charts
    pub chart_border: Style,
    pub chart_title:  Style,
    pub chart_text:   Style,
    pub chart_used:   Style,
    pub chart_free:   Style,
    pub chart_cpu:    Style,
    pub chart_mem:    Style,
}

impl Theme {
    pub fn for_variant(v: ThemeVariant) -> Self {
        match v {
            ThemeVariant::Default => Self::classic(),
            ThemeVariant::Dracula => Self::dracula(),
            ThemeVariant::Mono    => Self::mono(),
        }
    }

    /// Bright ANSI palette that works on any color terminal.
    pub fn classic() -> Self {
        Self {
            header: fg(Color::Magenta),
            title:  bold(ContentStyle::default()),
            item:   fg(Color::Green),
            info:   fg(Color::Cyan),
            accent: fg(Color::Blue),
            ok:     fg(Color::Green),
            warn:   fg(Color::Yellow),
            fail:   fg(Color::Red),
            dim:    fg(Color::DarkGrey),

            chart_border: Style::default().fg(TuiColor::DarkGray),
            chart_title:  Style::default().fg(TuiColor::White).add_modifier(Modifier::BOLD),
            chart_text:   Style::default().fg(TuiColor::Gray),
            chart_used:   Style::default().fg(TuiColor::LightBlue),
            chart_free:   Style::default().fg(TuiColor::LightGreen),
            chart_cpu:    Style::default().fg(TuiColor::Blue),
            chart_mem:    Style::default().fg(tui_rgb(0xffa500)),
        }
    }

    fn dracula() -> Self {
        // https://draculatheme.com/
        // fg: #f8f8f2  comment: #6272a4  cyan: #8be9fd  green: #50fa7b
        // yellow: #f1fa8c  orange: #ffb86c  pink: #ff79c6  purple: #bd93f9  red: #ff5555
        Self {
            header: fg(rgb(0xff79c6)),
            title:  bold(fg(rgb(0xf8f8f2))),
            item:   fg(rgb(0x50fa7b)),
            info:   fg(rgb(0x8be9fd)),
            accent: fg(rgb(0xbd93f9)),
            ok:     fg(rgb(0x50fa7b)),
            warn:   fg(rgb(0xf1fa8c)),
            fail:   fg(rgb(0xff5555)),
            dim:    fg(rgb(0x6272a4)),

            chart_border: Style::default().fg(tui_rgb(0x6272a4)),
            chart_title:  Style::default().fg(tui_rgb(0xf8f8f2)).add_modifier(Modifier::BOLD),
            chart_text:   Style::default().fg(tui_rgb(0xf8f8f2)),
            chart_used:   Style::default().fg(tui_rgb(0x8be9fd)),
            chart_free:   Style::default().fg(tui_rgb(0x50fa7b)),
            chart_cpu:    Style::default().fg(tui_rgb(0xbd93f9)),
            chart_mem:    Style::default().fg(tui_rgb(0xffb86c)),
        }
    }

    /// No colors at all; for dumb terminals and captured output.
    pub fn mono() -> Self {
        let plain = ContentStyle::default();
        Self {
            header: plain,
            title:  plain,
            item:   plain,
            info:   plain,
            accent: plain,
            ok:     plain,
            warn:   plain,
            fail:   plain,
            dim:    plain,

            chart_border: Style::default(),
            chart_title:  Style::default().add_modifier(Modifier::BOLD),
            chart_text:   Style::default(),
            chart_used:   Style::default(),
            chart_free:   Style::default(),
            chart_cpu:    Style::default(),
            chart_mem:    Style::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(ThemeVariant::from_name("Dracula"), ThemeVariant::Dracula);
        assert_eq!(ThemeVariant::from_name("MONO"), ThemeVariant::Mono);
        assert_eq!(ThemeVariant::from_name("solarized"), ThemeVariant::Default);
    }

    #[test]
    fn mono_output_has_no_escapes() {
        let theme = Theme::mono();
        assert_eq!(theme.ok.apply("done").to_string(), "done");
    }

    #[test]
    fn classic_styles_carry_colors() {
        let theme = Theme::classic();
        assert_eq!(theme.fail.foreground_color, Some(Color::Red));
        assert!(theme.fail.apply("boom").to_string().contains("boom"));
    }
}
