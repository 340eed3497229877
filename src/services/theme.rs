use crate::models::settings_types::{AppSettings, Theme};
use colored::{Color, ColoredString, Colorize};
use tokio::sync::watch;

/// Presentation-side observer of the settings: keeps the applied theme in step
/// with `darkMode`.
pub struct ThemeBinding {
    rx: watch::Receiver<AppSettings>,
    applied: Theme,
}

impl ThemeBinding {
    pub fn new(mut rx: watch::Receiver<AppSettings>) -> Self {
        let applied = rx.borrow_and_update().theme();
        Self { rx, applied }
    }

    pub fn theme(&self) -> Theme {
        self.applied
    }

    /// Picks up any settings change published since the last call. Returns the
    /// new theme when it differs from the one applied.
    pub fn refresh(&mut self) -> Option<Theme> {
        if !self.rx.has_changed().unwrap_or(false) {
            return None;
        }
        let theme = self.rx.borrow_and_update().theme();
        self.apply(theme)
    }

    /// Waits for the next theme change. Returns `None` once the settings
    /// publisher is gone.
    pub async fn changed(&mut self) -> Option<Theme> {
        loop {
            self.rx.changed().await.ok()?;
            let theme = self.rx.borrow_and_update().theme();
            if let Some(theme) = self.apply(theme) {
                return Some(theme);
            }
        }
    }

    fn apply(&mut self, theme: Theme) -> Option<Theme> {
        if theme == self.applied {
            return None;
        }
        self.applied = theme;
        tracing::info!(theme = ?theme, "theme applied");
        Some(theme)
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.applied)
    }
}

/// Terminal colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub alert: Color,
    pub clean: Color,
    pub muted: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                accent: Color::Green,
                alert: Color::Red,
                clean: Color::Green,
                muted: Color::BrightBlack,
            },
            Theme::Dark => Self {
                accent: Color::BrightGreen,
                alert: Color::BrightRed,
                clean: Color::BrightGreen,
                muted: Color::White,
            },
        }
    }

    pub fn accent(&self, text: &str) -> ColoredString {
        text.color(self.accent).bold()
    }

    pub fn alert(&self, text: &str) -> ColoredString {
        text.color(self.alert)
    }

    pub fn clean(&self, text: &str) -> ColoredString {
        text.color(self.clean)
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        text.color(self.muted)
    }
}
