// src/domain/theme.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual style applied to a note in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Theme {
    #[default]
    Vanilla,
    Chocolate,
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Vanilla, Theme::Chocolate, Theme::Dark, Theme::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Vanilla => "vanilla",
            Theme::Chocolate => "chocolate",
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Vanilla => "Vanilla",
            Theme::Chocolate => "Chocolate",
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    /// Background and foreground colours as CSS hex strings
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Vanilla => ("#fffaf0", "#3b3b3b"),
            Theme::Chocolate => ("#3e2723", "#fff8e1"),
            Theme::Dark => ("#1f2937", "#e5e7eb"),
            Theme::Light => ("#ffffff", "#111827"),
        }
    }

    /// Map any stored value onto a known theme, unknown values become vanilla
    pub fn parse_lenient(value: Option<&str>) -> Theme {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl From<Option<String>> for Theme {
    fn from(value: Option<String>) -> Self {
        Theme::parse_lenient(value.as_deref())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown theme '{}', expected one of: vanilla, chocolate, dark, light",
                    s
                )
            })
    }
}
