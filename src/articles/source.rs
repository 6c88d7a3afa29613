//! Known feed sources
//!
//! The raw `source` key on an article is resolved once into a closed
//! [`Source`] enum. Unknown keys fall back to [`Source::Other`], whose
//! visual theme is derived from the article title.

use serde::Serialize;

/// A feed source resolved from its raw key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    HackerNews,
    BensBites,
    AiRundown,
    Reddit,
    Other(String),
}

/// Icon shown for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceIcon {
    Newspaper,
    Zap,
    MessageCircle,
}

/// Two-stop linear gradient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub from: String,
    pub to: String,
}

impl Gradient {
    fn hex(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Deterministic gradient derived from a title
    pub fn from_title(title: &str) -> Self {
        let hash = title_hash(title);
        let hue1 = (hash % 360).unsigned_abs();
        let hue2 = (hue1 + 60) % 360;
        Self {
            from: format!("hsl({}, 70%, 50%)", hue1),
            to: format!("hsl({}, 70%, 30%)", hue2),
        }
    }
}

/// Visual configuration for a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTheme {
    pub accent: &'static str,
    pub icon: SourceIcon,
    pub gradient: Gradient,
}

const DEFAULT_ACCENT: &str = "#BFF549";

impl Source {
    /// Resolve a raw source key
    pub fn from_key(key: &str) -> Self {
        match key {
            "hacker_news" | "hacker_news_ai" => Self::HackerNews,
            "bens_bites" => Self::BensBites,
            "ai_rundown" => Self::AiRundown,
            "reddit" => Self::Reddit,
            other => Self::Other(other.to_string()),
        }
    }

    /// Human-readable label: underscores become spaces, words are capitalised
    pub fn label_for(key: &str) -> String {
        key.split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Theme for this source; `title` seeds the fallback gradient
    pub fn theme(&self, title: &str) -> SourceTheme {
        match self {
            Self::HackerNews => SourceTheme {
                accent: "#ff6600",
                icon: SourceIcon::MessageCircle,
                gradient: Gradient::hex("#ff6600", "#cc5200"),
            },
            Self::BensBites => SourceTheme {
                accent: "#BFF549",
                icon: SourceIcon::Zap,
                gradient: Gradient::hex("#BFF549", "#8BC34A"),
            },
            Self::AiRundown => SourceTheme {
                accent: "#60a5fa",
                icon: SourceIcon::Newspaper,
                gradient: Gradient::hex("#60a5fa", "#3b82f6"),
            },
            Self::Reddit => SourceTheme {
                accent: "#ff4500",
                icon: SourceIcon::MessageCircle,
                gradient: Gradient::hex("#ff4500", "#cc3700"),
            },
            Self::Other(_) => SourceTheme {
                accent: DEFAULT_ACCENT,
                icon: SourceIcon::Newspaper,
                gradient: Gradient::from_title(title),
            },
        }
    }
}

/// 32-bit rolling hash over UTF-16 code units (`h = c + (h << 5) - h`)
fn title_hash(title: &str) -> i32 {
    title.encode_utf16().fold(0i32, |hash, unit| {
        (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}
