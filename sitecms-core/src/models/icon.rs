//! Icon choices used by the content model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident),+ $(,)? } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownIcon;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownIcon(s.to_string()))
            }
        }
    };
}

/// Error returned when parsing an icon name that is not in the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown icon name: {0}")]
pub struct UnknownIcon(pub String);

named_enum! {
    /// Built-in icons for the floating action buttons.
    FloatingIcon { WhatsApp, Bot, ArrowUp, Message, Support, Chat, Question } default WhatsApp
}

named_enum! {
    /// Social network icons.
    SocialIcon {
        Twitter, GitHub, LinkedIn, Facebook, Instagram, YouTube, Dribbble, Behance,
        TikTok, Pinterest, Discord, Vimeo, Telegram,
    } default Twitter
}

named_enum! {
    /// Icons for "about us" value records.
    ValueIcon { Lightbulb, UsersGroup, ShieldCheck } default Lightbulb
}

named_enum! {
    /// Icons for "why choose us" feature records.
    FeatureIcon { Innovation, Quality, Partnership } default Innovation
}

/// Icon shown on a floating action button.
///
/// Stored as `{"type": "pre-built", "value": "<name>"}` or
/// `{"type": "url", "value": "<url or data uri>"}`. Custom values are not
/// validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum IconSetting {
    #[serde(rename = "pre-built")]
    PreBuilt(FloatingIcon),
    #[serde(rename = "url")]
    Custom(String),
}

impl IconSetting {
    /// Pre-built setting; the first choice offered when switching from a URL.
    pub fn pre_built() -> Self {
        IconSetting::PreBuilt(FloatingIcon::WhatsApp)
    }

    /// Custom setting with no URL yet.
    pub fn custom() -> Self {
        IconSetting::Custom(String::new())
    }

    pub fn is_pre_built(&self) -> bool {
        matches!(self, IconSetting::PreBuilt(_))
    }
}

impl Default for IconSetting {
    fn default() -> Self {
        Self::pre_built()
    }
}

impl fmt::Display for IconSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconSetting::PreBuilt(icon) => write!(f, "pre-built: {}", icon),
            IconSetting::Custom(url) if url.starts_with("data:") => {
                write!(f, "url: <data uri, {} bytes>", url.len())
            }
            IconSetting::Custom(url) => write!(f, "url: {}", url),
        }
    }
}
