//! Scalar fields addressable by name.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::DraftError;
use crate::models::{ContentState, GlowAnimation, MediaType, ThemeSettings};

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = DraftError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|field| field.name() == s)
                    .ok_or_else(|| DraftError::UnknownField(s.to_string()))
            }
        }
    };
}

field_enum! {
    /// Single-valued content fields.
    pub enum ContentField {
        SiteName => "site-name",
        Tagline => "tagline",
        TitlePrefix => "title-prefix",
        TitleWords => "title-words",
        TitleSuffix => "title-suffix",
        WhatsAppNumber => "whatsapp-number",
        AiModel => "ai-model",
        HeaderLogo => "header-logo",
        FooterLogo => "footer-logo",
        AboutIntroduction => "about-introduction",
        AboutMission => "about-mission",
        AboutVision => "about-vision",
        AboutMediaUrl => "about-media-url",
        AboutMediaType => "about-media-type",
        WhyChooseUsTitle => "why-choose-us-title",
        ProjectsTitle => "projects-title",
        PrivacyTitle => "privacy-title",
        PrivacyUpdated => "privacy-updated",
        PrivacyContent => "privacy-content",
        TermsTitle => "terms-title",
        TermsUpdated => "terms-updated",
        TermsContent => "terms-content",
        ContactEmail => "contact-email",
        ContactPhone => "contact-phone",
        ContactAddress => "contact-address",
        ContactMapUrl => "contact-map-url",
        ContactFormRecipient => "contact-form-recipient",
    }
}

field_enum! {
    /// Theme settings.
    pub enum ThemeField {
        PrimaryColor => "primary-color",
        SecondaryColor => "secondary-color",
        TitleColorStart => "title-color-start",
        TitleColorEnd => "title-color-end",
        Font => "font",
        LightTextColor => "light-text-color",
        DarkTextColor => "dark-text-color",
        LightHeadingColor => "light-heading-color",
        DarkHeadingColor => "dark-heading-color",
        LightBgColor => "light-bg-color",
        DarkBgColor => "dark-bg-color",
        GlowColor => "glow-color",
        GlowAnimation => "glow-animation",
    }
}

impl ContentField {
    pub fn get(&self, content: &ContentState) -> String {
        use ContentField::*;
        match self {
            SiteName => content.site_name.clone(),
            Tagline => content.tagline.clone(),
            TitlePrefix => content.dynamic_title.prefix.clone(),
            TitleWords => content.dynamic_title.rotating_words.join(", "),
            TitleSuffix => content.dynamic_title.suffix.clone(),
            WhatsAppNumber => content.whats_app_number.clone(),
            AiModel => content.ai_model.clone(),
            HeaderLogo => content.logos.header.clone(),
            FooterLogo => content.logos.footer.clone(),
            AboutIntroduction => content.about_us.introduction.clone(),
            AboutMission => content.about_us.mission.clone(),
            AboutVision => content.about_us.vision.clone(),
            AboutMediaUrl => content.about_us.media_url.clone(),
            AboutMediaType => content.about_us.media_type.to_string(),
            WhyChooseUsTitle => content.why_choose_us.title.clone(),
            ProjectsTitle => content.latest_projects.title.clone(),
            PrivacyTitle => content.privacy_policy.title.clone(),
            PrivacyUpdated => content.privacy_policy.last_updated.clone(),
            PrivacyContent => content.privacy_policy.content.clone(),
            TermsTitle => content.terms_of_service.title.clone(),
            TermsUpdated => content.terms_of_service.last_updated.clone(),
            TermsContent => content.terms_of_service.content.clone(),
            ContactEmail => content.contact_info.email.clone(),
            ContactPhone => content.contact_info.phone.clone(),
            ContactAddress => content.contact_info.address.clone(),
            ContactMapUrl => content.contact_info.map_embed_url.clone(),
            ContactFormRecipient => content.contact_form_recipient_email.clone(),
        }
    }

    /// Validates `value` and stores it. `content` is untouched on error.
    pub(crate) fn apply(&self, content: &mut ContentState, value: &str) -> Result<(), DraftError> {
        use ContentField::*;
        let field = self.name();
        match self {
            SiteName => content.site_name = value.to_string(),
            Tagline => content.tagline = value.to_string(),
            TitlePrefix => content.dynamic_title.prefix = value.to_string(),
            TitleWords => content.dynamic_title.set_rotating_words_csv(value),
            TitleSuffix => content.dynamic_title.suffix = value.to_string(),
            WhatsAppNumber => content.whats_app_number = value.trim().to_string(),
            AiModel => content.ai_model = value.trim().to_string(),
            HeaderLogo => content.logos.header = value.to_string(),
            FooterLogo => content.logos.footer = value.to_string(),
            AboutIntroduction => content.about_us.introduction = value.to_string(),
            AboutMission => content.about_us.mission = value.to_string(),
            AboutVision => content.about_us.vision = value.to_string(),
            AboutMediaUrl => content.about_us.media_url = value.to_string(),
            AboutMediaType => {
                content.about_us.media_type = value
                    .parse::<MediaType>()
                    .map_err(|e| DraftError::invalid(field, e.to_string()))?
            }
            WhyChooseUsTitle => content.why_choose_us.title = value.to_string(),
            ProjectsTitle => content.latest_projects.title = value.to_string(),
            PrivacyTitle => content.privacy_policy.title = value.to_string(),
            PrivacyUpdated => content.privacy_policy.last_updated = parse_date(field, value)?,
            PrivacyContent => content.privacy_policy.content = value.to_string(),
            TermsTitle => content.terms_of_service.title = value.to_string(),
            TermsUpdated => content.terms_of_service.last_updated = parse_date(field, value)?,
            TermsContent => content.terms_of_service.content = value.to_string(),
            ContactEmail => content.contact_info.email = parse_email(field, value)?,
            ContactPhone => content.contact_info.phone = value.to_string(),
            ContactAddress => content.contact_info.address = value.to_string(),
            ContactMapUrl => content.contact_info.map_embed_url = value.trim().to_string(),
            ContactFormRecipient => {
                content.contact_form_recipient_email = parse_email(field, value)?
            }
        }
        Ok(())
    }
}

impl ThemeField {
    pub fn get(&self, theme: &ThemeSettings) -> String {
        match self {
            ThemeField::PrimaryColor => theme.primary_color.clone(),
            ThemeField::SecondaryColor => theme.secondary_color.clone(),
            ThemeField::TitleColorStart => theme.dynamic_title_color_start.clone(),
            ThemeField::TitleColorEnd => theme.dynamic_title_color_end.clone(),
            ThemeField::Font => theme.font.clone(),
            ThemeField::LightTextColor => theme.light_mode_text_color.clone(),
            ThemeField::DarkTextColor => theme.dark_mode_text_color.clone(),
            ThemeField::LightHeadingColor => theme.light_mode_heading_color.clone(),
            ThemeField::DarkHeadingColor => theme.dark_mode_heading_color.clone(),
            ThemeField::LightBgColor => theme.light_mode_bg_color.clone(),
            ThemeField::DarkBgColor => theme.dark_mode_bg_color.clone(),
            ThemeField::GlowColor => theme.glow_color.clone(),
            ThemeField::GlowAnimation => theme.glow_animation.to_string(),
        }
    }

    pub(crate) fn apply(&self, theme: &mut ThemeSettings, value: &str) -> Result<(), DraftError> {
        let field = self.name();
        let slot = match self {
            ThemeField::Font => {
                if value.trim().is_empty() {
                    return Err(DraftError::invalid(field, "font cannot be empty"));
                }
                theme.font = value.trim().to_string();
                return Ok(());
            }
            ThemeField::GlowAnimation => {
                theme.glow_animation = value
                    .parse::<GlowAnimation>()
                    .map_err(|e| DraftError::invalid(field, e.to_string()))?;
                return Ok(());
            }
            ThemeField::PrimaryColor => &mut theme.primary_color,
            ThemeField::SecondaryColor => &mut theme.secondary_color,
            ThemeField::TitleColorStart => &mut theme.dynamic_title_color_start,
            ThemeField::TitleColorEnd => &mut theme.dynamic_title_color_end,
            ThemeField::LightTextColor => &mut theme.light_mode_text_color,
            ThemeField::DarkTextColor => &mut theme.dark_mode_text_color,
            ThemeField::LightHeadingColor => &mut theme.light_mode_heading_color,
            ThemeField::DarkHeadingColor => &mut theme.dark_mode_heading_color,
            ThemeField::LightBgColor => &mut theme.light_mode_bg_color,
            ThemeField::DarkBgColor => &mut theme.dark_mode_bg_color,
            ThemeField::GlowColor => &mut theme.glow_color,
        };
        *slot = parse_color(field, value)?;
        Ok(())
    }
}

/// Accepts `#rgb` and `#rrggbb`, normalized to lowercase.
fn parse_color(field: &'static str, value: &str) -> Result<String, DraftError> {
    let value = value.trim();
    let valid = value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(DraftError::invalid(field, format!("expected a hex color like #3b82f6, got {:?}", value)))
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<String, DraftError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| DraftError::invalid(field, format!("expected YYYY-MM-DD, got {:?}", value)))
}

fn parse_email(field: &'static str, value: &str) -> Result<String, DraftError> {
    let value = value.trim();
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(value.to_string())
    } else {
        Err(DraftError::invalid(field, format!("not an email address: {:?}", value)))
    }
}
