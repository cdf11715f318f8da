use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::icon::{FeatureIcon, IconSetting, SocialIcon, ValueIcon};
use super::lenient;
use super::record::{impl_record, RecordId};

/// The full editable content tree of the site.
///
/// `Default` is the complete baked-in content. Deserialization fills every
/// missing field from it, so a partial tree from the store still produces a
/// fully populated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentState {
    pub site_name: String,
    pub tagline: String,
    pub dynamic_title: DynamicTitle,
    #[serde(deserialize_with = "lenient::seq")]
    pub services: Vec<Service>,
    #[serde(deserialize_with = "lenient::seq")]
    pub header_links: Vec<Link>,
    #[serde(deserialize_with = "lenient::seq")]
    pub footer_links: Vec<Link>,
    #[serde(deserialize_with = "lenient::seq")]
    pub social_links: Vec<SocialLink>,
    pub whats_app_number: String,
    pub ai_model: String,
    pub logos: Logos,
    pub about_us: AboutUs,
    pub why_choose_us: WhyChooseUs,
    pub latest_projects: LatestProjects,
    pub privacy_policy: LegalPage,
    pub terms_of_service: LegalPage,
    pub contact_info: ContactInfo,
    pub contact_form_recipient_email: String,
    pub floating_buttons: FloatingButtons,
}

impl ContentState {
    /// Distinct project categories, sorted.
    ///
    /// Categories are never stored on their own; a label exists exactly as
    /// long as some project carries it.
    pub fn project_categories(&self) -> Vec<String> {
        self.latest_projects
            .projects
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Projects carrying the given category label, in display order.
    pub fn projects_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Project> {
        self.latest_projects
            .projects
            .iter()
            .filter(move |p| p.category == category)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.latest_projects.projects.iter().find(|p| p.id == id)
    }
}

/// Headline with a rotating middle part, e.g. "We Build <word>."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DynamicTitle {
    pub prefix: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub rotating_words: Vec<String>,
    pub suffix: String,
}

impl DynamicTitle {
    /// Replaces the rotating words from comma-separated input.
    pub fn set_rotating_words_csv(&mut self, input: &str) {
        self.rotating_words = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub id: RecordId,
    pub title: String,
    pub description: String,
}

impl Service {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: RecordId::default(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Navigation link (header or footer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub id: RecordId,
    pub text: String,
    pub url: String,
}

impl Link {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: RecordId::default(),
            text: text.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub id: RecordId,
    pub name: SocialIcon,
    pub url: String,
}

impl SocialLink {
    pub fn new(name: SocialIcon, url: impl Into<String>) -> Self {
        Self {
            id: RecordId::default(),
            name,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logos {
    pub header: String,
    pub footer: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    None,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::None => "none",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "none" => Ok(MediaType::None),
            _ => Err(UnknownOption::new("media type", s, "image, video, none")),
        }
    }
}

/// A value outside a fixed set of choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?} (expected one of: {expected})")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl UnknownOption {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreValue {
    pub id: RecordId,
    pub icon: ValueIcon,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutUs {
    pub introduction: String,
    pub mission: String,
    pub vision: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub values: Vec<CoreValue>,
    pub media_url: String,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub id: RecordId,
    pub icon: FeatureIcon,
    pub title: String,
    pub description: String,
}

/// A headline number such as "98%" "Client Satisfaction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistic {
    pub id: RecordId,
    pub value: String,
    pub label: String,
    pub suffix: String,
}

impl Statistic {
    pub fn new(value: impl Into<String>, suffix: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: RecordId::default(),
            value: value.into(),
            label: label.into(),
            suffix: suffix.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhyChooseUs {
    pub title: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub features: Vec<Feature>,
    #[serde(deserialize_with = "lenient::seq")]
    pub statistics: Vec<Statistic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    /// Cover image or video.
    pub media_url: String,
    pub media_type: MediaType,
    /// Free-form label; see [`ContentState::project_categories`].
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(
        deserialize_with = "lenient::seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub gallery: Vec<String>,
}

impl Project {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_media(mut self, url: impl Into<String>, media_type: MediaType) -> Self {
        self.media_url = url.into();
        self.media_type = media_type;
        self
    }

    pub fn with_project_url(mut self, url: impl Into<String>) -> Self {
        self.project_url = Some(url.into());
        self
    }

    pub fn with_gallery(mut self, gallery: Vec<String>) -> Self {
        self.gallery = gallery;
        self
    }

    /// Replaces the gallery from newline-separated URLs, dropping blank lines.
    pub fn set_gallery_from_lines(&mut self, input: &str) {
        self.gallery = input
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    /// External link, if one is set and non-empty.
    pub fn external_url(&self) -> Option<&str> {
        self.project_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.title, self.category)?;
        writeln!(f, "  id: {}", self.id)?;
        if !self.description.is_empty() {
            writeln!(f, "  {}", self.description)?;
        }
        if let Some(url) = self.external_url() {
            writeln!(f, "  url: {}", url)?;
        }
        if !self.gallery.is_empty() {
            writeln!(f, "  gallery: {} image(s)", self.gallery.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestProjects {
    pub title: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalPage {
    pub title: String,
    pub last_updated: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub map_embed_url: String,
}

/// Which floating action button an icon setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingButton {
    WhatsApp,
    AiAssistant,
    ScrollToTop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FloatingButtons {
    pub whats_app_icon: IconSetting,
    pub ai_assistant_icon: IconSetting,
    pub scroll_to_top_icon: IconSetting,
}

impl FloatingButtons {
    pub fn get(&self, button: FloatingButton) -> &IconSetting {
        match button {
            FloatingButton::WhatsApp => &self.whats_app_icon,
            FloatingButton::AiAssistant => &self.ai_assistant_icon,
            FloatingButton::ScrollToTop => &self.scroll_to_top_icon,
        }
    }

    pub fn get_mut(&mut self, button: FloatingButton) -> &mut IconSetting {
        match button {
            FloatingButton::WhatsApp => &mut self.whats_app_icon,
            FloatingButton::AiAssistant => &mut self.ai_assistant_icon,
            FloatingButton::ScrollToTop => &mut self.scroll_to_top_icon,
        }
    }
}

impl_record!(Service, "s", "service");
impl_record!(Link, "l", "link");
impl_record!(SocialLink, "so", "social link");
impl_record!(CoreValue, "v", "value");
impl_record!(Feature, "w", "feature");
impl_record!(Statistic, "st", "statistic");
impl_record!(Project, "p", "project");
