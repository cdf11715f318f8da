mod content;
mod defaults;
mod icon;
pub mod lenient;
mod record;
mod theme;

pub use content::{
    AboutUs, ContactInfo, ContentState, CoreValue, DynamicTitle, Feature, FloatingButton,
    FloatingButtons, LatestProjects, LegalPage, Link, Logos, MediaType, Project, Service,
    SocialLink, Statistic, UnknownOption, WhyChooseUs,
};
pub use icon::{FeatureIcon, FloatingIcon, IconSetting, SocialIcon, UnknownIcon, ValueIcon};
pub use record::{Record, RecordId};
pub use theme::{GlowAnimation, ThemeSettings};
