use clap::{Args, ValueEnum};
use sitecms::config::Config;
use sitecms_core::{ContentField, ContentState, ThemeField, ThemeSettings};

use super::config_cmd::OutputFormat;
use super::{draft_file, remote};

#[derive(Clone, Copy, ValueEnum)]
pub enum Section {
    Content,
    Theme,
    Categories,
}

#[derive(Args)]
pub struct ShowCommand {
    /// What to show
    #[arg(value_enum, default_value = "content")]
    pub section: Section,

    /// Show the local draft instead of the live site
    #[arg(long)]
    pub draft: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ShowCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (content, theme) = if self.draft {
            let draft = draft_file::require(&config.draft_path())?;
            (draft.content().clone(), draft.theme().clone())
        } else {
            let (_sync, view) = remote::live_view(config).await?;
            ((*view.content).clone(), (*view.theme).clone())
        };

        match (self.section, self.format) {
            (Section::Content, OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&content)?)
            }
            (Section::Theme, OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&theme)?)
            }
            (Section::Categories, OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&content.project_categories())?)
            }
            (Section::Content, OutputFormat::Text) => print_content(&content),
            (Section::Theme, OutputFormat::Text) => print_theme(&theme),
            (Section::Categories, OutputFormat::Text) => print_categories(&content),
        }
        Ok(())
    }
}

/// Shortens long values such as embedded data URIs.
pub fn preview(value: &str) -> String {
    const LIMIT: usize = 60;
    if value.starts_with("data:") {
        return format!("<data uri, {} bytes>", value.len());
    }
    let first_line = value.lines().next().unwrap_or("");
    if first_line.chars().count() > LIMIT || first_line.len() < value.len() {
        let short: String = first_line.chars().take(LIMIT).collect();
        format!("{}…", short)
    } else {
        value.to_string()
    }
}

pub fn print_content(content: &ContentState) {
    for field in ContentField::ALL {
        println!("{:<24} {}", field.name(), preview(&field.get(content)));
    }

    println!();
    println!("services: {}", content.services.len());
    for service in &content.services {
        println!("  {:<38} {}", service.id, service.title);
    }
    println!("header links: {}", content.header_links.len());
    for link in &content.header_links {
        println!("  {:<38} {} -> {}", link.id, link.text, link.url);
    }
    println!("footer links: {}", content.footer_links.len());
    for link in &content.footer_links {
        println!("  {:<38} {} -> {}", link.id, link.text, link.url);
    }
    println!("social links: {}", content.social_links.len());
    for link in &content.social_links {
        println!("  {:<38} {} -> {}", link.id, link.name, link.url);
    }
    println!("statistics: {}", content.why_choose_us.statistics.len());
    for stat in &content.why_choose_us.statistics {
        println!("  {:<38} {}{} {}", stat.id, stat.value, stat.suffix, stat.label);
    }
    println!("projects: {}", content.latest_projects.projects.len());
    for project in &content.latest_projects.projects {
        println!("  {:<38} [{}] {}", project.id, project.category, project.title);
    }

    println!();
    println!(
        "whatsapp button:      {}",
        content.floating_buttons.whats_app_icon
    );
    println!(
        "ai assistant button:  {}",
        content.floating_buttons.ai_assistant_icon
    );
    println!(
        "scroll-to-top button: {}",
        content.floating_buttons.scroll_to_top_icon
    );
}

pub fn print_theme(theme: &ThemeSettings) {
    for field in ThemeField::ALL {
        println!("{:<22} {}", field.name(), field.get(theme));
    }
}

fn print_categories(content: &ContentState) {
    let categories = content.project_categories();
    if categories.is_empty() {
        println!("No categories");
        return;
    }
    for category in &categories {
        let count = content.projects_in_category(category).count();
        println!("{:<30} {} project(s)", category, count);
    }
}
