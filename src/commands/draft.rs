use clap::{Args, Subcommand, ValueEnum};
use sitecms::config::Config;
use sitecms_core::models::{
    FloatingButton, FloatingIcon, IconSetting, Link, MediaType, Project, Service, SocialIcon,
    SocialLink, Statistic,
};
use sitecms_core::{ContentField, ContentState, DraftEditor, ThemeField};
use std::path::PathBuf;

use super::show::preview;
use super::{draft_file, remote, upload};

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Args)]
pub struct DraftCommand {
    #[command(subcommand)]
    pub command: DraftSubcommand,
}

#[derive(Subcommand)]
pub enum DraftSubcommand {
    /// Copy the live site into the local draft
    Pull {
        /// Overwrite uncommitted edits
        #[arg(long, short)]
        force: bool,
    },

    /// Show whether the draft has edits and how it compares to the live site
    Status,

    /// Throw the local draft away
    Discard,

    /// Save the draft to the live site
    Commit,

    /// Set a content field (see `sitecms show content` for names)
    Set {
        field: ContentField,
        value: Option<String>,
        /// Embed a file as a data URI instead of giving a value
        #[arg(long, value_name = "FILE")]
        upload: Option<PathBuf>,
    },

    /// Set a theme setting (see `sitecms show theme` for names)
    Theme { field: ThemeField, value: String },

    /// Choose the icon of a floating button
    Icon {
        #[arg(value_enum)]
        button: ButtonArg,
        #[arg(value_enum)]
        kind: IconKind,
        /// Icon name for pre-built, URL for url
        value: Option<String>,
        /// Embed a file as the icon URL
        #[arg(long, value_name = "FILE")]
        upload: Option<PathBuf>,
    },

    /// Edit services
    #[command(subcommand)]
    Service(ServiceAction),

    /// Edit header or footer links
    Link {
        #[arg(value_enum)]
        placement: Placement,
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Edit social links
    #[command(subcommand)]
    Social(SocialAction),

    /// Edit projects
    #[command(subcommand)]
    Project(ProjectAction),

    /// Edit "why choose us" statistics
    #[command(subcommand)]
    Stat(StatAction),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ButtonArg {
    Whatsapp,
    AiAssistant,
    ScrollToTop,
}

impl From<ButtonArg> for FloatingButton {
    fn from(button: ButtonArg) -> Self {
        match button {
            ButtonArg::Whatsapp => FloatingButton::WhatsApp,
            ButtonArg::AiAssistant => FloatingButton::AiAssistant,
            ButtonArg::ScrollToTop => FloatingButton::ScrollToTop,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IconKind {
    PreBuilt,
    Url,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Placement {
    Header,
    Footer,
}

#[derive(Subcommand)]
pub enum ServiceAction {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Remove {
        id: String,
    },
    List,
}

#[derive(Subcommand)]
pub enum LinkAction {
    Add {
        text: String,
        url: String,
    },
    Update {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    Remove {
        id: String,
    },
    List,
}

#[derive(Subcommand)]
pub enum SocialAction {
    Add {
        platform: SocialIcon,
        url: String,
    },
    Update {
        id: String,
        #[arg(long)]
        platform: Option<SocialIcon>,
        #[arg(long)]
        url: Option<String>,
    },
    Remove {
        id: String,
    },
    List,
}

/// Media and details shared by `project add` and `project update`.
#[derive(Args)]
pub struct ProjectFields {
    #[arg(long)]
    description: Option<String>,
    /// Cover image or video URL
    #[arg(long)]
    media_url: Option<String>,
    /// Embed a file as the cover
    #[arg(long, value_name = "FILE", conflicts_with = "media_url")]
    upload: Option<PathBuf>,
    /// Defaults to what the cover looks like
    #[arg(long)]
    media_type: Option<MediaType>,
    /// Link to the live project
    #[arg(long)]
    url: Option<String>,
    /// Gallery image URL (can be repeated)
    #[arg(long = "gallery", value_name = "URL")]
    gallery: Vec<String>,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    Add {
        title: String,
        /// Category label; a new label starts a new category
        #[arg(long)]
        category: String,
        #[command(flatten)]
        fields: ProjectFields,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        fields: ProjectFields,
        /// Remove the project link
        #[arg(long, conflicts_with = "url")]
        clear_url: bool,
    },
    Remove {
        id: String,
    },
    List {
        /// Only projects in this category
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StatAction {
    Add {
        value: String,
        label: String,
        #[arg(long, default_value = "")]
        suffix: String,
    },
    Update {
        id: String,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        suffix: Option<String>,
    },
    Remove {
        id: String,
    },
    List,
}

impl DraftCommand {
    pub async fn run(self, config: &Config) -> CmdResult {
        let path = config.draft_path();
        match self.command {
            DraftSubcommand::Pull { force } => pull(config, force).await,
            DraftSubcommand::Status => status(config).await,
            DraftSubcommand::Discard => {
                if draft_file::remove(&path)? {
                    println!("Discarded local draft");
                } else {
                    println!("No local draft");
                }
                Ok(())
            }
            DraftSubcommand::Commit => commit(config).await,
            DraftSubcommand::Set {
                field,
                value,
                upload,
            } => {
                let value = upload::value_or_upload(value, upload.as_deref())?;
                edit(&path, |draft| Ok(draft.set_field(field, &value)?))?;
                println!("Set {} = {}", field, preview(&value));
                Ok(())
            }
            DraftSubcommand::Theme { field, value } => {
                let stored = edit(&path, |draft| {
                    draft.set_theme_field(field, &value)?;
                    Ok(field.get(draft.theme()))
                })?;
                println!("Set {} = {}", field, stored);
                Ok(())
            }
            DraftSubcommand::Icon {
                button,
                kind,
                value,
                upload,
            } => {
                let setting = icon_setting(kind, value, upload)?;
                let shown = setting.to_string();
                edit(&path, |draft| {
                    draft.set_icon(button.into(), setting);
                    Ok(())
                })?;
                println!("Set {:?} button icon: {}", FloatingButton::from(button), shown);
                Ok(())
            }
            DraftSubcommand::Service(action) => edit(&path, |draft| service(draft, action)),
            DraftSubcommand::Link { placement, action } => {
                edit(&path, |draft| link(draft, placement, action))
            }
            DraftSubcommand::Social(action) => edit(&path, |draft| social(draft, action)),
            DraftSubcommand::Project(action) => edit(&path, |draft| project(draft, action)),
            DraftSubcommand::Stat(action) => edit(&path, |draft| stat(draft, action)),
        }
    }
}

/// Loads the draft, applies `f` and saves it if `f` succeeded.
fn edit<R>(path: &std::path::Path, f: impl FnOnce(&mut DraftEditor) -> CmdResult<R>) -> CmdResult<R> {
    let mut draft = draft_file::require(path)?;
    let result = f(&mut draft)?;
    if draft.is_dirty() {
        draft_file::save(path, &draft)?;
    }
    Ok(result)
}

async fn pull(config: &Config, force: bool) -> CmdResult {
    let path = config.draft_path();
    if let Some(existing) = draft_file::load(&path)? {
        if existing.is_dirty() && !force {
            return Err(
                "Local draft has uncommitted edits. Commit them, or pull --force to drop them"
                    .into(),
            );
        }
    }

    let (_sync, view) = remote::live_view(config).await?;
    let draft = DraftEditor::new(&view);
    draft_file::save(&path, &draft)?;

    println!(
        "Pulled '{}' into {}",
        draft.content().site_name,
        path.display()
    );
    Ok(())
}

async fn status(config: &Config) -> CmdResult {
    let path = config.draft_path();
    let draft = draft_file::require(&path)?;

    println!("Draft: {}", path.display());
    println!("  pulled: {}", draft.pulled_at().format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  state: {}",
        if draft.is_dirty() { "modified" } else { "clean" }
    );

    if !config.server.is_configured() {
        return Ok(());
    }
    match remote::live_view(config).await {
        Ok((_sync, view)) if draft.differs_from(&view) => {
            println!("  live site: differs from draft")
        }
        Ok(_) => println!("  live site: matches draft"),
        Err(e) => println!("  live site: unavailable ({})", e),
    }
    Ok(())
}

async fn commit(config: &Config) -> CmdResult {
    let path = config.draft_path();
    let mut draft = draft_file::require(&path)?;
    if !draft.is_dirty() {
        println!("Nothing to commit");
        return Ok(());
    }

    let (sync, _view) = remote::live_view(config).await?;
    let session = config.session();
    if let Err(e) = draft.commit(&sync, session.as_ref()).await {
        if e.is_partial() {
            eprintln!("Warning: the live site now mixes old and new values");
        }
        return Err(e.into());
    }
    draft_file::save(&path, &draft)?;

    println!("Committed draft as {}", config.principal.value);
    Ok(())
}

fn icon_setting(
    kind: IconKind,
    value: Option<String>,
    upload: Option<PathBuf>,
) -> CmdResult<IconSetting> {
    Ok(match kind {
        IconKind::PreBuilt => match value {
            Some(name) => IconSetting::PreBuilt(name.parse::<FloatingIcon>()?),
            None => IconSetting::pre_built(),
        },
        IconKind::Url => match (value, upload) {
            (None, None) => IconSetting::custom(),
            (value, upload) => IconSetting::Custom(upload::value_or_upload(value, upload.as_deref())?),
        },
    })
}

/// Video for video files and video data URIs, image otherwise.
fn infer_media_type(url: &str) -> MediaType {
    let lower = url.to_ascii_lowercase();
    let is_video = lower.starts_with("data:video/")
        || [".mp4", ".webm", ".mov"]
            .iter()
            .any(|ext| lower.split(['?', '#']).next().unwrap_or("").ends_with(ext));
    if is_video {
        MediaType::Video
    } else {
        MediaType::Image
    }
}

fn service(draft: &mut DraftEditor, action: ServiceAction) -> CmdResult {
    match action {
        ServiceAction::Add { title, description } => {
            let id = draft.services().add(Service::new(title, description));
            println!("Added service {}", id);
        }
        ServiceAction::Update {
            id,
            title,
            description,
        } => {
            draft.services().update_by_id(&id, |s| {
                if let Some(title) = title {
                    s.title = title;
                }
                if let Some(description) = description {
                    s.description = description;
                }
            })?;
            println!("Updated service {}", id);
        }
        ServiceAction::Remove { id } => {
            let removed = draft.services().remove_by_id(&id)?;
            println!("Removed service: {}", removed.title);
        }
        ServiceAction::List => {
            for s in &draft.content().services {
                println!("{:<38} {:<30} {}", s.id, s.title, preview(&s.description));
            }
        }
    }
    Ok(())
}

fn links(content: &mut ContentState, placement: Placement) -> &mut Vec<Link> {
    match placement {
        Placement::Header => &mut content.header_links,
        Placement::Footer => &mut content.footer_links,
    }
}

fn link(draft: &mut DraftEditor, placement: Placement, action: LinkAction) -> CmdResult {
    match action {
        LinkAction::Add { text, url } => {
            let id = draft
                .collection(|c| links(c, placement))
                .add(Link::new(text, url));
            println!("Added link {}", id);
        }
        LinkAction::Update { id, text, url } => {
            draft.collection(|c| links(c, placement)).update_by_id(&id, |l| {
                if let Some(text) = text {
                    l.text = text;
                }
                if let Some(url) = url {
                    l.url = url;
                }
            })?;
            println!("Updated link {}", id);
        }
        LinkAction::Remove { id } => {
            let removed = draft.collection(|c| links(c, placement)).remove_by_id(&id)?;
            println!("Removed link: {}", removed.text);
        }
        LinkAction::List => {
            let content = draft.content();
            let list = match placement {
                Placement::Header => &content.header_links,
                Placement::Footer => &content.footer_links,
            };
            for l in list {
                println!("{:<38} {:<20} {}", l.id, l.text, l.url);
            }
        }
    }
    Ok(())
}

fn social(draft: &mut DraftEditor, action: SocialAction) -> CmdResult {
    match action {
        SocialAction::Add { platform, url } => {
            let id = draft
                .collection(|c| &mut c.social_links)
                .add(SocialLink::new(platform, url));
            println!("Added social link {}", id);
        }
        SocialAction::Update { id, platform, url } => {
            draft
                .collection(|c| &mut c.social_links)
                .update_by_id(&id, |l| {
                    if let Some(platform) = platform {
                        l.name = platform;
                    }
                    if let Some(url) = url {
                        l.url = url;
                    }
                })?;
            println!("Updated social link {}", id);
        }
        SocialAction::Remove { id } => {
            let removed = draft
                .collection(|c| &mut c.social_links)
                .remove_by_id(&id)?;
            println!("Removed social link: {}", removed.name);
        }
        SocialAction::List => {
            for l in &draft.content().social_links {
                println!("{:<38} {:<12} {}", l.id, l.name, l.url);
            }
        }
    }
    Ok(())
}

/// Applies the optional project details in `fields` to `project`.
fn apply_project_fields(project: &mut Project, fields: ProjectFields) -> CmdResult {
    if let Some(description) = fields.description {
        project.description = description;
    }
    let cover = match (fields.media_url, fields.upload) {
        (None, None) => None,
        (value, upload) => Some(upload::value_or_upload(value, upload.as_deref())?),
    };
    if let Some(cover) = cover {
        project.media_type = infer_media_type(&cover);
        project.media_url = cover;
    }
    if let Some(media_type) = fields.media_type {
        project.media_type = media_type;
    }
    if let Some(url) = fields.url {
        project.project_url = Some(url);
    }
    if !fields.gallery.is_empty() {
        project.set_gallery_from_lines(&fields.gallery.join("\n"));
    }
    Ok(())
}

fn project(draft: &mut DraftEditor, action: ProjectAction) -> CmdResult {
    match action {
        ProjectAction::Add {
            title,
            category,
            fields,
        } => {
            let mut project = Project::new(title, category);
            apply_project_fields(&mut project, fields)?;
            let id = draft.add_project(project)?;
            println!("Added project {}", id);
        }
        ProjectAction::Update {
            id,
            title,
            category,
            fields,
            clear_url,
        } => {
            if let Some(category) = category {
                draft.set_project_category(&id, &category)?;
            }
            let current = draft
                .content()
                .project(&id)
                .cloned()
                .ok_or_else(|| format!("project not found: {}", id))?;
            let mut updated = current;
            if let Some(title) = title {
                updated.title = title;
            }
            apply_project_fields(&mut updated, fields)?;
            if clear_url {
                updated.project_url = None;
            }
            draft.projects().update_by_id(&id, |p| *p = updated)?;
            println!("Updated project {}", id);
        }
        ProjectAction::Remove { id } => {
            let removed = draft.projects().remove_by_id(&id)?;
            println!("Removed project: {}", removed.title);
        }
        ProjectAction::List { category } => {
            let content = draft.content();
            let projects: Vec<&Project> = match &category {
                Some(label) => content.projects_in_category(label.trim()).collect(),
                None => content.latest_projects.projects.iter().collect(),
            };
            if projects.is_empty() {
                println!("No projects found");
            }
            for p in projects {
                println!(
                    "{:<38} {:<14} {:<30} {}",
                    p.id,
                    p.category,
                    p.title,
                    p.external_url().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}

fn statistics(content: &mut ContentState) -> &mut Vec<Statistic> {
    &mut content.why_choose_us.statistics
}

fn stat(draft: &mut DraftEditor, action: StatAction) -> CmdResult {
    match action {
        StatAction::Add {
            value,
            label,
            suffix,
        } => {
            let id = draft.collection(statistics).add(Statistic::new(value, suffix, label));
            println!("Added statistic {}", id);
        }
        StatAction::Update {
            id,
            value,
            label,
            suffix,
        } => {
            draft.collection(statistics).update_by_id(&id, |s| {
                if let Some(value) = value {
                    s.value = value;
                }
                if let Some(label) = label {
                    s.label = label;
                }
                if let Some(suffix) = suffix {
                    s.suffix = suffix;
                }
            })?;
            println!("Updated statistic {}", id);
        }
        StatAction::Remove { id } => {
            let removed = draft.collection(statistics).remove_by_id(&id)?;
            println!("Removed statistic: {}", removed.label);
        }
        StatAction::List => {
            for s in &draft.content().why_choose_us.statistics {
                println!("{:<38} {:>8}{:<4} {}", s.id, s.value, s.suffix, s.label);
            }
        }
    }
    Ok(())
}
