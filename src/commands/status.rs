use sitecms::config::Config;
use sitecms_core::{server_health, SyncPhase};

use super::{draft_file, remote};

/// Reports server reachability, sync state and the local draft.
pub async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let url = remote::server_url(config)?;
    println!("Server: {}", url);

    match server_health(url).await {
        Some(health) => println!("  status: {} (version {})", health.status, health.version),
        None => {
            println!("  status: unreachable");
            return Ok(());
        }
    }

    let paths = config.store_paths()?;
    println!("  content: {}", paths.content);
    println!("  theme: {}", paths.theme);

    match remote::live_view(config).await {
        Ok((_sync, view)) => {
            println!("  sync: {}", view.phase);
            if view.phase == SyncPhase::Ready {
                println!("  site: {}", view.content.site_name);
            }
        }
        Err(e) => println!("  sync: failed ({})", e),
    }

    println!(
        "  writes: {}",
        if config.session().is_some() {
            "API key configured"
        } else {
            "read-only (no API key)"
        }
    );

    match draft_file::load(&config.draft_path())? {
        Some(draft) if draft.is_dirty() => println!("Draft: modified"),
        Some(_) => println!("Draft: clean"),
        None => println!("Draft: none"),
    }
    Ok(())
}
