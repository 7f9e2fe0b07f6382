//! Store subcommand handlers for SpyWeb.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use spyweb_config::Config;
use spyweb_protocols::{MaskRecord, Scope};
use spyweb_store::{ExportBundle, FileStorage, MaskCollection, MaskStore, SettingsStore};

use crate::cli::{Commands, OutputFormat};

/// Stores opened over the configured storage directory.
pub(crate) struct Stores {
    pub masks: MaskStore,
    pub settings: SettingsStore,
}

impl Stores {
    pub(crate) async fn open(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let storage = Arc::new(FileStorage::new(&config.storage.path).await?);
        Ok(Self {
            masks: MaskStore::new(storage.clone(), &config.storage.namespace),
            settings: SettingsStore::new(storage, &config.storage.settings_key),
        })
    }
}

/// Handle a store subcommand and return what should be printed.
pub(crate) async fn handle_command(
    command: Commands,
    stores: &Stores,
) -> Result<String, Box<dyn std::error::Error>> {
    match command {
        Commands::List { domain, format } => list(stores, domain.as_deref(), format).await,
        Commands::Export { file } => export(stores, &file).await,
        Commands::Import { file } => import(stores, &file).await,
        Commands::Remove {
            domain,
            selector,
            index,
        } => match (selector, index) {
            (Some(selector), _) => remove(stores, &domain, &selector).await,
            (None, Some(index)) => remove_at(stores, &domain, index).await,
            (None, None) => Err("remove needs --selector or --index".into()),
        },
        Commands::Clear { domain } => clear(stores, domain.as_deref()).await,
        Commands::Settings => settings(stores).await,
    }
}

async fn list(
    stores: &Stores,
    domain: Option<&str>,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut collection = stores.masks.all().await?;
    if let Some(domain) = domain {
        collection.retain(|d, _| d == domain);
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&collection)?),
        OutputFormat::Table => Ok(render_table(&collection)),
    }
}

fn render_table(collection: &MaskCollection) -> String {
    let total: usize = collection.values().map(Vec::len).sum();
    if total == 0 {
        return "No masks found.".to_string();
    }

    let mut out = format!(
        "{:<24} {:<40} {:<8} {:<8} {}\n",
        "DOMAIN", "SELECTOR", "MODE", "SCOPE", "CREATED"
    );
    out.push_str(&"-".repeat(100));
    out.push('\n');
    for (domain, records) in collection {
        for record in records {
            out.push_str(&table_row(domain, record));
            out.push('\n');
        }
    }
    out.push_str(&format!("\n{} mask(s) in {} domain(s)", total, collection.len()));
    out
}

fn table_row(domain: &str, record: &MaskRecord) -> String {
    let scope = match record.scope {
        Scope::Current => "current",
        Scope::All => "all",
    };
    format!(
        "{:<24} {:<40} {:<8} {:<8} {}",
        domain,
        record.selector,
        record.mask_spec.visual_mode.as_str(),
        scope,
        record.created_at.format("%Y-%m-%d %H:%M"),
    )
}

async fn export(stores: &Stores, file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let bundle = ExportBundle::export(&stores.masks, &stores.settings).await?;
    let records: usize = bundle
        .masked_elements
        .as_ref()
        .map(|c| c.values().map(Vec::len).sum())
        .unwrap_or(0);
    tokio::fs::write(file, bundle.to_json_pretty()?).await?;
    info!(path = %file.display(), records, "Exported masks");
    Ok(format!("Exported {} mask(s) to {}", records, file.display()))
}

async fn import(stores: &Stores, file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file).await?;
    let bundle = ExportBundle::from_json(&content)?;
    let summary = bundle.import(&stores.masks, &stores.settings).await?;

    let mut message = format!(
        "Imported {} mask(s) across {} domain(s)",
        summary.records, summary.domains
    );
    if summary.settings {
        message.push_str(" and mask settings");
    }
    Ok(message)
}

async fn remove(
    stores: &Stores,
    domain: &str,
    selector: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    match stores.masks.remove(domain, selector).await? {
        Some(_) => Ok(format!("Removed {} from {}", selector, domain)),
        None => Err(format!("No mask for {} on {}", selector, domain).into()),
    }
}

async fn remove_at(
    stores: &Stores,
    domain: &str,
    index: usize,
) -> Result<String, Box<dyn std::error::Error>> {
    match stores.masks.remove_at(domain, index).await? {
        Some(record) => Ok(format!("Removed {} from {}", record.selector, domain)),
        None => Err(format!("No mask at index {} on {}", index, domain).into()),
    }
}

async fn clear(
    stores: &Stores,
    domain: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let (removed, scope) = match domain {
        Some(domain) => (stores.masks.clear_domain(domain).await?, domain),
        None => (stores.masks.clear_all().await?, "all domains"),
    };
    info!(removed, scope, "Cleared masks");
    Ok(format!("Removed {} mask(s) from {}", removed, scope))
}

async fn settings(stores: &Stores) -> Result<String, Box<dyn std::error::Error>> {
    let settings = stores.settings.load().await?;
    Ok(serde_json::to_string_pretty(&settings)?)
}
