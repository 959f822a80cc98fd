//! Create a new newsletter and register it in the manifest

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::content::date::{normalize_iso_date, parse_iso_date};
use crate::Site;

/// Write `<content_dir>/YYYY-MM.md` and append it to the manifest.
///
/// Falls back to `YYYY-MM-<slug>.md` when the month already has a file.
pub fn create_newsletter(site: &Site, title: &str, date: Option<&str>) -> Result<PathBuf> {
    let date_iso = match date {
        Some(d) => {
            let normalized = normalize_iso_date(d);
            if normalized.is_empty() {
                anyhow::bail!("Invalid date {:?}, expected YYYY-MM-DD", d);
            }
            normalized
        }
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };
    let month = parse_iso_date(&date_iso)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default();

    let content_dir = site.content_dir();
    fs::create_dir_all(&content_dir)?;

    let mut file_name = format!("{}.md", month);
    if content_dir.join(&file_name).exists() {
        file_name = format!("{}-{}.md", month, slug::slugify(title));
    }
    let file_path = content_dir.join(&file_name);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: \"{}\"\ndate: \"{}\"\n---\n\n## Highlights\n",
        title.replace('"', "'"),
        date_iso
    );
    fs::write(&file_path, content)?;

    append_to_manifest(site, &file_name)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Append a file name to the manifest, keeping existing elements untouched
fn append_to_manifest(site: &Site, file_name: &str) -> Result<()> {
    let manifest_path = site.manifest_path();
    let mut items = if manifest_path.exists() {
        let text = fs::read_to_string(&manifest_path)?;
        match serde_json::from_str::<Value>(&text)
            .with_context(|| format!("Invalid manifest {:?}", manifest_path))?
        {
            Value::Array(items) => items,
            _ => anyhow::bail!("Manifest {:?} must be a JSON array", manifest_path),
        }
    } else {
        Vec::new()
    };

    items.push(Value::String(file_name.to_string()));
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&manifest_path, serde_json::to_string_pretty(&items)?)?;
    tracing::info!("Added {} to {:?}", file_name, manifest_path);

    Ok(())
}
