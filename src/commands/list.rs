//! List newsletters

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use walkdir::WalkDir;

use super::generate::load_state;
use crate::content::manifest::parse_manifest;
use crate::generator::PageState;
use crate::Site;

/// Print the newsletters in page order, optionally followed by orphaned files
pub async fn run(site: &Site, orphans: bool) -> Result<()> {
    match load_state(site).await {
        PageState::Ready(entries) => {
            println!("Newsletters ({}):", entries.len());
            for entry in entries {
                let flag = if entry.is_degraded() { " (failed to load)" } else { "" };
                let date = if entry.date_iso.is_empty() {
                    "----------"
                } else {
                    entry.date_iso.as_str()
                };
                println!("  {} - {} [{}]{}", date, entry.title, entry.file, flag);
            }
        }
        other => println!("{}", other.message().unwrap_or_default()),
    }

    if orphans {
        let files = find_orphans(site)?;
        println!("Not in manifest ({}):", files.len());
        for file in files {
            println!("  {}", file);
        }
    }

    Ok(())
}

/// Markdown files under the content directory that the local manifest does not list
pub fn find_orphans(site: &Site) -> Result<Vec<String>> {
    let manifest_path = site.manifest_path();
    let listed: HashSet<String> = if manifest_path.exists() {
        let text = fs::read_to_string(&manifest_path)?;
        parse_manifest(&text)
            .with_context(|| format!("Invalid manifest {:?}", manifest_path))?
            .into_iter()
            .map(|r| r.file)
            .collect()
    } else {
        HashSet::new()
    };

    let content_dir = site.content_dir();
    if !content_dir.exists() {
        return Ok(Vec::new());
    }

    let mut orphans = Vec::new();
    for entry in WalkDir::new(&content_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().map(|ext| ext == "md").unwrap_or(false) {
            let relative = path
                .strip_prefix(&content_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            if !listed.contains(&relative) {
                orphans.push(relative);
            }
        }
    }
    orphans.sort();

    Ok(orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_orphans() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("newsletters");
        fs::create_dir_all(content.join("archive")).unwrap();
        fs::write(content.join("index.json"), r#"["2026-01.md", {"file": "archive/2025-12.md"}]"#)
            .unwrap();
        fs::write(content.join("2026-01.md"), "").unwrap();
        fs::write(content.join("2026-02.md"), "").unwrap();
        fs::write(content.join("archive/2025-12.md"), "").unwrap();
        fs::write(content.join("archive/2025-11.md"), "").unwrap();
        fs::write(content.join("notes.txt"), "").unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(
            find_orphans(&site).unwrap(),
            vec!["2026-02.md".to_string(), "archive/2025-11.md".to_string()]
        );
    }

    #[test]
    fn test_find_orphans_without_content_dir() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(find_orphans(&site).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_lists_entries() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("newsletters")).unwrap();
        fs::write(dir.path().join("newsletters/index.json"), r#"["2026-01.md"]"#).unwrap();
        let site = Site::new(dir.path()).unwrap();
        run(&site, true).await.unwrap();
    }
}
