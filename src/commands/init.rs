//! Initialize a new newsletter site

use anyhow::Result;
use chrono::{Datelike, Local};
use std::fs;
use std::path::Path;

use crate::content::manifest::{to_manifest_json, PostReference};

const CONFIG_TEMPLATE: &str = r#"# Newsletter site configuration

# Site
title: Club Newsletters
description: ''
language: en_US
timezone: ''

# Output
public_dir: public
page_path: newsletters.html

# Newsletters
# source: manifest reads newsletters/index.json and one Markdown file per entry
# source: static reads pre-rendered posts from static_posts
source: manifest
manifest: newsletters/index.json
content_dir: newsletters
# base_url: https://example.com/   # fetch from a deployed site instead
static_posts: posts.yml
default_expanded: 0
fetch_timeout_secs: 30
markdown:
  smart_punctuation: true

# Navigation
membership_url:
menu:
  Home: index.html
  Newsletters: newsletters.html
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    let newsletters_dir = target_dir.join("newsletters");
    fs::create_dir_all(&newsletters_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    // A first newsletter for the current month
    let today = Local::now().date_naive();
    let file = format!("{:04}-{:02}.md", today.year(), today.month());
    let sample = format!(
        r#"---
title: "Welcome to the Newsletter"
date: "{}"
---

## Welcome

Each month's newsletter lives in its own Markdown file in this folder.

### Publishing a new issue

1. Add `newsletters/YYYY-MM.md` (or run `newsletter-rs new "Title"`).
2. Append the file name to `newsletters/index.json`.

## Safety Reminders

Use `##` and `###` headings; they become the table of contents.
"#,
        today.format("%Y-%m-%d")
    );
    fs::write(newsletters_dir.join(&file), sample)?;

    let manifest = to_manifest_json(&[PostReference::new(file)])?;
    fs::write(newsletters_dir.join("index.json"), manifest)?;

    tracing::debug!("Initialized site at {:?}", target_dir);
    Ok(())
}
