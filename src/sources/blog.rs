use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

use crate::error::{Result, SparkIndexError};

/// A published blog post found in the content directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub slug: String,
    pub path: PathBuf,
}

/// Frontmatter keys that affect the public URL
#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    draft: bool,
}

fn frontmatter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---").expect("Invalid regex pattern"))
}

/// Discover published posts in the blog content directory.
///
/// Only top-level `.md` / `.mdx` files count, visited in file-name order so the
/// result is stable across runs. The slug comes from the frontmatter `slug`
/// key when present, otherwise from the file stem. Posts marked `draft: true`
/// are skipped.
///
/// A missing directory yields no posts. Any other read failure is an error:
/// a partial post list must not be mistaken for the full one.
pub fn discover_posts(dir: &Path) -> Result<Vec<BlogPost>> {
    if !dir.exists() {
        log::warn!("Blog directory {} does not exist, no posts enumerated", dir.display());
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            SparkIndexError::DataSource(format!("Failed to read {}: {}", dir.display(), e))
        })?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !matches!(extension.as_str(), "md" | "mdx") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SparkIndexError::DataSource(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let frontmatter = parse_frontmatter(&content)
            .map_err(|e| SparkIndexError::DataSource(format!("{}: {}", path.display(), e)))?;

        if frontmatter.draft {
            log::debug!("Skipping draft {}", path.display());
            continue;
        }

        let slug = match frontmatter.slug.map(|s| s.trim().trim_matches('/').to_string()) {
            Some(s) if !s.is_empty() => s,
            _ => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        };

        posts.push(BlogPost {
            slug,
            path: path.to_path_buf(),
        });
    }

    log::info!("Discovered {} blog posts in {}", posts.len(), dir.display());
    Ok(posts)
}

fn parse_frontmatter(content: &str) -> Result<Frontmatter> {
    let Some(caps) = frontmatter_regex().captures(content) else {
        return Ok(Frontmatter::default());
    };
    let yaml = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    serde_yaml_ng::from_str(yaml)
        .map_err(|e| SparkIndexError::Parse(format!("Invalid frontmatter: {}", e)))
}
