use serde::Serialize;
use std::path::Path;

use crate::error::{Result, SparkIndexError};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Serialize)]
#[serde(rename = "urlset")]
struct UrlSet<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'a str,
    #[serde(rename = "url")]
    urls: Vec<UrlEntry<'a>>,
}

#[derive(Serialize)]
struct UrlEntry<'a> {
    loc: &'a str,
}

/// Render candidate URLs as a sitemap.org `urlset` document
pub fn render_sitemap(urls: &[String]) -> Result<String> {
    let set = UrlSet {
        xmlns: SITEMAP_NS,
        urls: urls.iter().map(|u| UrlEntry { loc: u }).collect(),
    };

    let body = quick_xml::se::to_string(&set)
        .map_err(|e| SparkIndexError::Parse(format!("Failed to serialize sitemap: {}", e)))?;

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", body))
}

/// Write the sitemap to `path`, replacing any existing file
pub fn write_sitemap(path: &Path, urls: &[String]) -> Result<()> {
    let xml = render_sitemap(urls)?;
    std::fs::write(path, xml)?;
    log::info!("Wrote sitemap with {} URLs to {}", urls.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sitemap() {
        let urls = vec![
            "https://sparklocal.co".to_string(),
            "https://sparklocal.co/listing/a&b".to_string(),
        ];
        let xml = render_sitemap(&urls).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<url><loc>https://sparklocal.co</loc></url>"));
        assert!(xml.contains("<loc>https://sparklocal.co/listing/a&amp;b</loc>"));
        assert_eq!(xml.matches("<loc>").count(), 2);
    }

    #[test]
    fn test_write_sitemap() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("sitemap.xml");
        write_sitemap(&path, &["https://sparklocal.co/about".to_string()]).unwrap();
        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains("https://sparklocal.co/about"));
    }
}
