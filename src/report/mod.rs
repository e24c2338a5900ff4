//! Business-idea viability report: layout and printable rendering.

pub mod layout;
pub mod model;
pub mod render;

pub use layout::{layout, Block, Document, Page};
pub use model::{Financials, LocalResource, MarketAnalysis, ViabilityReport};
pub use render::{page_markdown, render_html};

use std::path::Path;

use crate::error::Result;

/// Lay out and render a report JSON file into printable HTML at `output`.
///
/// Returns the number of pages written.
pub fn render_report_file(input: &Path, output: &Path) -> Result<usize> {
    let json = std::fs::read_to_string(input)?;
    let report = ViabilityReport::from_json(&json)?;
    let document = layout(&report);
    std::fs::write(output, render_html(&document))?;
    log::info!(
        "Rendered {} page report for {} to {}",
        document.pages.len(),
        report.idea_name,
        output.display()
    );
    Ok(document.pages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_report_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("report.json");
        let output = temp_dir.path().join("report.html");
        std::fs::write(
            &input,
            r#"{
                "ideaName": "Home Bakery",
                "location": "Boise, ID",
                "summary": "Cottage food laws make this cheap to start.",
                "viabilityScore": 58,
                "market": {"targetCustomers": "Local families", "competitors": ["Main St Bakery"]},
                "nextSteps": ["Check cottage food rules", "Price your first menu"]
            }"#,
        )
        .unwrap();

        let pages = render_report_file(&input, &output).unwrap();
        assert_eq!(pages, 4);
        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("Market Analysis"));
        assert!(html.contains("<li>Main St Bakery</li>"));
        assert!(html.contains("Needs validation"));
    }

    #[test]
    fn test_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("report.json");
        std::fs::write(&input, "[]").unwrap();
        let err = render_report_file(&input, &temp_dir.path().join("out.html")).unwrap_err();
        assert!(err.to_string().contains("Invalid report JSON"));
    }
}
