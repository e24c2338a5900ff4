use super::model::{Financials, LocalResource, MarketAnalysis, ViabilityReport};

pub const BRAND: &str = "SparkLocal";

/// Smallest unit of page content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Paragraph(String),
    /// Label/value rows
    Facts(Vec<(String, String)>),
    Bullets(Vec<String>),
    /// Numbered steps
    Steps(Vec<String>),
    Score { score: u8, verdict: String },
    Resources(Vec<LocalResource>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub name: String,
    pub blocks: Vec<Block>,
}

/// Laid-out report, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    /// Footer for page `index` (0-based)
    pub fn footer(&self, index: usize) -> String {
        format!("{} · {} · Page {} / {}", BRAND, self.title, index + 1, self.pages.len())
    }
}

/// Map report fields onto pages.
///
/// The cover and executive summary are always present; every other page only
/// appears when its backing data does.
pub fn layout(report: &ViabilityReport) -> Document {
    let mut pages = vec![cover_page(report), summary_page(report)];

    if let Some(market) = report.market.as_ref() {
        pages.push(market_page(market));
    }
    if let Some(financials) = report.financials.as_ref() {
        pages.push(financials_page(financials));
    }
    if !report.strengths.is_empty() || !report.risks.is_empty() {
        pages.push(strengths_risks_page(report));
    }
    if !report.next_steps.is_empty() {
        pages.push(Page {
            name: "Action Plan".to_string(),
            blocks: vec![
                Block::Heading("Action Plan".to_string()),
                Block::Steps(report.next_steps.clone()),
            ],
        });
    }
    if !report.resources.is_empty() {
        pages.push(Page {
            name: "Local Resources".to_string(),
            blocks: vec![
                Block::Heading("Local Resources".to_string()),
                Block::Resources(report.resources.clone()),
            ],
        });
    }

    Document {
        title: report.idea_name.clone(),
        pages,
    }
}

fn cover_page(report: &ViabilityReport) -> Page {
    let mut blocks = vec![
        Block::Title(format!("{} Viability Report", report.idea_name)),
        Block::Score {
            score: report.viability_score,
            verdict: report.verdict().to_string(),
        },
    ];

    let mut facts = Vec::new();
    if let Some(location) = report.location.as_deref().filter(|l| !l.trim().is_empty()) {
        facts.push(("Location".to_string(), location.to_string()));
    }
    if let Some(date) = report.generated_at.as_deref().filter(|d| !d.trim().is_empty()) {
        facts.push(("Prepared".to_string(), date.to_string()));
    }
    if !facts.is_empty() {
        blocks.push(Block::Facts(facts));
    }

    Page {
        name: "Cover".to_string(),
        blocks,
    }
}

fn summary_page(report: &ViabilityReport) -> Page {
    Page {
        name: "Executive Summary".to_string(),
        blocks: vec![
            Block::Heading("Executive Summary".to_string()),
            Block::Paragraph(report.summary.clone()),
        ],
    }
}

fn market_page(market: &MarketAnalysis) -> Page {
    let mut blocks = vec![Block::Heading("Market Analysis".to_string())];

    let facts: Vec<(String, String)> = [
        ("Target customers", &market.target_customers),
        ("Market size", &market.market_size),
        ("Growth trend", &market.growth_trend),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| (label.to_string(), v.clone())))
    .collect();
    if !facts.is_empty() {
        blocks.push(Block::Facts(facts));
    }

    if !market.competitors.is_empty() {
        blocks.push(Block::Heading("Competitors".to_string()));
        blocks.push(Block::Bullets(market.competitors.clone()));
    }

    Page {
        name: "Market Analysis".to_string(),
        blocks,
    }
}

fn financials_page(f: &Financials) -> Page {
    let mut facts = vec![(
        "Startup cost".to_string(),
        format!("{} – {}", format_usd(f.startup_cost_low), format_usd(f.startup_cost_high)),
    )];
    if let Some(revenue) = f.monthly_revenue_estimate {
        facts.push(("Monthly revenue".to_string(), format_usd(revenue)));
    }
    if let Some(expenses) = f.monthly_expenses_estimate {
        facts.push(("Monthly expenses".to_string(), format_usd(expenses)));
    }
    if let Some(months) = f.break_even_months {
        facts.push(("Break-even".to_string(), format!("{} months", months)));
    }

    Page {
        name: "Financial Snapshot".to_string(),
        blocks: vec![Block::Heading("Financial Snapshot".to_string()), Block::Facts(facts)],
    }
}

fn strengths_risks_page(report: &ViabilityReport) -> Page {
    let mut blocks = Vec::new();
    if !report.strengths.is_empty() {
        blocks.push(Block::Heading("Strengths".to_string()));
        blocks.push(Block::Bullets(report.strengths.clone()));
    }
    if !report.risks.is_empty() {
        blocks.push(Block::Heading("Risks".to_string()));
        blocks.push(Block::Bullets(report.risks.clone()));
    }
    Page {
        name: "Strengths & Risks".to_string(),
        blocks,
    }
}

/// `12500` -> `$12,500`
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ViabilityReport {
        ViabilityReport::from_json(
            r#"{"ideaName": "Food Truck", "summary": "Busy downtown lunch crowd.", "viabilityScore": 64}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_report_has_two_pages() {
        let doc = layout(&minimal());
        let names: Vec<_> = doc.pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cover", "Executive Summary"]);
        assert_eq!(doc.footer(1), "SparkLocal · Food Truck · Page 2 / 2");
    }

    #[test]
    fn test_optional_pages_follow_data() {
        let mut report = minimal();
        report.risks = vec!["Permits take months".to_string()];
        report.next_steps = vec!["Visit the county health department".to_string()];
        report.financials = Some(Financials {
            startup_cost_low: 50_000,
            startup_cost_high: 120_000,
            monthly_revenue_estimate: None,
            monthly_expenses_estimate: Some(8_000),
            break_even_months: Some(18),
        });

        let doc = layout(&report);
        let names: Vec<_> = doc.pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Cover", "Executive Summary", "Financial Snapshot", "Strengths & Risks", "Action Plan"]
        );

        let risks_page = &doc.pages[3];
        assert!(!risks_page.blocks.contains(&Block::Heading("Strengths".to_string())));

        let Block::Facts(facts) = &doc.pages[2].blocks[1] else {
            panic!("expected facts block");
        };
        assert_eq!(facts[0].1, "$50,000 – $120,000");
        assert!(!facts.iter().any(|(label, _)| label == "Monthly revenue"));
        assert_eq!(facts.last().unwrap().1, "18 months");
    }

    #[test]
    fn test_cover_skips_blank_location() {
        let mut report = minimal();
        report.location = Some("  ".to_string());
        let doc = layout(&report);
        assert_eq!(doc.pages[0].blocks.len(), 2);

        report.location = Some("Austin, TX".to_string());
        let doc = layout(&report);
        assert_eq!(
            doc.pages[0].blocks[2],
            Block::Facts(vec![("Location".to_string(), "Austin, TX".to_string())])
        );
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0), "$0");
        assert_eq!(format_usd(999), "$999");
        assert_eq!(format_usd(1000), "$1,000");
        assert_eq!(format_usd(1234567), "$1,234,567");
    }
}
