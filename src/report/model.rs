use serde::{Deserialize, Serialize};

use crate::error::{Result, SparkIndexError};

/// A business-idea viability report as produced by the idea evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityReport {
    pub idea_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    pub summary: String,
    /// 0-100
    pub viability_score: u8,
    #[serde(default)]
    pub market: Option<MarketAnalysis>,
    #[serde(default)]
    pub financials: Option<Financials>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub resources: Vec<LocalResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    #[serde(default)]
    pub target_customers: Option<String>,
    #[serde(default)]
    pub market_size: Option<String>,
    #[serde(default)]
    pub growth_trend: Option<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub startup_cost_low: u64,
    pub startup_cost_high: u64,
    #[serde(default)]
    pub monthly_revenue_estimate: Option<u64>,
    #[serde(default)]
    pub monthly_expenses_estimate: Option<u64>,
    #[serde(default)]
    pub break_even_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ViabilityReport {
    pub fn from_json(json: &str) -> Result<Self> {
        let report: ViabilityReport = serde_json::from_str(json)
            .map_err(|e| SparkIndexError::Report(format!("Invalid report JSON: {}", e)))?;
        report.validate()?;
        Ok(report)
    }

    pub fn validate(&self) -> Result<()> {
        if self.idea_name.trim().is_empty() {
            return Err(SparkIndexError::Report("ideaName must not be empty".to_string()));
        }
        if self.viability_score > 100 {
            return Err(SparkIndexError::Report(format!(
                "viabilityScore must be between 0 and 100, got {}",
                self.viability_score
            )));
        }
        if let Some(f) = &self.financials {
            if f.startup_cost_low > f.startup_cost_high {
                return Err(SparkIndexError::Report(
                    "financials.startupCostLow exceeds startupCostHigh".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Verdict band for the score
    pub fn verdict(&self) -> &'static str {
        match self.viability_score {
            80..=100 => "Strong opportunity",
            60..=79 => "Promising with caveats",
            40..=59 => "Needs validation",
            _ => "High risk",
        }
    }
}
