//! Per-state "how to start a business" guides.
//!
//! The dataset is static: one entry per state plus DC. Titles, descriptions
//! and FAQ entries are generated from the state name so every guide page has
//! the same shape.

mod data;

use serde::Serialize;
use std::fmt;

use data::STATE_GUIDES;

/// US Census region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Northeast,
    Midwest,
    South,
    West,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Midwest => "midwest",
            Region::South => "south",
            Region::West => "west",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "northeast" => Some(Region::Northeast),
            "midwest" => Some(Region::Midwest),
            "south" => Some(Region::South),
            "west" => Some(Region::West),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One state's guide entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateGuide {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub slug: &'static str,
    pub region: Region,
}

/// A question/answer pair shown on a guide page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl StateGuide {
    pub fn title(&self) -> String {
        format!("How to Start a Business in {} (Step-by-Step Guide)", self.name)
    }

    pub fn meta_description(&self) -> String {
        format!(
            "Everything you need to start a business in {}: choosing a structure, registering with the state, \
             licenses and permits, taxes, and local resources.",
            self.name
        )
    }

    pub fn faqs(&self) -> Vec<Faq> {
        let n = self.name;
        vec![
            Faq {
                question: format!("How do I register a business in {}?", n),
                answer: format!(
                    "Choose a business structure, pick an available name, and file formation documents with the \
                     {} Secretary of State (or equivalent agency). Sole proprietors operating under their own \
                     name usually only need local licenses.",
                    n
                ),
            },
            Faq {
                question: format!("Do I need an LLC to start a business in {}?", n),
                answer: format!(
                    "No. An LLC is optional in {}, but it separates personal and business liability and is the \
                     most common choice for small businesses.",
                    n
                ),
            },
            Faq {
                question: format!("What licenses and permits does a {} business need?", n),
                answer: format!(
                    "Requirements depend on your industry and city. Most {} businesses need a local business \
                     license, and regulated trades (food, construction, cosmetology) need state permits as well.",
                    n
                ),
            },
            Faq {
                question: format!("Do I need to register for taxes in {}?", n),
                answer: format!(
                    "If you sell taxable goods or services or hire employees, register with the {} tax agency. \
                     You will also need a federal EIN from the IRS if you have employees or form an LLC with \
                     more than one member.",
                    n
                ),
            },
            Faq {
                question: format!("Where can I find free help starting a business in {}?", n),
                answer: format!(
                    "Small Business Development Centers (SBDCs), SCORE mentors, and local chambers of commerce \
                     across {} offer free advising, workshops, and funding guidance.",
                    n
                ),
            },
        ]
    }
}

/// All guides, ordered by state name
pub fn all_guides() -> &'static [StateGuide] {
    &STATE_GUIDES
}

pub fn guide_slugs() -> Vec<&'static str> {
    STATE_GUIDES.iter().map(|g| g.slug).collect()
}

pub fn guide_by_slug(slug: &str) -> Option<&'static StateGuide> {
    let slug = slug.trim().trim_matches('/');
    STATE_GUIDES.iter().find(|g| g.slug == slug)
}

/// Case-insensitive postal abbreviation lookup
pub fn guide_by_abbreviation(abbreviation: &str) -> Option<&'static StateGuide> {
    let abbreviation = abbreviation.trim();
    STATE_GUIDES
        .iter()
        .find(|g| g.abbreviation.eq_ignore_ascii_case(abbreviation))
}

pub fn guides_in_region(region: Region) -> Vec<&'static StateGuide> {
    STATE_GUIDES.iter().filter(|g| g.region == region).collect()
}
