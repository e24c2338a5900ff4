//! Text progress bar.

use std::fmt;

const FILLED: char = '█';
const EMPTY: char = '░';

/// A bounded value rendered as `label [████░░░░] 40%`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBar {
    pub current: u64,
    pub total: u64,
    pub width: usize,
    pub label: Option<String>,
}

impl ProgressBar {
    pub fn new(current: u64, total: u64) -> Self {
        Self {
            current,
            total,
            width: 20,
            label: None,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Completion in whole percent, clamped to 0..=100. Zero total is 0%.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.current.min(self.total) * 100 / self.total;
        pct as u8
    }

    fn filled_cells(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        let current = self.current.min(self.total) as u128;
        (current * self.width as u128 / self.total as u128) as usize
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = self.filled_cells();
        let bar: String = std::iter::repeat(FILLED)
            .take(filled)
            .chain(std::iter::repeat(EMPTY).take(self.width - filled))
            .collect();

        match &self.label {
            Some(label) => write!(f, "{} [{}] {}%", label, bar, self.percent()),
            None => write!(f, "[{}] {}%", bar, self.percent()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let bar = ProgressBar::new(2, 5).with_width(10);
        assert_eq!(bar.render(), "[████░░░░░░] 40%");
    }

    #[test]
    fn test_label() {
        let bar = ProgressBar::new(10, 10).with_width(4).with_label("Submitting");
        assert_eq!(bar.render(), "Submitting [████] 100%");
    }

    #[test]
    fn test_clamps() {
        assert_eq!(ProgressBar::new(15, 10).percent(), 100);
        assert_eq!(ProgressBar::new(15, 10).with_width(5).render(), "[█████] 100%");
        assert_eq!(ProgressBar::new(3, 0).percent(), 0);
        assert_eq!(ProgressBar::new(3, 0).with_width(3).render(), "[░░░] 0%");
    }

    #[test]
    fn test_rounds_down() {
        assert_eq!(ProgressBar::new(1, 3).percent(), 33);
        assert_eq!(ProgressBar::new(199, 200).percent(), 99);
    }
}
