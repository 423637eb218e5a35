//! Derived read models over the law book.
//!
//! Nothing here is stored. Tab filtering, search, and the aggregate
//! compliance figure are recomputed from the records on every request, so
//! a view can never go stale relative to the book it was derived from.

use serde::{Deserialize, Serialize};

use crate::law::Law;

/// Navigation tab scoping a law listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NavTab {
    /// Unfiltered monitor view.
    #[default]
    #[serde(rename = "Monitor")]
    Monitor,
    /// Live audit workspace. Same record set as the monitor.
    #[serde(rename = "Auditoría Viva")]
    AuditoriaViva,
    /// Environmental matrix: ISO 14001 impact or the Ambiental category.
    #[serde(rename = "Matriz ISO 14001")]
    MatrizIso14001,
    /// Safety matrix: ISO 45001 impact or the Seguridad category.
    #[serde(rename = "Matriz ISO 45001")]
    MatrizIso45001,
}

impl NavTab {
    /// Parse a tab name from a query parameter. Unknown values fall back to
    /// the unfiltered monitor view rather than erroring.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "Monitor" => NavTab::Monitor,
            "Auditoría Viva" => NavTab::AuditoriaViva,
            "Matriz ISO 14001" => NavTab::MatrizIso14001,
            "Matriz ISO 45001" => NavTab::MatrizIso45001,
            other => {
                tracing::debug!(tab = other, "unknown tab, using monitor view");
                NavTab::Monitor
            }
        }
    }

    /// Whether a law belongs to this tab's scope.
    fn matches(&self, law: &Law) -> bool {
        match self {
            NavTab::Monitor | NavTab::AuditoriaViva => true,
            NavTab::MatrizIso14001 => {
                law.iso_impact
                    .as_deref()
                    .is_some_and(|iso| iso.contains("14001"))
                    || law.category == "Ambiental"
            }
            NavTab::MatrizIso45001 => {
                law.iso_impact
                    .as_deref()
                    .is_some_and(|iso| iso.contains("45001"))
                    || law.category == "Seguridad"
            }
        }
    }
}

/// A filtered listing plus the figures derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredView {
    pub laws: Vec<Law>,
    /// Number of records in the view.
    pub total: usize,
    /// Mean `compliance_progress` across the view, rounded half away from
    /// zero. Records without a progress value count as zero. Empty view is 0.
    pub compliance_pct: u8,
}

/// Derive the listing for a tab and search query.
///
/// Tab scoping applies first, then a case-insensitive substring match of the
/// query against title and description. Relative order of the input is
/// preserved.
pub fn derive_view(laws: &[Law], tab: NavTab, query: &str) -> FilteredView {
    let needle = query.trim().to_lowercase();
    let selected: Vec<Law> = laws
        .iter()
        .filter(|law| tab.matches(law))
        .filter(|law| {
            needle.is_empty()
                || law.title.to_lowercase().contains(&needle)
                || law.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    let compliance_pct = mean_compliance(&selected);
    FilteredView {
        total: selected.len(),
        compliance_pct,
        laws: selected,
    }
}

fn mean_compliance(laws: &[Law]) -> u8 {
    if laws.is_empty() {
        return 0;
    }
    let total: u64 = laws
        .iter()
        .map(|law| u64::from(law.compliance_progress.unwrap_or(0)))
        .sum();
    (total as f64 / laws.len() as f64).round() as u8
}
