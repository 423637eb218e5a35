//! The law record.
//!
//! A [`Law`] starts life with the fields regulatory monitoring knows up
//! front. The AI-derived fields (`ai_summary`, `action_steps`,
//! `estimated_fine`, `deadline`, `compliance_progress`) are optional and are
//! filled in later by applying a [`LawAnalysis`] merge patch. Enum values
//! serialize as the Spanish display strings the product uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use legitech_core::LawId;

/// Business impact severity of a regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    #[serde(rename = "Alto")]
    Alto,
    #[serde(rename = "Medio")]
    Medio,
    #[serde(rename = "Bajo")]
    Bajo,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Alto => "Alto",
            ImpactLevel::Medio => "Medio",
            ImpactLevel::Bajo => "Bajo",
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compliance state of a tracked law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LawStatus {
    #[serde(rename = "Vencido")]
    Vencido,
    #[serde(rename = "Cumple")]
    Cumple,
    #[serde(rename = "Pendiente")]
    Pendiente,
    #[serde(rename = "En Revisión")]
    EnRevision,
}

impl LawStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LawStatus::Vencido => "Vencido",
            LawStatus::Cumple => "Cumple",
            LawStatus::Pendiente => "Pendiente",
            LawStatus::EnRevision => "En Revisión",
        }
    }
}

impl std::fmt::Display for LawStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked law or regulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Law {
    pub id: LawId,
    pub title: String,
    pub description: String,
    /// Free-form category ("Ambiental", "Seguridad", ...). Discovery may
    /// produce categories outside the known set, so this stays a string.
    pub category: String,
    /// ISO standard the law maps onto, when known ("ISO 14001", "ISO 45001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_impact: Option<String>,
    pub impact_level: ImpactLevel,
    pub status: LawStatus,
    pub date_added: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_fine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Completion percentage, 0 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_progress: Option<u8>,
}

impl Law {
    /// Whether deep analysis has already been applied. Enrichment is
    /// keyed on the summary: once present, the record is never re-analyzed.
    pub fn is_enriched(&self) -> bool {
        self.ai_summary.is_some()
    }

    /// Merge an analysis patch into the record. Fields absent from the
    /// patch keep their current values.
    pub fn apply_analysis(&mut self, analysis: &LawAnalysis) {
        if let Some(summary) = &analysis.ai_summary {
            self.ai_summary = Some(summary.clone());
        }
        if let Some(steps) = &analysis.action_steps {
            self.action_steps = Some(steps.clone());
        }
        if let Some(fine) = &analysis.estimated_fine {
            self.estimated_fine = Some(fine.clone());
        }
        if let Some(deadline) = &analysis.deadline {
            self.deadline = Some(deadline.clone());
        }
        if let Some(progress) = analysis.compliance_progress {
            self.compliance_progress = Some(progress.min(100));
        }
    }
}

/// Partial update produced by deep analysis of a single law.
///
/// Every field is optional so a degraded analysis (summary only) still
/// merges cleanly without clobbering what the record already holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_fine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_progress: Option<u8>,
}

impl LawAnalysis {
    /// Fallback patch used when the advisory service cannot be reached.
    /// Labels the record as unanalyzed instead of failing the request.
    pub fn unavailable() -> Self {
        Self {
            ai_summary: Some("Análisis no disponible en este momento.".to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_law() -> Law {
        Law {
            id: LawId::new(),
            title: "NOM-001-TEST".to_string(),
            description: "Regulación de prueba".to_string(),
            category: "Ambiental".to_string(),
            iso_impact: Some("ISO 14001".to_string()),
            impact_level: ImpactLevel::Medio,
            status: LawStatus::Pendiente,
            date_added: Utc::now(),
            ai_summary: None,
            action_steps: None,
            estimated_fine: None,
            deadline: None,
            compliance_progress: None,
        }
    }

    #[test]
    fn status_serializes_spanish_values() {
        assert_eq!(
            serde_json::to_string(&LawStatus::EnRevision).unwrap(),
            "\"En Revisión\""
        );
        assert_eq!(
            serde_json::to_string(&LawStatus::Vencido).unwrap(),
            "\"Vencido\""
        );
        let status: LawStatus = serde_json::from_str("\"Cumple\"").unwrap();
        assert_eq!(status, LawStatus::Cumple);
    }

    #[test]
    fn enrichment_is_keyed_on_summary() {
        let mut law = bare_law();
        assert!(!law.is_enriched());
        law.apply_analysis(&LawAnalysis {
            ai_summary: Some("Resumen".to_string()),
            ..LawAnalysis::default()
        });
        assert!(law.is_enriched());
    }

    #[test]
    fn analysis_merges_without_clobbering() {
        let mut law = bare_law();
        law.estimated_fine = Some("$1M MXN".to_string());

        law.apply_analysis(&LawAnalysis {
            ai_summary: Some("Resumen".to_string()),
            action_steps: Some(vec!["Paso 1".to_string()]),
            ..LawAnalysis::default()
        });

        assert_eq!(law.ai_summary.as_deref(), Some("Resumen"));
        assert_eq!(law.action_steps.as_deref(), Some(&["Paso 1".to_string()][..]));
        // Absent in the patch, so the existing value survives.
        assert_eq!(law.estimated_fine.as_deref(), Some("$1M MXN"));
    }

    #[test]
    fn compliance_progress_is_clamped() {
        let mut law = bare_law();
        law.apply_analysis(&LawAnalysis {
            compliance_progress: Some(250),
            ..LawAnalysis::default()
        });
        assert_eq!(law.compliance_progress, Some(100));
    }

    #[test]
    fn unavailable_patch_only_labels_the_summary() {
        let patch = LawAnalysis::unavailable();
        assert_eq!(
            patch.ai_summary.as_deref(),
            Some("Análisis no disponible en este momento.")
        );
        assert!(patch.action_steps.is_none());
        assert!(patch.compliance_progress.is_none());
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let law = bare_law();
        let json = serde_json::to_value(&law).unwrap();
        assert!(json.get("ai_summary").is_none());
        assert!(json.get("deadline").is_none());
        assert_eq!(json["iso_impact"], "ISO 14001");
    }
}
