//! The law book.
//!
//! Insert-ordered collection of tracked laws. Discovery prepends, so the
//! newest record is always first. The book itself knows nothing about tabs
//! or search; derived views live in [`crate::view`].

use chrono::{DateTime, Utc};

use legitech_core::LawId;

use crate::law::{ImpactLevel, Law, LawAnalysis, LawStatus};

/// Ordered collection of law records, newest first.
#[derive(Debug, Clone, Default)]
pub struct LawBook {
    laws: Vec<Law>,
}

impl LawBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book seeded with the base mining knowledge set.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            laws: seed_laws(now),
        }
    }

    pub fn len(&self) -> usize {
        self.laws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laws.is_empty()
    }

    /// All records, newest first.
    pub fn laws(&self) -> &[Law] {
        &self.laws
    }

    pub fn get(&self, id: &LawId) -> Option<&Law> {
        self.laws.iter().find(|law| law.id == *id)
    }

    /// Add a newly discovered law at the front of the book.
    pub fn prepend(&mut self, law: Law) {
        self.laws.insert(0, law);
    }

    /// Apply an analysis patch to a record. Returns the updated record, or
    /// `None` if the id is unknown. Position in the book is unchanged.
    pub fn apply_analysis(&mut self, id: &LawId, analysis: &LawAnalysis) -> Option<Law> {
        let law = self.laws.iter_mut().find(|law| law.id == *id)?;
        law.apply_analysis(analysis);
        Some(law.clone())
    }
}

/// The two base-knowledge records every fresh deployment starts with.
fn seed_laws(now: DateTime<Utc>) -> Vec<Law> {
    vec![
        Law {
            id: LawId::new(),
            title: "Reforma NOM-141-SEMARNAT: Presas de Jales".to_string(),
            description: "Nuevos criterios de caracterización de jales mineros y \
                          especificaciones para la preparación del sitio, proyecto, \
                          construcción y cierre."
                .to_string(),
            category: "Ambiental".to_string(),
            iso_impact: Some("ISO 14001".to_string()),
            impact_level: ImpactLevel::Alto,
            status: LawStatus::Vencido,
            date_added: now,
            ai_summary: None,
            action_steps: Some(vec![
                "Auditoría de estabilidad física de presas - Superintendente de Planta"
                    .to_string(),
                "Actualizar análisis de lixiviados (CRIT) - Laboratorio Externo".to_string(),
                "Revisión de fianza ambiental - Jurídico".to_string(),
            ]),
            estimated_fine: Some("$2.5M - $8M MXN".to_string()),
            deadline: Some("45 días (Crítico)".to_string()),
            compliance_progress: Some(25),
        },
        Law {
            id: LawId::new(),
            title: "NOM-023-STPS-2012: Ventilación en Minas Subterráneas".to_string(),
            description: "Actualización de protocolos de monitoreo de gases y tiempos de \
                          reentrada post-voladura."
                .to_string(),
            category: "Seguridad".to_string(),
            iso_impact: Some("ISO 45001".to_string()),
            impact_level: ImpactLevel::Alto,
            status: LawStatus::EnRevision,
            date_added: now,
            ai_summary: None,
            action_steps: Some(vec![
                "Calibración de detectores multigás - Mantenimiento".to_string(),
                "Capacitación a brigadas de rescate - Seguridad e Higiene".to_string(),
            ]),
            estimated_fine: Some("5,000 UMAS".to_string()),
            deadline: Some("15 de Diciembre, 2024".to_string()),
            compliance_progress: Some(60),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_law(title: &str) -> Law {
        Law {
            id: LawId::new(),
            title: title.to_string(),
            description: String::new(),
            category: "General".to_string(),
            iso_impact: None,
            impact_level: ImpactLevel::Bajo,
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
    fn seeded_book_has_base_knowledge() {
        let book = LawBook::seeded(Utc::now());
        assert_eq!(book.len(), 2);
        assert!(book.laws()[0].title.contains("NOM-141-SEMARNAT"));
        assert!(book.laws()[1].title.contains("NOM-023-STPS"));
        assert_eq!(book.laws()[0].compliance_progress, Some(25));
        assert_eq!(book.laws()[1].compliance_progress, Some(60));
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut book = LawBook::seeded(Utc::now());
        let law = sample_law("Nueva regulación");
        let id = law.id;
        book.prepend(law);
        assert_eq!(book.len(), 3);
        assert_eq!(book.laws()[0].id, id);
    }

    #[test]
    fn apply_analysis_updates_in_place() {
        let mut book = LawBook::seeded(Utc::now());
        let id = book.laws()[1].id;
        let updated = book
            .apply_analysis(
                &id,
                &LawAnalysis {
                    ai_summary: Some("Resumen".to_string()),
                    ..LawAnalysis::default()
                },
            )
            .unwrap();
        assert!(updated.is_enriched());
        // Position unchanged.
        assert_eq!(book.laws()[1].id, id);
        assert!(book.get(&id).unwrap().is_enriched());
    }

    #[test]
    fn apply_analysis_unknown_id_is_none() {
        let mut book = LawBook::new();
        assert!(book
            .apply_analysis(&LawId::new(), &LawAnalysis::default())
            .is_none());
    }
}
