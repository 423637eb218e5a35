//! Gemini `generateContent` wire format.
//!
//! Only the subset of the API this crate uses. Structured operations attach
//! a JSON response schema; property names in those schemas are snake_case so
//! the payloads deserialize directly into the crate's types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::text("user", text)
    }

    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }

    /// System instructions carry no role.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: Value,
}

impl GenerationConfig {
    pub fn structured_json(schema: Value) -> Self {
        Self {
            response_mime_type: "application/json",
            response_schema: schema,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Content,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if candidate.content.parts.is_empty() {
            return None;
        }
        Some(
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect(),
        )
    }
}

/// Schema for regulatory discovery.
pub(crate) fn discovery_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Nombre oficial de la NOM o Ley" },
            "description": { "type": "STRING", "description": "Descripción técnica del requisito" },
            "category": { "type": "STRING", "description": "Categoría (ej: Ambiental, Seguridad, Fiscal)" },
            "iso_impact": { "type": "STRING" },
            "impact_level": { "type": "STRING", "enum": ["Alto", "Medio", "Bajo"] },
            "ai_summary": { "type": "STRING", "description": "Resumen ejecutivo para Gerente de Planta" },
            "action_steps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "estimated_fine": { "type": "STRING", "description": "Multa real según Ley Federal de Derechos o Reglamento" },
            "deadline": { "type": "STRING", "description": "Fecha límite crítica o plazo en días (ej: 45 días)" },
            "compliance_progress": { "type": "INTEGER", "description": "Estimación de cumplimiento inicial típico (0-100)" }
        },
        "required": ["title", "description", "impact_level", "action_steps", "estimated_fine", "deadline"]
    })
}

/// Schema for deep analysis of a single law.
pub(crate) fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ai_summary": { "type": "STRING" },
            "action_steps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "estimated_fine": { "type": "STRING" },
            "deadline": { "type": "STRING" },
            "compliance_progress": { "type": "INTEGER" }
        }
    })
}

/// Schema for evidence audit verdicts.
pub(crate) fn audit_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "compliant": { "type": "BOOLEAN" },
            "verdict_title": { "type": "STRING", "description": "Título corto del dictamen (ej: Vencido, Cumple Parcialmente)" },
            "analysis": { "type": "STRING", "description": "Análisis detallado técnico citando normas específicas" },
            "confidence": { "type": "NUMBER", "description": "Nivel de confianza 0-100" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text("hola")],
            system_instruction: Some(Content::system("persona")),
            generation_config: Some(GenerationConfig::structured_json(analysis_schema())),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn first_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hola " }, { "text": "mundo" }] }
            }]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Hola mundo"));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(response.first_text().is_none());
    }
}
