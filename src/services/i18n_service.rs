//! Translation lookup for user-facing response messages.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};

use crate::AppState;

pub const DEFAULT_LOCALE: &str = "pt-BR";

const PT_BR: &[(&str, &str)] = &[
    ("job.created", "Vaga criada com sucesso"),
    ("job.updated", "Vaga atualizada com sucesso"),
    ("job.deleted", "Vaga excluída com sucesso"),
    ("job.activated", "Vaga ativada"),
    ("job.deactivated", "Vaga desativada"),
    ("application.created", "Candidatura enviada com sucesso"),
    ("application.status_updated", "Status da candidatura atualizado"),
    ("application.withdrawn", "Candidatura cancelada"),
    ("profile.updated", "Perfil atualizado com sucesso"),
    ("skills.updated", "Habilidades atualizadas com sucesso"),
    ("resume.created", "Item do currículo adicionado"),
    ("resume.updated", "Item do currículo atualizado"),
    ("resume.deleted", "Item do currículo removido"),
    ("skill.created", "Habilidade criada"),
    ("area.created", "Área criada"),
];

const EN_US: &[(&str, &str)] = &[
    ("job.created", "Job created successfully"),
    ("job.updated", "Job updated successfully"),
    ("job.deleted", "Job deleted successfully"),
    ("job.activated", "Job activated"),
    ("job.deactivated", "Job deactivated"),
    ("application.created", "Application submitted successfully"),
    ("application.status_updated", "Application status updated"),
    ("application.withdrawn", "Application withdrawn"),
    ("profile.updated", "Profile updated successfully"),
    ("skills.updated", "Skills updated successfully"),
    ("resume.created", "Resume entry added"),
    ("resume.updated", "Resume entry updated"),
    ("resume.deleted", "Resume entry removed"),
    ("skill.created", "Skill created"),
    ("area.created", "Area created"),
];

const ES_ES: &[(&str, &str)] = &[
    ("job.created", "Vacante creada con éxito"),
    ("job.updated", "Vacante actualizada con éxito"),
    ("job.deleted", "Vacante eliminada con éxito"),
    ("application.created", "Postulación enviada con éxito"),
    ("application.status_updated", "Estado de la postulación actualizado"),
    ("application.withdrawn", "Postulación retirada"),
    ("profile.updated", "Perfil actualizado con éxito"),
];

/// Per-locale message tables. Lookups fall back to the default locale and
/// finally to the key itself.
#[derive(Debug, Clone)]
pub struct Localizer {
    default_locale: String,
    tables: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl Localizer {
    pub fn new(default_locale: &str) -> Self {
        let tables: HashMap<_, _> = [("pt-BR", PT_BR), ("en-US", EN_US), ("es-ES", ES_ES)]
            .into_iter()
            .map(|(locale, entries)| (locale, entries.iter().copied().collect()))
            .collect();

        let default_locale = tables
            .keys()
            .find(|l| l.eq_ignore_ascii_case(default_locale))
            .copied()
            .unwrap_or_else(|| {
                tracing::warn!(locale = %default_locale, "unsupported default locale, using {}", DEFAULT_LOCALE);
                DEFAULT_LOCALE
            });

        Self {
            default_locale: default_locale.to_string(),
            tables: Arc::new(tables),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn t(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.default_locale, key))
            .unwrap_or(key)
            .to_string()
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.tables.get(locale)?.get(key).copied()
    }

    /// Picks the best supported locale from an `Accept-Language` header value.
    pub fn negotiate(&self, accept_language: Option<&str>) -> String {
        let mut ranges: Vec<(&str, f32)> = accept_language
            .unwrap_or("")
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let q = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, q))
            })
            .filter(|(_, q)| *q > 0.0)
            .collect();
        ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (tag, _) in ranges {
            if let Some(exact) = self.tables.keys().find(|l| l.eq_ignore_ascii_case(tag)) {
                return exact.to_string();
            }
            let primary = tag.split('-').next().unwrap_or(tag);
            if let Some(partial) = self.tables.keys().find(|l| {
                l.split('-')
                    .next()
                    .map(|p| p.eq_ignore_ascii_case(primary))
                    .unwrap_or(false)
            }) {
                return partial.to_string();
            }
        }
        self.default_locale.clone()
    }
}

/// Locale negotiated for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Locale {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        Ok(Locale(state.localizer.negotiate(header)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_then_key() {
        let l = Localizer::new("pt-BR");
        assert_eq!(l.t("en-US", "job.created"), "Job created successfully");
        // es-ES has no toggle message
        assert_eq!(l.t("es-ES", "job.activated"), "Vaga ativada");
        assert_eq!(l.t("fr-FR", "job.created"), "Vaga criada com sucesso");
        assert_eq!(l.t("en-US", "missing.key"), "missing.key");
    }

    #[test]
    fn negotiates_accept_language() {
        let l = Localizer::new("pt-BR");
        assert_eq!(l.negotiate(None), "pt-BR");
        assert_eq!(l.negotiate(Some("en-US,en;q=0.9")), "en-US");
        assert_eq!(l.negotiate(Some("fr;q=0.9, es;q=0.8")), "es-ES");
        assert_eq!(l.negotiate(Some("de, en-GB;q=0.5")), "en-US");
        assert_eq!(l.negotiate(Some("fr")), "pt-BR");
    }

    #[test]
    fn unknown_default_locale_is_replaced() {
        assert_eq!(Localizer::new("xx-YY").default_locale(), DEFAULT_LOCALE);
        assert_eq!(Localizer::new("en-us").default_locale(), "en-US");
    }
}
