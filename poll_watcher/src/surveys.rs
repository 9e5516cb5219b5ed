use serde::Deserialize;
use serde_json::Value;
use shared::dawum::{ApiSurvey, SurveyScope};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    pub id: String,
    /// ISO date, so string order is date order.
    pub date: String,
    pub institute_id: u32,
    pub results: BTreeMap<String, f64>,
}

impl Survey {
    fn from_api(id: &str, survey: ApiSurvey) -> Self {
        Self {
            id: id.to_string(),
            date: survey.date,
            institute_id: survey.institute_id,
            results: survey.results,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FederalSurveys {
    /// Every federal survey id in the document, including ones whose record
    /// could not be decoded.
    pub ids: BTreeSet<String>,
    /// The decodable surveys, newest first.
    pub surveys: Vec<Survey>,
}

/// Extracts the federal election surveys from a dawum document.
///
/// A document without a `Surveys` map yields nothing. An entry only needs a
/// readable `Parliament_ID` to be counted; entries whose remaining fields fail
/// to decode are counted but not rendered.
pub fn federal_surveys(data: &Value) -> FederalSurveys {
    let Some(entries) = data.get("Surveys").and_then(Value::as_object) else {
        return FederalSurveys::default();
    };

    let mut federal = FederalSurveys::default();
    for (id, raw) in entries {
        let is_federal = SurveyScope::deserialize(raw).is_ok_and(|scope| scope.is_federal());
        if !is_federal {
            continue;
        }

        federal.ids.insert(id.clone());
        match ApiSurvey::deserialize(raw) {
            Ok(survey) => federal.surveys.push(Survey::from_api(id, survey)),
            Err(e) => warn!(id = %id, error = %e, "federal survey could not be decoded, not rendering it"),
        }
    }

    federal
        .surveys
        .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    federal
}
