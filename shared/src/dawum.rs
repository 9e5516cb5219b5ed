//! Wire types for the dawum.de polling data API.
//!
//! The root document carries many lookup maps (parliaments, institutes,
//! parties); only the `Surveys` map is modelled here.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DAWUM_API_URL: &str = "https://api.dawum.de/";

/// `Parliament_ID` of the federal parliament (Bundestag).
pub const FEDERAL_PARLIAMENT_ID: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DawumRoot {
    #[serde(rename = "Surveys", default)]
    pub surveys: BTreeMap<String, ApiSurvey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiSurvey {
    pub date: String,
    #[serde(rename = "Parliament_ID", deserialize_with = "numeric_id")]
    pub parliament_id: u32,
    #[serde(rename = "Institute_ID", deserialize_with = "numeric_id")]
    pub institute_id: u32,
    #[serde(default)]
    pub results: BTreeMap<String, f64>,
}

/// Just the election scope of a survey entry. Decodes even when the rest of
/// the record is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SurveyScope {
    #[serde(rename = "Parliament_ID", deserialize_with = "numeric_id")]
    pub parliament_id: u32,
}

impl SurveyScope {
    pub fn is_federal(&self) -> bool {
        self.parliament_id == FEDERAL_PARLIAMENT_ID
    }
}

/// Accepts ids encoded either as JSON numbers or as numeric strings.
fn numeric_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl de::Visitor<'_> for IdVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer id or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
