//! Backend Payload Models
//!
//! Data structures matching the FloraFind backend responses. Every optional
//! field defaults so a partial payload still renders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerant decoders for columns the backend may send as numbers, numeric
/// strings or null.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    pub fn option_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        option_f64(d).map(|v| v.unwrap_or(0.0))
    }

    /// Missing and `null` both decode to `T::default()`
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    /// Season → task → tip, keeping only tips that are text
    pub fn tips<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, BTreeMap<String, String>>, D::Error> {
        let Some(Value::Object(seasons)) = Option::<Value>::deserialize(d)? else {
            return Ok(BTreeMap::new());
        };
        Ok(seasons
            .into_iter()
            .filter_map(|(season, tasks)| match tasks {
                Value::Object(tasks) => Some((
                    season,
                    tasks
                        .into_iter()
                        .filter_map(|(task, tip)| match tip {
                            Value::String(tip) => Some((task, tip)),
                            _ => None,
                        })
                        .collect(),
                )),
                _ => None,
            })
            .collect())
    }

    pub fn option_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

// ========================
// Search
// ========================

/// Plant record returned by search and location suggestions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plant {
    #[serde(default)]
    pub plant_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub scientific_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub climate: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub care_instructions: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub eco_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub difficulty_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub native_region: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub growth_height: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub cultural_significance: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub medicinal_properties: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Token {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PosTag {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub pos: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedEntity {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub dep: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub head: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lemma {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub lemma: String,
}

/// NLP breakdown of the user's query, attached to bot replies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NlpAnalysis {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tokenization: Vec<Token>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub pos_tagging: Vec<PosTag>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub ner: Vec<NamedEntity>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub dependency_parsing: Vec<Dependency>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub lemmatization: Vec<Lemma>,
}

impl NlpAnalysis {
    pub fn is_empty(&self) -> bool {
        self.tokenization.is_empty()
            && self.pos_tagging.is_empty()
            && self.ner.is_empty()
            && self.dependency_parsing.is_empty()
            && self.lemmatization.is_empty()
    }
}

// ========================
// Care calendar
// ========================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Watering {
    #[serde(default)]
    pub frequency_days: Option<u32>,
    #[serde(default)]
    pub next_due: Option<String>,
}

/// Backend-computed care schedule for one plant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CareSchedule {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub plant_name: String,
    #[serde(default)]
    pub current_season: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub watering: Watering,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub eco_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub difficulty_level: Option<String>,
    /// season -> (task -> instruction)
    #[serde(default, deserialize_with = "lenient::tips")]
    pub care_tips: BTreeMap<String, BTreeMap<String, String>>,
}

// ========================
// Garden
// ========================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GardenPlantInfo {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub user_plant_id: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub plant_id: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub scientific_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub health_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub date_planted: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub eco_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub notes: Option<String>,
}

impl GardenPlantInfo {
    /// Nickname when set, otherwise the species name
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GardenCareTask {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub task: String,
    #[serde(default)]
    pub next_due: Option<String>,
    #[serde(default)]
    pub frequency_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GardenEntry {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub plant_info: GardenPlantInfo,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub care_schedule: Vec<GardenCareTask>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GardenResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub garden: Vec<GardenEntry>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub total_plants: u32,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_eco_impact: f64,
}

/// Header figures shown above the garden grid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GardenSummary {
    pub total_plants: u32,
    pub average_health: u32,
    pub total_eco_impact: f64,
}

impl GardenResponse {
    pub fn summary(&self) -> GardenSummary {
        let average_health = if self.garden.is_empty() {
            0
        } else {
            let sum: f64 = self
                .garden
                .iter()
                .map(|e| e.plant_info.health_score.unwrap_or(0.0))
                .sum();
            (sum / self.garden.len() as f64).round() as u32
        };
        GardenSummary {
            total_plants: self.total_plants,
            average_health,
            total_eco_impact: self.total_eco_impact,
        }
    }
}

// ========================
// Community
// ========================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub challenge_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_text")]
    pub prize_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChallengesResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub challenges: Vec<Challenge>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub plant_health_points: i64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub level: u32,
    #[serde(default)]
    pub total_plants: Option<u32>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub avg_health_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub leaderboard: Vec<LeaderboardEntry>,
}

// ========================
// Actions
// ========================

/// Generic `{success, message}` acknowledgement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompleteTaskResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub points_earned: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationSuggestions {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub eco_tips: Vec<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub climate_suggestions: Vec<Plant>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_eco_impact: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub points: i64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub badges: u32,
}

fn default_level() -> u32 {
    1
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            points: 0,
            level: default_level(),
            badges: 0,
        }
    }
}

// ========================
// Query
// ========================

/// Wire shape of `/query`; classified into [`QueryOutcome`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQueryResponse {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub plant: Option<Plant>,
    #[serde(default)]
    pub care_schedule: Option<CareSchedule>,
    #[serde(default)]
    pub plants: Option<Vec<Plant>>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_eco_impact: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub nlp_analysis_details: Option<NlpAnalysis>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    CareCalendar {
        plant_id: Option<u32>,
        schedule: CareSchedule,
    },
    Plants {
        plants: Vec<Plant>,
        total_eco_impact: f64,
        analysis: Option<NlpAnalysis>,
    },
    Message {
        message: String,
        suggestions: Vec<String>,
        analysis: Option<NlpAnalysis>,
    },
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryReply {
    pub outcome: QueryOutcome,
    pub language: Option<String>,
}

impl RawQueryResponse {
    /// Same precedence the chat view applies: calendar, then plant list, then message.
    pub fn into_reply(self) -> QueryReply {
        let analysis = self.nlp_analysis_details.filter(|a| !a.is_empty());
        let outcome = match (self.kind.as_deref(), self.care_schedule, self.plants, self.message) {
            (Some("care_calendar"), Some(schedule), _, _) => QueryOutcome::CareCalendar {
                plant_id: self.plant.and_then(|p| p.plant_id),
                schedule,
            },
            (_, _, Some(plants), _) => QueryOutcome::Plants {
                plants,
                total_eco_impact: self.total_eco_impact,
                analysis,
            },
            (_, _, None, Some(message)) => QueryOutcome::Message {
                message,
                suggestions: self.suggestions,
                analysis,
            },
            _ => QueryOutcome::Nothing,
        };
        QueryReply {
            outcome,
            language: self.language,
        }
    }
}
