//! Raw dataset item shapes returned by the Apify actors.
//!
//! The profile actor has shipped two layouts over time: a flat one
//! (`fullName`, `headline`, `experiences`) and a nested one
//! (`basic_info.fullname`, `experience`). Both are captured here with every
//! field optional; [`crate::normalize`] decides what is mandatory.
//!
//! Keys that mean the same thing across layouts are kept as separate fields
//! rather than serde aliases, since an item carrying both would otherwise be
//! rejected as a duplicate field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a list, dropping elements that do not fit `T`.
///
/// `null`, a missing key, or a non-array value all yield an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

// ---------------------------------------------------------------------------
// Individual profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawIndividual {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub headline: Option<String>,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    #[serde(rename = "currentJobDuration")]
    pub current_job_duration: Option<String>,
    #[serde(rename = "addressWithCountry")]
    pub address: Option<String>,
    pub about: Option<String>,
    pub basic_info: Option<RawBasicInfo>,
    #[serde(deserialize_with = "lenient_list")]
    pub experience: Vec<RawExperience>,
    /// Flat layout name for `experience`.
    #[serde(deserialize_with = "lenient_list")]
    pub experiences: Vec<RawExperience>,
    #[serde(deserialize_with = "lenient_list")]
    pub skills: Vec<RawSkill>,
    #[serde(deserialize_with = "lenient_list")]
    pub projects: Vec<RawProject>,
    pub error: Option<Value>,
}

/// Nested `basic_info` block of the newer profile layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawBasicInfo {
    pub fullname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawLocation {
    Text(String),
    Structured {
        #[serde(default)]
        full: Option<String>,
        #[serde(default)]
        city: Option<String>,
        #[serde(default)]
        country: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawExperience {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    /// Flat layout puts `"Acme · Full-time"` here.
    pub subtitle: Option<String>,
    pub duration: Option<String>,
    /// Flat layout puts the date range here.
    pub caption: Option<String>,
    pub description: Option<String>,
    pub is_current: Option<bool>,
    #[serde(deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSkill {
    Name(String),
    Entry {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProject {
    pub title: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Organization pages
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCompany {
    pub basic_info: Option<RawCompanyInfo>,
    pub stats: Option<RawCompanyStats>,
    pub locations: Option<RawCompanyLocations>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "employeeCount")]
    pub employee_count: Option<u64>,
    #[serde(rename = "followerCount")]
    pub follower_count: Option<u64>,
    pub error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCompanyInfo {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub industries: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub specialties: Vec<String>,
    pub founded_info: Option<RawFounded>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFounded {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCompanyStats {
    pub employee_count: Option<u64>,
    pub follower_count: Option<u64>,
    pub employee_count_range: Option<RawRange>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCompanyLocations {
    pub headquarters: Option<RawAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAddress {
    pub city: Option<String>,
    pub geographic_area: Option<String>,
    pub country: Option<String>,
}
