//! Normalization of raw Apify dataset items into profile records.
//!
//! This is the validation boundary: a record missing its mandatory markers
//! fails here with [`ApifyError::Normalization`] instead of reaching the
//! prompt with guessed values.

use coldmail_core::{IndividualProfile, OrganizationProfile};
use serde_json::Value;

use crate::error::ApifyError;
use crate::types::{
    RawAddress, RawCompany, RawExperience, RawIndividual, RawLocation, RawRange, RawSkill,
};

const MAX_SKILLS: usize = 20;
const MAX_PROJECTS: usize = 5;

const FREE_PLAN_MARKER: &str = "free Apify plan";

/// Converts a raw individual item into an [`IndividualProfile`].
///
/// # Errors
///
/// - [`ApifyError::NotFound`] / [`ApifyError::Provider`] if the item carries
///   an `error` field.
/// - [`ApifyError::Normalization`] if no name or no headline can be found.
pub fn normalize_individual(
    identifier: &str,
    raw: RawIndividual,
) -> Result<IndividualProfile, ApifyError> {
    if let Some(err) = raw.error.as_ref() {
        return Err(provider_error(identifier, err));
    }

    let basic = raw.basic_info.unwrap_or_default();

    let full_name = clean(basic.fullname)
        .or_else(|| join_name(basic.first_name.as_deref(), basic.last_name.as_deref()))
        .or_else(|| clean(raw.full_name))
        .or_else(|| join_name(raw.first_name.as_deref(), raw.last_name.as_deref()))
        .ok_or_else(|| ApifyError::Normalization {
            identifier: identifier.to_string(),
            reason: "missing name information; the profile may be private or restricted"
                .to_string(),
        })?;

    let headline = clean(basic.headline)
        .or_else(|| clean(raw.headline))
        .ok_or_else(|| ApifyError::Normalization {
            identifier: identifier.to_string(),
            reason: "missing headline information; the profile may be private or restricted"
                .to_string(),
        })?;

    let experience = if raw.experience.is_empty() {
        raw.experiences
    } else {
        raw.experience
    };
    let current_idx = experience
        .iter()
        .position(|e| e.is_current == Some(true))
        .unwrap_or(0);
    let current = experience.get(current_idx);
    let previous = experience
        .iter()
        .enumerate()
        .find(|(i, _)| *i != current_idx)
        .map(|(_, e)| e);

    let role = clean(raw.job_title).or_else(|| current.and_then(|e| clean(e.title.clone())));
    let employer = clean(raw.company_name)
        .or_else(|| clean(basic.current_company))
        .or_else(|| current.and_then(company_of));
    let tenure = clean(raw.current_job_duration).or_else(|| {
        current.and_then(|e| clean(e.duration.clone()).or_else(|| clean(e.caption.clone())))
    });
    let role_description = current.and_then(|e| clean(e.description.clone()));
    let previous_employer = previous.and_then(company_of);

    let location = clean(raw.address).or_else(|| basic.location.and_then(location_text));
    let about = clean(basic.about).or_else(|| clean(raw.about));

    let mut skills: Vec<String> = Vec::new();
    let skill_names = raw
        .skills
        .into_iter()
        .filter_map(|s| match s {
            RawSkill::Name(name) => clean(Some(name)),
            RawSkill::Entry { title, name } => clean(title).or_else(|| clean(name)),
        })
        .chain(current.into_iter().flat_map(|e| e.skills.clone()));
    for name in skill_names {
        if skills.len() >= MAX_SKILLS {
            break;
        }
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
            skills.push(name);
        }
    }

    let projects = raw
        .projects
        .into_iter()
        .filter_map(|p| {
            let title = clean(p.title).or_else(|| clean(p.name));
            match (title, clean(p.description)) {
                (Some(title), Some(desc)) => Some(format!("{title}: {desc}")),
                (Some(title), None) => Some(title),
                (None, _) => None,
            }
        })
        .take(MAX_PROJECTS)
        .collect();

    Ok(IndividualProfile {
        full_name,
        headline,
        role,
        employer,
        tenure,
        previous_employer,
        role_description,
        location,
        about,
        skills,
        projects,
    })
}

/// Converts a raw company item into an [`OrganizationProfile`].
///
/// # Errors
///
/// - [`ApifyError::NotFound`] / [`ApifyError::Provider`] if the item carries
///   an `error` field.
/// - [`ApifyError::Normalization`] if no company name can be found.
pub fn normalize_organization(
    identifier: &str,
    raw: RawCompany,
) -> Result<OrganizationProfile, ApifyError> {
    if let Some(err) = raw.error.as_ref() {
        return Err(provider_error(identifier, err));
    }

    let info = raw.basic_info.unwrap_or_default();
    let stats = raw.stats.unwrap_or_default();

    let name = clean(info.name)
        .or_else(|| clean(raw.name))
        .ok_or_else(|| ApifyError::Normalization {
            identifier: identifier.to_string(),
            reason: "missing company name".to_string(),
        })?;

    let mut industries: Vec<String> = info
        .industries
        .into_iter()
        .filter_map(|i| clean(Some(i)))
        .collect();
    if industries.is_empty() {
        industries.extend(clean(raw.industry));
    }

    Ok(OrganizationProfile {
        name,
        tagline: clean(info.tagline)
            .or_else(|| clean(info.slogan))
            .or_else(|| clean(raw.tagline)),
        description: clean(info.description).or_else(|| clean(raw.description)),
        headquarters: raw
            .locations
            .and_then(|l| l.headquarters)
            .and_then(|hq| address_text(&hq)),
        industries,
        specialties: info
            .specialties
            .into_iter()
            .filter_map(|s| clean(Some(s)))
            .collect(),
        employee_count: stats.employee_count.or(raw.employee_count),
        employee_count_range: stats.employee_count_range.as_ref().and_then(range_text),
        follower_count: stats.follower_count.or(raw.follower_count),
        founded_year: info.founded_info.and_then(|f| f.year),
        website: clean(info.website).or_else(|| clean(raw.website)),
    })
}

/// Maps an `error` field on a dataset item to the matching [`ApifyError`].
pub(crate) fn provider_error(identifier: &str, err: &Value) -> ApifyError {
    let message = match err {
        Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| other.to_string(), str::to_string),
    };

    let lower = message.to_lowercase();
    if lower.contains("not found") || lower.contains("does not exist") || lower.contains("no profile") {
        return ApifyError::NotFound {
            identifier: identifier.to_string(),
        };
    }
    if message.contains(FREE_PLAN_MARKER) {
        return ApifyError::Provider(
            "unable to fetch profile: this actor requires a paid Apify subscription".to_string(),
        );
    }
    ApifyError::Provider(message)
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Company of an experience entry. An explicit company key wins over the
/// flat layout's `subtitle`, whose `" · Full-time"` suffix is dropped.
fn company_of(exp: &RawExperience) -> Option<String> {
    [&exp.company, &exp.company_name, &exp.subtitle]
        .into_iter()
        .flatten()
        .find_map(|value| {
            let name = value.split(" · ").next().unwrap_or(value.as_str());
            clean(Some(name.to_string()))
        })
}

fn location_text(location: RawLocation) -> Option<String> {
    match location {
        RawLocation::Text(text) => clean(Some(text)),
        RawLocation::Structured {
            full,
            city,
            country,
        } => clean(full).or_else(|| join_parts(&[city.as_deref(), country.as_deref()])),
    }
}

fn address_text(address: &RawAddress) -> Option<String> {
    join_parts(&[
        address.city.as_deref(),
        address.geographic_area.as_deref(),
        address.country.as_deref(),
    ])
}

fn join_parts(parts: &[Option<&str>]) -> Option<String> {
    let joined = parts
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

fn range_text(range: &RawRange) -> Option<String> {
    match (range.start, range.end) {
        (Some(start), Some(end)) => Some(format!("{start}-{end}")),
        (Some(start), None) => Some(format!("{start}+")),
        (None, Some(end)) => Some(format!("up to {end}")),
        (None, None) => None,
    }
}
