//! Personalization strategies and request rendering.
//!
//! A [`GenerationRequest`] is built once from a profile and the product text
//! and never changes afterwards. Rendering is deterministic: the same inputs
//! always produce the same prompt.

use coldmail_core::{IndividualProfile, OrganizationProfile, ProductContext, ProfileRecord, ReferenceKind};

use crate::length::{MAX_WORDS, TARGET_WORDS};

/// Kind-specific rule set used to render a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    IndividualHooks,
    OrganizationHooks,
}

impl Strategy {
    #[must_use]
    pub fn for_profile(profile: &ProfileRecord) -> Self {
        match profile {
            ProfileRecord::Individual(_) => Strategy::IndividualHooks,
            ProfileRecord::Organization(_) => Strategy::OrganizationHooks,
        }
    }

    #[must_use]
    pub fn kind(self) -> ReferenceKind {
        match self {
            Strategy::IndividualHooks => ReferenceKind::Individual,
            Strategy::OrganizationHooks => ReferenceKind::Organization,
        }
    }

    /// Hook categories in order of preference.
    #[must_use]
    pub fn hook_categories(self) -> &'static [&'static str] {
        match self {
            Strategy::IndividualHooks => &[
                "current role",
                "employer",
                "technology stack",
                "recent role change",
                "project responsibility",
            ],
            Strategy::OrganizationHooks => &[
                "mission or tagline",
                "headquarters",
                "industry",
                "employee growth range",
            ],
        }
    }

    #[must_use]
    pub fn tone(self) -> &'static str {
        match self {
            Strategy::IndividualHooks => {
                "direct and conversational, like a short note from a peer; no hype and no buzzwords"
            }
            Strategy::OrganizationHooks => {
                "enthusiastic and value-driven, focused on what the product does for the company"
            }
        }
    }

    fn audience(self) -> &'static str {
        match self {
            Strategy::IndividualHooks => "an individual professional",
            Strategy::OrganizationHooks => "a company, addressed to its team",
        }
    }

    /// Full instruction text for this strategy.
    #[must_use]
    pub fn instructions(self) -> String {
        let hooks = self
            .hook_categories()
            .iter()
            .map(|h| format!("- {h}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You write short cold outreach emails to {audience}.\n\n\
             Personalization: open with ONE specific, concrete detail taken from the profile data. \
             Look for these hooks, in order of preference:\n{hooks}\n\
             Use whichever of these details is present. Use only details that appear in the \
             profile data; never invent facts. Do not open with a generic line that could be sent \
             to anyone.\n\n\
             Tone: {tone}.\n\n\
             Connect that detail to the product in one or two sentences, then close with a single \
             low-friction question.\n\n\
             Length: aim for about {TARGET_WORDS} words. Review your draft before answering: if it \
             is longer than {MAX_WORDS} words, shorten it until it is {MAX_WORDS} words or fewer.\n\
             Do not include a greeting line (no \"Hi\", \"Hello\" or \"Dear\"), a subject line, or \
             a signature.\n\n\
             Output format: respond with only a JSON object of the form {{\"email\": \"<email text>\"}} \
             and nothing else.",
            audience = self.audience(),
            tone = self.tone(),
        )
    }
}

/// The instruction bundle sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    strategy: Strategy,
    instructions: String,
    profile: String,
    product: String,
}

impl GenerationRequest {
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// The profile attributes, one labeled line per populated field.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Single-text prompt: instructions, product, then profile data.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nProduct/Service being pitched:\n{}\n\nProfile data:\n{}",
            self.instructions, self.product, self.profile
        )
    }
}

/// Selects the strategy for `profile` and renders the request.
#[must_use]
pub fn build_request(profile: &ProfileRecord, product: &ProductContext) -> GenerationRequest {
    let strategy = Strategy::for_profile(profile);
    let profile_text = match profile {
        ProfileRecord::Individual(p) => render_individual(p),
        ProfileRecord::Organization(o) => render_organization(o),
    };

    GenerationRequest {
        strategy,
        instructions: strategy.instructions(),
        profile: profile_text,
        product: product.as_str().to_string(),
    }
}

fn render_individual(p: &IndividualProfile) -> String {
    let mut lines = Vec::new();
    push(&mut lines, "Name", Some(&p.full_name));
    push(&mut lines, "Headline", Some(&p.headline));
    push(&mut lines, "Current role", p.role.as_ref());
    push(&mut lines, "Employer", p.employer.as_ref());
    push(&mut lines, "Time in current role", p.tenure.as_ref());
    push(&mut lines, "Previous employer", p.previous_employer.as_ref());
    push(&mut lines, "Role responsibilities", p.role_description.as_ref());
    push_list(&mut lines, "Technology stack", &p.skills);
    push_list(&mut lines, "Projects", &p.projects);
    push(&mut lines, "Location", p.location.as_ref());
    push(&mut lines, "About", p.about.as_ref());
    lines.join("\n")
}

fn render_organization(o: &OrganizationProfile) -> String {
    let mut lines = Vec::new();
    push(&mut lines, "Company", Some(&o.name));
    push(&mut lines, "Tagline", o.tagline.as_ref());
    push(&mut lines, "Description", o.description.as_ref());
    push(&mut lines, "Headquarters", o.headquarters.as_ref());
    push_list(&mut lines, "Industry", &o.industries);
    push_list(&mut lines, "Specialties", &o.specialties);
    push(&mut lines, "Employee range", o.employee_count_range.as_ref());
    if let Some(count) = o.employee_count {
        lines.push(format!("- Employees: {count}"));
    }
    if let Some(count) = o.follower_count {
        lines.push(format!("- Followers: {count}"));
    }
    if let Some(year) = o.founded_year {
        lines.push(format!("- Founded: {year}"));
    }
    push(&mut lines, "Website", o.website.as_ref());
    lines.join("\n")
}

fn push(lines: &mut Vec<String>, label: &str, value: Option<&String>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        lines.push(format!("- {label}: {v}"));
    }
}

fn push_list(lines: &mut Vec<String>, label: &str, values: &[String]) {
    if !values.is_empty() {
        lines.push(format!("- {label}: {}", values.join(", ")));
    }
}
