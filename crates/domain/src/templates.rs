//! Fallback post templates keyed by content kind
//!
//! Placeholders: `{title}` is the item title, `{brand}` the brand name and
//! `{about}` the short brand description.

use crate::model::ContentKind;

const INSIGHT_TEMPLATES: [&str; 5] = [
    "Building {brand} taught me: {title}\n\nWhat's your take on this? #TechLeadership #StartupLife #{brand} #AIContent",
    "After creating {brand} ({about}), I've learned: {title}\n\nAlways evolving in tech! #Innovation #TechTrends #{brand}",
    "From building {brand}: {title}\n\nThoughts? #TechCommunity #Entrepreneurship #AIContent #{brand}",
    "Creating {brand} showed me: {title}\n\nTech never stops amazing me! #TechNews #FutureTech #{brand} #Innovation",
    "{brand} development insight: {title}\n\nAgree or disagree? #TechDebate #Programming #AIContent #{brand}",
];

const GENERIC_TEMPLATES: [&str; 5] = [
    "🔥 {title}\n\nBuilding {brand} ({about}) taught me to stay updated with tech trends! #TechNews #Programming #{brand} #AIContent",
    "Interesting read: {title}\n\nAlways learning something new in tech! #TechTrends #Innovation #{brand}",
    "Just came across this: {title}\n\nThoughts? #TechCommunity #{brand} #StartupLife #AIContent",
    "📰 {title}\n\nTech never stops evolving! #TechNews #FutureTech #{brand} #Innovation",
    "Hot take: {title}\n\nAgree or disagree? #TechDebate #Programming #{brand} #AIContent",
];

/// One of the two fixed template sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSet {
    /// Used for `ProfessionalInsight` items
    Insight,
    /// Used for every other kind
    Generic,
}

impl TemplateSet {
    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::ProfessionalInsight => TemplateSet::Insight,
            ContentKind::News | ContentKind::Discussion => TemplateSet::Generic,
        }
    }

    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            TemplateSet::Insight => &INSIGHT_TEMPLATES,
            TemplateSet::Generic => &GENERIC_TEMPLATES,
        }
    }

    pub fn len(&self) -> usize {
        self.templates().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates().is_empty()
    }
}

/// Brand values substituted into templates and prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub name: String,
    pub about: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            name: "Nexoxa".to_string(),
            about: "AI content sharing platform".to_string(),
        }
    }
}

/// Substitute placeholders in a template
pub fn fill_template(template: &str, title: &str, brand: &Brand) -> String {
    // Brand fields first so a title containing "{brand}" stays literal.
    template
        .replace("{brand}", &brand.name)
        .replace("{about}", &brand.about)
        .replace("{title}", title)
}
