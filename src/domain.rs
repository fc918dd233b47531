//! Specialty codes attached to every candidate.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Domain {
    DataScience,
    WebDevelopment,
    MachineLearning,
    UiUxDesign,
    BackendEngineering,
    Other(String),
}

pub const KNOWN_DOMAINS: [Domain; 5] = [
    Domain::DataScience,
    Domain::WebDevelopment,
    Domain::MachineLearning,
    Domain::UiUxDesign,
    Domain::BackendEngineering,
];

/// Badge palette, rendered by the UI as its own color classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainColor {
    Blue,
    Green,
    Purple,
    Pink,
    Orange,
    Gray,
}

impl Domain {
    pub fn from_code(code: &str) -> Self {
        match code {
            "DS" => Domain::DataScience,
            "WD" => Domain::WebDevelopment,
            "ML" => Domain::MachineLearning,
            "UI" => Domain::UiUxDesign,
            "BE" => Domain::BackendEngineering,
            other => Domain::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Domain::DataScience => "DS",
            Domain::WebDevelopment => "WD",
            Domain::MachineLearning => "ML",
            Domain::UiUxDesign => "UI",
            Domain::BackendEngineering => "BE",
            Domain::Other(code) => code.as_str(),
        }
    }

    /// Unknown codes are shown as-is.
    pub fn label(&self) -> &str {
        match self {
            Domain::DataScience => "Data Science",
            Domain::WebDevelopment => "Web Development",
            Domain::MachineLearning => "Machine Learning",
            Domain::UiUxDesign => "UI/UX Design",
            Domain::BackendEngineering => "Backend Engineering",
            Domain::Other(code) => code.as_str(),
        }
    }

    pub fn color(&self) -> DomainColor {
        match self {
            Domain::DataScience => DomainColor::Blue,
            Domain::WebDevelopment => DomainColor::Green,
            Domain::MachineLearning => DomainColor::Purple,
            Domain::UiUxDesign => DomainColor::Pink,
            Domain::BackendEngineering => DomainColor::Orange,
            Domain::Other(_) => DomainColor::Gray,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Domain::Other(_))
    }
}

/// Label/color pair the card and filter chips render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainBadge {
    pub code: String,
    pub label: String,
    pub color: DomainColor,
}

pub fn badge_for(code: &str) -> DomainBadge {
    let domain = Domain::from_code(code);
    DomainBadge {
        code: domain.code().to_string(),
        label: domain.label().to_string(),
        color: domain.color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for domain in KNOWN_DOMAINS.iter() {
            assert_eq!(&Domain::from_code(domain.code()), domain);
            assert!(domain.is_known());
        }
    }

    #[test]
    fn unknown_code_falls_back_to_gray_and_raw_label() {
        let badge = badge_for("QA");
        assert_eq!(badge.label, "QA");
        assert_eq!(badge.color, DomainColor::Gray);
        assert!(!Domain::from_code("ds").is_known());
    }
}
