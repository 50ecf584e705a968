use serde::{Deserialize, Serialize};

/// Output language for the generated guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    TeluguEnglishMix,
    PureTelugu,
    English,
    Hindi,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::TeluguEnglishMix,
        Language::PureTelugu,
        Language::English,
        Language::Hindi,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Language::TeluguEnglishMix => "Telugu & English Mix",
            Language::PureTelugu => "Pure Telugu",
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    /// Value used in the `<select>` of the planner form.
    pub fn form_value(&self) -> &'static str {
        match self {
            Language::TeluguEnglishMix => "mix",
            Language::PureTelugu => "telugu",
            Language::English => "english",
            Language::Hindi => "hindi",
        }
    }

    /// Unknown or missing values fall back to the mixed-language default.
    pub fn from_form_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|language| language.form_value() == value.trim())
            .unwrap_or_default()
    }

    /// Instruction appended to prompts so the model answers in this language.
    pub fn instruction(&self) -> &'static str {
        match self {
            Language::TeluguEnglishMix => {
                "Write in a friendly mix of Telugu and English (Tenglish), keeping place names in English."
            }
            Language::PureTelugu => "Write entirely in Telugu script.",
            Language::English => "Write in clear, simple English.",
            Language::Hindi => "Write entirely in Hindi (Devanagari script).",
        }
    }
}

/// Free-text trip description, kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripQuery(String);

impl TripQuery {
    /// Returns `None` for input that is empty after trimming whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_values_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::from_form_value(language.form_value()), language);
        }
    }

    #[test]
    fn unknown_language_falls_back_to_mix() {
        assert_eq!(Language::from_form_value("klingon"), Language::TeluguEnglishMix);
        assert_eq!(Language::from_form_value(""), Language::TeluguEnglishMix);
    }

    #[test]
    fn labels_match_selector() {
        let labels: Vec<_> = Language::ALL.iter().map(Language::label).collect();
        assert_eq!(
            labels,
            ["Telugu & English Mix", "Pure Telugu", "English", "Hindi"]
        );
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(TripQuery::parse("").is_none());
        assert!(TripQuery::parse("   \n\t").is_none());
    }

    #[test]
    fn query_is_kept_verbatim() {
        let query = TripQuery::parse("  4 days trip to Kashi and Prayagraj ").unwrap();
        assert_eq!(query.as_str(), "  4 days trip to Kashi and Prayagraj ");
    }
}
