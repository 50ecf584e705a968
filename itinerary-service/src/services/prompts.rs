//! Stage descriptors and prompt rendering.
//!
//! A pipeline is an ordered list of [`StageDescriptor`]s. Each template may
//! use `{query}`, `{language}` and `{previous}`; the last one is the text
//! returned by the stage before it.

use crate::models::{Language, TripQuery};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// One call, one planner persona.
    Single,
    /// Route architect, then fact checker, then formatter.
    #[default]
    MultiAgent,
}

impl PipelineMode {
    pub fn stages(&self) -> &'static [StageDescriptor] {
        match self {
            PipelineMode::Single => &SINGLE_STAGE,
            PipelineMode::MultiAgent => &MULTI_AGENT_STAGES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    pub name: &'static str,
    pub persona: &'static str,
    pub template: &'static str,
    /// Whether the template embeds the previous stage's output. Stages that
    /// don't can run alongside their predecessor.
    pub depends_on_previous: bool,
}

pub const SINGLE_STAGE: [StageDescriptor; 1] = [StageDescriptor {
    name: "Travel Planner",
    persona: "You are an experienced Indian travel planner who writes practical, day-wise itineraries.",
    template: "Plan this trip: {query}\n\n\
        Give a day-wise itinerary with places to visit, the best time to reach each one, \
        local food to try and rough travel times between stops. \
        Format the answer in Markdown with a heading per day.\n\n\
        {language}",
    depends_on_previous: false,
}];

pub const MULTI_AGENT_STAGES: [StageDescriptor; 3] = [
    StageDescriptor {
        name: "Route Architect",
        persona: "You are a Route Architect. You design efficient travel routes and never pad them with filler.",
        template: "Trip request: {query}\n\n\
            Draft a day-wise route skeleton: which places to cover on which day, \
            in what order, and how to move between them. Keep it short; \
            another expert will add costs and facts.",
        depends_on_previous: false,
    },
    StageDescriptor {
        name: "Budget & Facts Expert",
        persona: "You are a Budget & Facts Expert who checks travel plans for accuracy.",
        template: "Trip request: {query}\n\n\
            Here is the draft route:\n\n{previous}\n\n\
            For every stop add entry fees, opening timings and transport costs. \
            Flag anything that looks wrong or needs to be verified locally, \
            and keep the day structure of the draft.",
        depends_on_previous: true,
    },
    StageDescriptor {
        name: "Itinerary Formatter",
        persona: "You are an Itinerary Formatter who turns expert notes into a clean traveller's guide.",
        template: "Turn these verified notes into the final itinerary for: {query}\n\n\
            {previous}\n\n\
            Use Markdown with a heading per day, bullet points for stops, \
            and a short budget summary table at the end.\n\n\
            {language}",
        depends_on_previous: true,
    },
];

/// Build the full prompt for one stage.
///
/// Placeholders are expanded in a single left-to-right pass, so braces
/// inside the query or the previous output are copied through untouched.
/// Unknown placeholders are left as written.
pub fn render_prompt(
    stage: &StageDescriptor,
    query: &TripQuery,
    language: Language,
    previous: Option<&str>,
) -> String {
    let body = interpolate(stage.template, |key| match key {
        "query" => Some(query.as_str()),
        "language" => Some(language.instruction()),
        "previous" => Some(previous.unwrap_or_default()),
        _ => None,
    });

    format!("{}\n\n{}", stage.persona, body)
}

fn interpolate<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}').and_then(|close| lookup(&after[..close]).map(|v| (close, v))) {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
