#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the static viewer text.

use cardiac_culture_core::{DayRecord, ViewTab};
use cardiac_culture_world::{query, World};

const SUBTITLE: &str = "This visualization shows the morphological and functional changes in cardiac cells over an 8-day period.";

const INSTRUCTIONS_INTRO: &str =
    "This app visualizes the development of cardiac cells from Day 1 to Day 8.";

const INSTRUCTION_STEPS: [&str; 4] = [
    "Use the day buttons or the Left/Right keys to select the day",
    "Toggle auto-play (Space) to run the animation",
    "Adjust animation speed as needed",
    "Switch between tabs (1-3) to see different views",
];

const ABOUT: &str = "This visualization is based on a study of cardiac cell development, showing morphological and functional changes over an 8-day period, from immature cells (Day 1) to peak activity (Day 6) and subsequent deterioration (Days 7-8).";

const DATA_SOURCE: &str = "Data source: Cardiac Cell Development Study";

const DATA_VISUALIZATION_HEADING: &str = "Quantitative Changes Over Time";

/// Produces the text required to introduce the viewer.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Application title shown in the window caption and header.
    #[must_use]
    pub fn title<'world>(&self, world: &'world World) -> &'world str {
        query::title(world)
    }

    /// One-sentence description displayed below the title.
    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        SUBTITLE
    }

    /// Heading of the active view.
    #[must_use]
    pub fn view_heading(&self, world: &World) -> String {
        match query::tab(world) {
            ViewTab::Animation => query::record(world).title.to_string(),
            ViewTab::CellProperties => property_heading(query::record(world)),
            ViewTab::DataVisualization => DATA_VISUALIZATION_HEADING.to_string(),
        }
    }

    /// Introductory sentence followed by the numbered usage steps.
    #[must_use]
    pub fn instructions(&self) -> Instructions {
        Instructions {
            intro: INSTRUCTIONS_INTRO,
            steps: &INSTRUCTION_STEPS,
        }
    }

    /// Paragraph describing where the day table comes from.
    #[must_use]
    pub fn about(&self) -> &'static str {
        ABOUT
    }

    /// Attribution line displayed at the bottom of the side panel.
    #[must_use]
    pub fn data_source(&self) -> &'static str {
        DATA_SOURCE
    }

    /// Morphology and functionality of the selected day.
    #[must_use]
    pub fn property_sheet(&self, world: &World) -> PropertySheet {
        PropertySheet::from_record(query::record(world))
    }
}

/// Usage guidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instructions {
    /// Sentence introducing the viewer.
    pub intro: &'static str,
    /// Steps in the order they should be displayed.
    pub steps: &'static [&'static str],
}

/// Single `label: text` line of a property section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Name of the property.
    pub label: &'static str,
    /// Description of the property for the day.
    pub text: &'static str,
}

/// Titled group of property lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySection {
    /// Section title.
    pub title: &'static str,
    /// Lines in display order.
    pub entries: Vec<PropertyEntry>,
}

/// Textual description of one day split into sections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySheet {
    /// Heading naming the day.
    pub heading: String,
    /// Morphology followed by functionality.
    pub sections: Vec<PropertySection>,
}

impl PropertySheet {
    /// Builds the sheet for an arbitrary day record.
    #[must_use]
    pub fn from_record(record: &DayRecord) -> Self {
        let morphology = record.morphology;
        let functionality = record.functionality;
        Self {
            heading: property_heading(record),
            sections: vec![
                PropertySection {
                    title: "Morphology",
                    entries: vec![
                        entry("Shape", morphology.shape),
                        entry("Density", morphology.density),
                        entry("Nucleus", morphology.nucleus),
                        entry("Cytoplasm", morphology.cytoplasm),
                    ],
                },
                PropertySection {
                    title: "Functionality",
                    entries: vec![
                        entry("Contractility", functionality.contractility),
                        entry("Noise/Debris", functionality.noise),
                        entry("Functional State", functionality.functional_state),
                    ],
                },
            ],
        }
    }

    /// Renders the sheet as plain text, one line per entry.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = self.heading.clone();
        for section in &self.sections {
            text.push_str("\n\n");
            text.push_str(section.title);
            for entry in &section.entries {
                text.push_str(&format!("\n  {}: {}", entry.label, entry.text));
            }
        }
        text
    }
}

fn property_heading(record: &DayRecord) -> String {
    format!("Cell Properties - {}", record.title)
}

fn entry(label: &'static str, text: &'static str) -> PropertyEntry {
    PropertyEntry { label, text }
}
