//! The scripted eight-day culture narrative.

use crate::{CultureColor, DayMetrics, DayNumber, DayRecord, Functionality, Morphology};

/// Every day record in ascending day order.
pub static DAY_RECORDS: [DayRecord; 8] = [
    DayRecord {
        day: DayNumber(1),
        title: "Day 1: Immature Stage",
        morphology: Morphology {
            shape: "Small, round, loosely attached cells",
            density: "Sparse distribution, minimal cell-cell interaction",
            nucleus: "Large, prominent, occupying most of the cytoplasm",
            cytoplasm: "Low actin filament density, no organized sarcomeres",
        },
        functionality: Functionality {
            contractility: "Very weak or absent, minimal spontaneous twitching",
            noise: "Low",
            functional_state: "Highly immature, incapable of coordinated beating",
        },
        color: CultureColor::from_rgb(255, 214, 204),
        metrics: DayMetrics {
            beat: 0.2,
            sync_level: 0.1,
            cell_count: 8,
            debris_level: 0.1,
        },
    },
    DayRecord {
        day: DayNumber(2),
        title: "Day 2: Initial Beating",
        morphology: Morphology {
            shape: "Slight elongation, cells begin forming small clusters",
            density: "Moderate increase in cell-cell interaction",
            nucleus: "Still prominent, but relative cytoplasmic volume increasing",
            cytoplasm: "More structured, actin filaments start forming",
        },
        functionality: Functionality {
            contractility: "Few healthy cells start mild beating, but not synchronized",
            noise: "Low",
            functional_state: "Early contractions observed, but weak and inconsistent",
        },
        color: CultureColor::from_rgb(255, 204, 204),
        metrics: DayMetrics {
            beat: 0.4,
            sync_level: 0.2,
            cell_count: 12,
            debris_level: 0.1,
        },
    },
    DayRecord {
        day: DayNumber(3),
        title: "Day 3: Sparse Mean Beating Begins",
        morphology: Morphology {
            shape: "Cells elongate, slight alignment observed",
            density: "Increased junction formation, more intercellular connectivity",
            nucleus: "Starting to appear smaller relative to expanding cytoplasm",
            cytoplasm: "Early sarcomere structures begin forming, weak striations visible",
        },
        functionality: Functionality {
            contractility: "Few healthy cells begin to show mean beating, still uncoordinated",
            noise: "Low",
            functional_state: "Patchy contractions, but improved over Day 2",
        },
        color: CultureColor::from_rgb(255, 204, 204),
        metrics: DayMetrics {
            beat: 0.5,
            sync_level: 0.3,
            cell_count: 16,
            debris_level: 0.2,
        },
    },
    DayRecord {
        day: DayNumber(4),
        title: "Day 4: Stronger Contractions in Some Cells",
        morphology: Morphology {
            shape: "More defined, elongated, and better aligned cells",
            density: "High, beginning of monolayer-like structures",
            nucleus: "Evenly distributed, organized within the cell",
            cytoplasm: "Denser filaments, early Z-line structures",
        },
        functionality: Functionality {
            contractility: "More healthy cells with mean beating, improved rhythmicity",
            noise: "Low",
            functional_state: "Early functional cardiomyocyte-like properties emerge",
        },
        color: CultureColor::from_rgb(255, 153, 153),
        metrics: DayMetrics {
            beat: 0.7,
            sync_level: 0.5,
            cell_count: 20,
            debris_level: 0.2,
        },
    },
    DayRecord {
        day: DayNumber(5),
        title: "Day 5: Moderate Synchronization in Beating",
        morphology: Morphology {
            shape: "Well-elongated, aligned along parallel lines",
            density: "High, forming strong intercellular junctions",
            nucleus: "Less prominent, as cytoplasm grows in volume",
            cytoplasm: "Well-formed sarcomeres with clear striations",
        },
        functionality: Functionality {
            contractility: "Moderate contraction force, clear mean beating pattern",
            noise: "Moderate",
            functional_state: "Stronger contractions, beginning of synchronized function",
        },
        color: CultureColor::from_rgb(255, 102, 102),
        metrics: DayMetrics {
            beat: 0.8,
            sync_level: 0.7,
            cell_count: 24,
            debris_level: 0.3,
        },
    },
    DayRecord {
        day: DayNumber(6),
        title: "Day 6: Peak Contraction Activity",
        morphology: Morphology {
            shape: "Fully elongated, clear cardiomyocyte morphology",
            density: "Strongly connected monolayer, peak cell-to-cell adhesion",
            nucleus: "Evenly spread, well-integrated",
            cytoplasm: "Densely packed sarcomeres, clear actin-myosin interactions",
        },
        functionality: Functionality {
            contractility: "High contraction intensity, peak synchronization in mean beating",
            noise: "Slightly increasing due to metabolic stress",
            functional_state: "Highest functionality, optimal contraction rhythm",
        },
        color: CultureColor::from_rgb(255, 51, 51),
        metrics: DayMetrics {
            beat: 1.0,
            sync_level: 0.9,
            cell_count: 28,
            debris_level: 0.4,
        },
    },
    DayRecord {
        day: DayNumber(7),
        title: "Day 7: Damage & Fragmentation Begins",
        morphology: Morphology {
            shape: "Fragmentation starts, some cells detach",
            density: "Decreasing due to stress-induced detachment",
            nucleus: "Some nuclei appear condensed or fragmented",
            cytoplasm: "Signs of actin filament disassembly, disrupted sarcomeres",
        },
        functionality: Functionality {
            contractility: "Weaker contractions, loss of synchronization, some dead zones",
            noise: "High, increased debris from cell detachment",
            functional_state: "Declining function, early damage evident",
        },
        color: CultureColor::from_rgb(204, 51, 51),
        metrics: DayMetrics {
            beat: 0.6,
            sync_level: 0.5,
            cell_count: 20,
            debris_level: 0.7,
        },
    },
    DayRecord {
        day: DayNumber(8),
        title: "Day 8: Significant Cell Damage",
        morphology: Morphology {
            shape: "High fragmentation, cell integrity severely compromised",
            density: "Significant cell loss, visible gaps in the network",
            nucleus: "Some remain intact, others fragmented or missing",
            cytoplasm: "Loss of sarcomere organization, widespread cellular breakdown",
        },
        functionality: Functionality {
            contractility: "Very weak or absent, most cells cease contracting",
            noise: "Extremely high, cell fragments and debris dominate the field",
            functional_state: "Experiment ends as contraction ceases and cells deteriorate",
        },
        color: CultureColor::from_rgb(153, 51, 51),
        metrics: DayMetrics {
            beat: 0.2,
            sync_level: 0.2,
            cell_count: 12,
            debris_level: 0.9,
        },
    },
];

/// Looks up the record describing the provided day.
#[must_use]
pub fn day_record(day: DayNumber) -> &'static DayRecord {
    &DAY_RECORDS[day.index()]
}
