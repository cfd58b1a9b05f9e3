#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural culture frame generation.
//!
//! A frame is a flat list of filled ellipses painted in order onto a white
//! 800×600 dish: one body and one nucleus per cell, followed by the debris
//! particles. Placement is random, so every frame of a day looks slightly
//! different, but a frame is fully determined by its seed.

use cardiac_culture_core::{day_record, CellStage, CultureColor, DayNumber, DayRecord, Pulse};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Width of the culture dish in pixels.
pub const CANVAS_WIDTH: f32 = 800.0;

/// Height of the culture dish in pixels.
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Margin kept free of cell origins along each edge of the dish.
pub const CELL_MARGIN: f32 = 50.0;

const CELL_ALPHA: u8 = 180;
const NUCLEUS_COLOR: CultureColor = CultureColor::from_rgb(102, 102, 204);
const NUCLEUS_ALPHA: u8 = 200;
const FADED_NUCLEUS_ALPHA: u8 = 100;
const DEBRIS_COLOR: CultureColor = CultureColor::from_rgb(150, 150, 150);
const DEBRIS_ALPHA: u8 = 128;

const RNG_STREAM_FRAME: &str = "culture-frame";

/// Color with an explicit alpha channel used to fill an ellipse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Paint {
    /// Base color.
    pub color: CultureColor,
    /// Opacity in the range 0..=255.
    pub alpha: u8,
}

impl Paint {
    /// Creates a new paint from a base color and opacity.
    #[must_use]
    pub const fn new(color: CultureColor, alpha: u8) -> Self {
        Self { color, alpha }
    }
}

/// Role of an ellipse inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EllipseKind {
    /// Cytoplasm outline of a cell.
    CellBody,
    /// Nucleus centred inside the preceding cell body.
    Nucleus,
    /// Small grey particle of cell debris.
    Debris,
}

/// Axis-aligned filled ellipse described by its bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEllipse {
    /// Role of the ellipse.
    pub kind: EllipseKind,
    /// Left edge of the bounding box.
    pub x: f32,
    /// Top edge of the bounding box.
    pub y: f32,
    /// Width of the bounding box.
    pub width: f32,
    /// Height of the bounding box.
    pub height: f32,
    /// Fill applied to the ellipse.
    pub paint: Paint,
}

impl FrameEllipse {
    /// Horizontal centre of the ellipse.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// Vertical centre of the ellipse.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }
}

/// Still image of the culture for one day and pulse phase.
#[derive(Clone, Debug, PartialEq)]
pub struct CultureFrame {
    /// Day depicted by the frame.
    pub day: DayNumber,
    /// Pulse phase used to scale the cells.
    pub pulse: Pulse,
    /// Width of the dish in pixels.
    pub width: f32,
    /// Height of the dish in pixels.
    pub height: f32,
    /// Background color of the dish.
    pub background: CultureColor,
    /// Ellipses in paint order.
    pub ellipses: Vec<FrameEllipse>,
}

impl CultureFrame {
    /// Number of ellipses of the provided kind.
    #[must_use]
    pub fn count(&self, kind: EllipseKind) -> usize {
        self.ellipses
            .iter()
            .filter(|ellipse| ellipse.kind == kind)
            .count()
    }

    /// Iterates over the ellipses of the provided kind in paint order.
    pub fn iter_kind(&self, kind: EllipseKind) -> impl Iterator<Item = &FrameEllipse> + '_ {
        self.ellipses
            .iter()
            .filter(move |ellipse| ellipse.kind == kind)
    }
}

/// Deterministic frame source seeded once per viewer session.
#[derive(Clone, Copy, Debug)]
pub struct FrameGenerator {
    seed: u64,
}

impl FrameGenerator {
    /// Creates a generator whose frames derive from the provided seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generates the frame numbered `ordinal` for the given day and pulse.
    ///
    /// Identical arguments always yield identical frames; different ordinals
    /// re-scatter the cells.
    #[must_use]
    pub fn generate(&self, day: DayNumber, pulse: Pulse, ordinal: u64) -> CultureFrame {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_frame_seed(self.seed, day, ordinal));
        generate_frame(day_record(day), pulse, &mut rng)
    }
}

/// Paints a frame for the record using draws from the provided generator.
///
/// Random values are drawn cell by cell (x, y, width, then height for
/// non-round cells) followed by debris (x, y, size).
pub fn generate_frame<R: Rng + ?Sized>(
    record: &DayRecord,
    pulse: Pulse,
    rng: &mut R,
) -> CultureFrame {
    let stage = record.day.stage();
    let metrics = record.metrics;
    let debris = metrics.debris_particles() as usize;
    let mut ellipses = Vec::with_capacity(metrics.cell_count as usize * 2 + debris);

    let body_paint = Paint::new(record.color, CELL_ALPHA);
    let nucleus_paint = Paint::new(
        NUCLEUS_COLOR,
        if stage == CellStage::Fragmented {
            FADED_NUCLEUS_ALPHA
        } else {
            NUCLEUS_ALPHA
        },
    );
    let beat_factor = if metrics.beats() {
        1.0 + pulse.get() * metrics.beat as f32 * stage.beat_gain()
    } else {
        1.0
    };

    for _ in 0..metrics.cell_count {
        let x = CELL_MARGIN + rng.gen::<f32>() * (CANVAS_WIDTH - 2.0 * CELL_MARGIN);
        let y = CELL_MARGIN + rng.gen::<f32>() * (CANVAS_HEIGHT - 2.0 * CELL_MARGIN);
        let (width, height) = cell_size(stage, record.day, rng);
        let width = width * beat_factor;
        let height = height * beat_factor;

        ellipses.push(FrameEllipse {
            kind: EllipseKind::CellBody,
            x,
            y,
            width,
            height,
            paint: body_paint,
        });

        let scale = stage.nucleus_scale();
        let nucleus_width = width * scale;
        let nucleus_height = height * scale;
        ellipses.push(FrameEllipse {
            kind: EllipseKind::Nucleus,
            x: x + (width - nucleus_width) * 0.5,
            y: y + (height - nucleus_height) * 0.5,
            width: nucleus_width,
            height: nucleus_height,
            paint: nucleus_paint,
        });
    }

    let debris_paint = Paint::new(DEBRIS_COLOR, DEBRIS_ALPHA);
    for _ in 0..debris {
        let x = rng.gen::<f32>() * CANVAS_WIDTH;
        let y = rng.gen::<f32>() * CANVAS_HEIGHT;
        let size = 2.0 + rng.gen::<f32>() * 5.0;
        ellipses.push(FrameEllipse {
            kind: EllipseKind::Debris,
            x,
            y,
            width: size,
            height: size,
            paint: debris_paint,
        });
    }

    CultureFrame {
        day: record.day,
        pulse,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        background: CultureColor::WHITE,
        ellipses,
    }
}

fn cell_size<R: Rng + ?Sized>(stage: CellStage, day: DayNumber, rng: &mut R) -> (f32, f32) {
    match stage {
        CellStage::Round => {
            let diameter = 20.0 + rng.gen::<f32>() * 10.0;
            (diameter, diameter)
        }
        CellStage::Elongated => {
            let width = 15.0 + rng.gen::<f32>() * 10.0;
            // Later days stretch further.
            let stretch = f32::from(day.get()) / 4.0;
            let height = 30.0 + rng.gen::<f32>() * 20.0 * stretch;
            (width, height)
        }
        CellStage::Fragmented => {
            let width = 10.0 + rng.gen::<f32>() * 15.0;
            let height = 20.0 + rng.gen::<f32>() * 15.0;
            (width, height)
        }
    }
}

fn derive_frame_seed(base: u64, day: DayNumber, ordinal: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(RNG_STREAM_FRAME.as_bytes());
    hasher.update([day.get()]);
    hasher.update(ordinal.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn day(value: u8) -> DayNumber {
        DayNumber::new(value).expect("valid day")
    }

    #[test]
    fn frame_seed_depends_on_every_input() {
        let base = derive_frame_seed(7, day(3), 0);

        assert_eq!(base, derive_frame_seed(7, day(3), 0));
        assert_ne!(base, derive_frame_seed(8, day(3), 0));
        assert_ne!(base, derive_frame_seed(7, day(4), 0));
        assert_ne!(base, derive_frame_seed(7, day(3), 1));
    }

    #[test]
    fn zero_draws_place_cells_at_minimum_size() {
        let mut rng = StepRng::new(0, 0);
        let frame = generate_frame(day_record(day(1)), Pulse::RELAXED, &mut rng);

        let body = frame
            .iter_kind(EllipseKind::CellBody)
            .next()
            .expect("day 1 has cells");
        assert_eq!((body.x, body.y), (CELL_MARGIN, CELL_MARGIN));
        assert_eq!((body.width, body.height), (20.0, 20.0));

        let debris = frame
            .iter_kind(EllipseKind::Debris)
            .next()
            .expect("day 1 has debris");
        assert_eq!((debris.x, debris.y, debris.width), (0.0, 0.0, 2.0));
    }

    #[test]
    fn full_pulse_scales_cells_by_beat() {
        let record = day_record(day(6));
        let relaxed = generate_frame(record, Pulse::RELAXED, &mut StepRng::new(0, 0));
        let contracted = generate_frame(record, Pulse::new(1.0), &mut StepRng::new(0, 0));

        let relaxed_body = relaxed.ellipses[0];
        let contracted_body = contracted.ellipses[0];
        // Day 6 beats at full strength with a 0.2 gain.
        assert!((contracted_body.width - relaxed_body.width * 1.2).abs() < 1e-4);
        assert!((contracted_body.height - relaxed_body.height * 1.2).abs() < 1e-4);
    }

    #[test]
    fn maximum_draws_follow_each_stage_size_rule() {
        // (day, body width, body height, nucleus scale) at pulse 1.0.
        let cases = [
            (1, 30.0 * 1.04, 30.0 * 1.04, 0.7),
            (3, 25.0 * 1.1, 45.0 * 1.1, 0.5),
            (6, 25.0 * 1.2, 60.0 * 1.2, 0.5),
            (7, 25.0 * 1.06, 35.0 * 1.06, 0.3),
            (8, 25.0 * 1.02, 35.0 * 1.02, 0.3),
        ];

        for (value, width, height, scale) in cases {
            let mut rng = StepRng::new(u64::MAX, 0);
            let frame = generate_frame(day_record(day(value)), Pulse::new(1.0), &mut rng);
            let body = frame.ellipses[0];
            let nucleus = frame.ellipses[1];

            assert_eq!(body.kind, EllipseKind::CellBody);
            assert!((body.width - width).abs() < 1e-3, "day {value} width {}", body.width);
            assert!((body.height - height).abs() < 1e-3, "day {value} height {}", body.height);
            assert_eq!(nucleus.kind, EllipseKind::Nucleus);
            assert!((nucleus.width - body.width * scale).abs() < 1e-3);
            assert!((nucleus.height - body.height * scale).abs() < 1e-3);
        }
    }

    #[test]
    fn fragmented_nuclei_fade() {
        let mut rng = StepRng::new(0, 0);
        let frame = generate_frame(day_record(day(7)), Pulse::STATIC, &mut rng);

        assert!(frame
            .iter_kind(EllipseKind::Nucleus)
            .all(|nucleus| nucleus.paint.alpha == FADED_NUCLEUS_ALPHA));
    }
}
