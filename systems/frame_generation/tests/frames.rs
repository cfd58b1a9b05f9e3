use cardiac_culture_core::{day_record, DayNumber, Pulse, PULSE_FRAMES_PER_DAY};
use cardiac_culture_system_frame_generation::{
    EllipseKind, FrameGenerator, CANVAS_HEIGHT, CANVAS_WIDTH, CELL_MARGIN,
};

const SEED: u64 = 0x5eed_ca4d_1ac0_0001;

#[test]
fn identical_inputs_reproduce_identical_frames() {
    let generator = FrameGenerator::new(SEED);
    let day = DayNumber::new(4).expect("valid day");

    let first = generator.generate(day, Pulse::STATIC, 3);
    let second = generator.generate(day, Pulse::STATIC, 3);

    assert_eq!(first, second);
}

#[test]
fn new_ordinals_rescatter_cells() {
    let generator = FrameGenerator::new(SEED);
    let day = DayNumber::new(4).expect("valid day");

    let first = generator.generate(day, Pulse::STATIC, 0);
    let second = generator.generate(day, Pulse::STATIC, 1);

    assert_ne!(first.ellipses, second.ellipses);
}

#[test]
fn every_day_paints_its_cells_and_debris() {
    let generator = FrameGenerator::new(SEED);

    for day in DayNumber::all() {
        let record = day_record(day);
        let frame = generator.generate(day, Pulse::STATIC, 0);

        assert_eq!(
            frame.count(EllipseKind::CellBody),
            record.metrics.cell_count as usize
        );
        assert_eq!(
            frame.count(EllipseKind::Nucleus),
            record.metrics.cell_count as usize
        );
        assert_eq!(
            frame.count(EllipseKind::Debris),
            record.metrics.debris_particles() as usize
        );
        assert_eq!((frame.width, frame.height), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }
}

#[test]
fn cells_start_inside_margins_and_debris_inside_dish() {
    let generator = FrameGenerator::new(SEED);

    for day in DayNumber::all() {
        for ordinal in 0..PULSE_FRAMES_PER_DAY as u64 {
            let frame = generator.generate(day, Pulse::frame(ordinal as usize, 10), ordinal);

            for body in frame.iter_kind(EllipseKind::CellBody) {
                assert!(body.x >= CELL_MARGIN && body.x <= CANVAS_WIDTH - CELL_MARGIN);
                assert!(body.y >= CELL_MARGIN && body.y <= CANVAS_HEIGHT - CELL_MARGIN);
                assert_eq!(body.paint.color, day_record(day).color);
            }
            for debris in frame.iter_kind(EllipseKind::Debris) {
                assert!(debris.x >= 0.0 && debris.x <= CANVAS_WIDTH);
                assert!(debris.y >= 0.0 && debris.y <= CANVAS_HEIGHT);
                assert!(debris.width >= 2.0 && debris.width <= 7.0);
                assert_eq!(debris.width, debris.height);
            }
        }
    }
}

#[test]
fn nuclei_are_centred_in_their_cells() {
    let generator = FrameGenerator::new(SEED);
    let frame = generator.generate(DayNumber::new(5).expect("valid day"), Pulse::STATIC, 9);

    let bodies: Vec<_> = frame.iter_kind(EllipseKind::CellBody).collect();
    let nuclei: Vec<_> = frame.iter_kind(EllipseKind::Nucleus).collect();
    for (body, nucleus) in bodies.iter().zip(nuclei.iter()) {
        assert!((body.center_x() - nucleus.center_x()).abs() < 1e-3);
        assert!((body.center_y() - nucleus.center_y()).abs() < 1e-3);
        assert!((nucleus.width - body.width * 0.5).abs() < 1e-3);
    }
}

#[test]
fn round_cells_stay_circular() {
    let generator = FrameGenerator::new(SEED);

    for value in [1, 2] {
        let day = DayNumber::new(value).expect("valid day");
        let frame = generator.generate(day, Pulse::new(0.8), 0);
        for body in frame.iter_kind(EllipseKind::CellBody) {
            assert_eq!(body.width, body.height);
        }
    }
}
