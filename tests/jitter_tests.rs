//! Jitter Sequence Tests
//!
//! Tests for:
//! - Deterministic frame-index selection with period 7
//! - XY offsets confined to the sampling disk
//! - Z phase coverage of the odd fourteenths
//! - Centered sample distribution

use glam::Vec3;

use froxel::JitterSequence;
use froxel::froxel::jitter::JITTER_RADIUS;

const EPSILON: f32 = 1e-5;

// ============================================================================
// Selection Tests
// ============================================================================

#[test]
fn offset_is_deterministic() {
    let a = JitterSequence::new();
    let b = JitterSequence::new();
    for frame in 0..32 {
        assert_eq!(
            a.offset(frame),
            b.offset(frame),
            "frame {frame} should always yield the same offset"
        );
    }
}

#[test]
fn sequence_repeats_every_seven_frames() {
    let jitter = JitterSequence::new();
    for frame in 0..21u64 {
        assert_eq!(
            jitter.offset(frame),
            jitter.offset(frame + 7),
            "offsets must have period 7, frame {frame} differs"
        );
    }
}

#[test]
fn all_seven_offsets_are_distinct() {
    let jitter = JitterSequence::new();
    let offsets = jitter.offsets();
    for i in 0..7 {
        for j in (i + 1)..7 {
            assert!(
                (offsets[i] - offsets[j]).length() > EPSILON,
                "offsets {i} and {j} coincide: {:?}",
                offsets[i]
            );
        }
    }
}

// ============================================================================
// Geometry Tests
// ============================================================================

#[test]
fn xy_offsets_stay_within_disk() {
    let jitter = JitterSequence::new();
    for (i, offset) in jitter.offsets().iter().enumerate() {
        let r = offset.truncate().length();
        assert!(
            r <= JITTER_RADIUS + EPSILON,
            "offset {i} XY radius {r} exceeds {JITTER_RADIUS}"
        );
    }
}

#[test]
fn first_offset_sits_at_disk_center() {
    let jitter = JitterSequence::new();
    assert!(jitter.offsets()[0].truncate().length() < EPSILON);
}

#[test]
fn outer_offsets_form_a_hexagon() {
    let jitter = JitterSequence::new();
    // The six non-center samples all sit on the disk boundary.
    for (i, offset) in jitter.offsets().iter().enumerate().skip(1) {
        let r = offset.truncate().length();
        assert!(
            (r - JITTER_RADIUS).abs() < 1e-4,
            "outer offset {i} radius {r} is off the hexagon"
        );
    }
}

#[test]
fn xy_offsets_average_to_zero() {
    let jitter = JitterSequence::new();
    let mean = jitter
        .offsets()
        .iter()
        .map(|o| o.truncate())
        .sum::<glam::Vec2>()
        / 7.0;
    assert!(
        mean.length() < 1e-5,
        "hexagon plus center should be balanced, mean {mean:?}"
    );
}

#[test]
fn pattern_is_rotated_off_the_grid_axes() {
    let jitter = JitterSequence::new();
    for (i, offset) in jitter.offsets().iter().enumerate().skip(1) {
        assert!(
            offset.x.abs() > EPSILON && offset.y.abs() > EPSILON,
            "outer offset {i} is axis-aligned: {offset:?}"
        );
    }
}

// ============================================================================
// Z Phase Tests
// ============================================================================

#[test]
fn z_phases_cover_the_odd_fourteenths() {
    let jitter = JitterSequence::new();
    let mut phases: Vec<f32> = jitter.offsets().iter().map(|o| o.z).collect();
    phases.sort_by(f32::total_cmp);
    for (i, phase) in phases.iter().enumerate() {
        let expected = (2 * i + 1) as f32 / 14.0;
        assert!(
            (phase - expected).abs() < EPSILON,
            "sorted phase {i}: expected {expected}, got {phase}"
        );
    }
}

#[test]
fn z_phases_stay_strictly_inside_the_slice() {
    let jitter = JitterSequence::new();
    for offset in jitter.offsets() {
        assert!(offset.z > 0.0 && offset.z < 1.0, "phase {} escapes the slice", offset.z);
    }
}

#[test]
fn default_matches_new() {
    assert_eq!(JitterSequence::default(), JitterSequence::new());
}

#[test]
fn offsets_slice_matches_selection() {
    let jitter = JitterSequence::new();
    let offsets: Vec<Vec3> = (0..7).map(|f| jitter.offset(f)).collect();
    assert_eq!(&offsets[..], jitter.offsets());
}
