//! Path animator properties over long runs and both track shapes.

use lionel_train_card::animator::{consist, wrap, PathAnimator, FRAME_MS};
use lionel_train_card::config::TrackShape;
use lionel_train_card::traits::normalize_deg;
use lionel_train_card::{Curve, Ellipse, Phase, Stadium, Transition};

/// Smallest angle between two headings, in degrees.
fn heading_gap(a: f32, b: f32) -> f32 {
    let d = normalize_deg(a - b);
    d.min(360.0 - d)
}

#[test]
fn test_progress_stays_in_range_forward() {
    let mut a = PathAnimator::new(Ellipse::default()).with_consist(consist(3));
    a.set_motion(100.0, true);
    for i in 0..10_000 {
        let frame = a.tick().unwrap();
        assert!((0.0..1.0).contains(&frame.progress), "step {i}: {}", frame.progress);
        for car in &frame.cars {
            assert!((0.0..1.0).contains(&car.progress));
        }
    }
}

#[test]
fn test_progress_stays_in_range_reverse() {
    let mut a = PathAnimator::new(Ellipse::default());
    a.set_motion(100.0, false);
    for _ in 0..10_000 {
        let p = a.tick().unwrap().progress;
        assert!((0.0..1.0).contains(&p), "{p}");
    }
}

#[test]
fn test_progress_stays_in_range_with_irregular_frames() {
    let mut a = PathAnimator::new(Stadium::default()).with_step_per_frame(0.05);
    a.set_motion(100.0, true);
    for i in 0..10_000 {
        let dt = (i % 7) as f32 * 40.0;
        a.step(dt);
        assert!((0.0..1.0).contains(&a.progress()));
    }
}

#[test]
fn test_reverse_flips_delta_sign_only() {
    let mut a = PathAnimator::new(Ellipse::default());
    a.set_motion(60.0, true);
    let forward = a.delta_per_frame();
    a.set_motion(60.0, false);
    assert_eq!(a.delta_per_frame(), -forward);
}

#[test]
fn test_heading_continuous_across_reversal() {
    let mut a = PathAnimator::new(Ellipse::default());
    a.set_motion(100.0, true);
    let mut last = a.frame().lead().unwrap().heading_deg;
    for _ in 0..300 {
        let heading = a.tick().unwrap().lead().unwrap().heading_deg;
        assert!(heading_gap(heading, last) < 3.0);
        last = heading;
    }

    a.set_motion(100.0, false);
    let flipped = a.frame().lead().unwrap().heading_deg;
    assert!((heading_gap(flipped, last) - 180.0).abs() < 1e-3);

    let mut last = flipped;
    for _ in 0..300 {
        let heading = a.tick().unwrap().lead().unwrap().heading_deg;
        assert!(heading_gap(heading, last) < 3.0);
        last = heading;
    }
}

#[test]
fn test_heading_follows_travel() {
    // The lead car's heading points at where it will be next frame.
    let mut a = PathAnimator::new(Ellipse::new(1.0, 0.4));
    for forward in [true, false] {
        a.set_motion(100.0, forward);
        for _ in 0..50 {
            let before = a.frame();
            let after = a.tick().unwrap();
            let p0 = before.lead().unwrap().position;
            let p1 = after.lead().unwrap().position;
            let travel = (p1.y - p0.y).atan2(p1.x - p0.x).to_degrees();
            let heading = before.lead().unwrap().heading_deg;
            assert!(heading_gap(travel, heading) < 2.0, "{travel} vs {heading}");
        }
    }
}

#[test]
fn test_idle_cycle_holds_progress() {
    let mut a = PathAnimator::new(Ellipse::default());
    assert_eq!(a.set_motion(40.0, true), Transition::Started);
    for _ in 0..100 {
        a.step(FRAME_MS);
    }
    assert_eq!(a.set_motion(0.0, true), Transition::Stopped);
    let held = a.progress();
    for _ in 0..100 {
        assert!(a.step(FRAME_MS).is_none());
    }
    assert_eq!(a.progress(), held);
    assert_eq!(a.phase(), Phase::Idle);

    assert_eq!(a.set_motion(40.0, true), Transition::Started);
    a.step(FRAME_MS);
    assert!(a.progress() > held);
}

#[test]
fn test_stadium_straights_and_arcs() {
    let s = Stadium::default();
    let half = s.straight / 2.0;

    // quarter of the right arc: rightmost point, heading up
    let arc_quarter = (core::f32::consts::PI * s.radius / 2.0) / s.total_len();
    let p = s.point(arc_quarter);
    assert!((p.x - (half + s.radius)).abs() < 1e-2);
    assert!(p.y.abs() < 1e-2);
    assert!((s.tangent(arc_quarter).angle_deg() - 90.0).abs() < 0.5);

    // middle of the top straight heads in -x
    let top_mid = (core::f32::consts::PI * s.radius + half) / s.total_len();
    let p = s.point(top_mid);
    assert!((p.y - s.radius).abs() < 1e-3);
    assert!(p.x.abs() < 1e-2);
    assert!((s.tangent(top_mid).angle_deg() - 180.0).abs() < 1e-3);
}

#[test]
fn test_stadium_loop_is_continuous() {
    let s = Stadium::default();
    let step = 1.0 / 2000.0;
    let max_jump = s.total_len() * step * 1.01;
    let mut prev = s.point(0.0);
    for i in 1..=2000 {
        let p = s.point(wrap(i as f32 * step));
        let jump = ((p.x - prev.x).powi(2) + (p.y - prev.y).powi(2)).sqrt();
        assert!(jump <= max_jump, "jump {jump} at {i}");
        prev = p;
    }
}

#[test]
fn test_track_shapes_build_curves() {
    let oval = TrackShape::Oval.curve();
    let p = oval.point(0.0);
    assert!((p.x - 1.0).abs() < 1e-6);

    let stadium = TrackShape::Stadium.curve();
    let p = stadium.point(0.0);
    assert!((p.y + 35.0).abs() < 1e-3);
}
