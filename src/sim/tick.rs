//! Fixed timestep frame driver
//!
//! Each physics step runs, in order: the before-step hook (launcher state
//! machine, explosion, scroll unlock), the pointer constraint, the world
//! step, and the after-step hook (cleanup). The trailing scroll update is
//! checked once per frame.

use super::host::ScrollGate;
use super::launcher::LaunchEvent;
use super::scroll::RegionSource;
use super::state::SceneState;
use super::text_fit::TextMeasure;
use super::walls::cleanup_tick;
use super::world::PhysicsWorld;
use crate::consts::*;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Physics steps run this frame
    pub substeps: u32,
    /// Stickers spawned by the explosion (non-zero on one frame only)
    pub spawned: usize,
    /// Bodies removed by cleanup
    pub removed: usize,
    pub scroll_unlocked: bool,
}

/// Advance the scene to `now_ms`
pub fn tick<W, M, S, G>(
    state: &mut SceneState<W>,
    now_ms: f64,
    measure: &M,
    regions: &S,
    gate: &mut G,
) -> FrameReport
where
    W: PhysicsWorld,
    M: TextMeasure + ?Sized,
    S: RegionSource + ?Sized,
    G: ScrollGate + ?Sized,
{
    let delta = match state.last_frame_ms {
        Some(last) => (now_ms - last).clamp(0.0, MAX_STEP_MS),
        None => STEP_MS,
    };
    state.last_frame_ms = Some(now_ms);
    state.accumulator += delta;

    let mut report = FrameReport::default();
    while state.accumulator >= STEP_MS && report.substeps < MAX_SUBSTEPS {
        before_step(state, now_ms, measure, gate, &mut report);
        state.pointer.apply(&mut state.world);
        state.world.step(STEP_MS);
        after_step(state, &mut report);

        state.accumulator -= STEP_MS;
        report.substeps += 1;
    }

    if state.scroll_debounce.take_due(now_ms) {
        let viewport_h = state.viewport().y;
        state.tracker.update(&mut state.world, regions, viewport_h);
    }

    if report.removed > 0 {
        log::debug!(
            "Frame: {} steps, {} removed, {} bodies left",
            report.substeps,
            report.removed,
            state.world.len()
        );
    }
    report
}

fn before_step<W, M, G>(
    state: &mut SceneState<W>,
    now_ms: f64,
    measure: &M,
    gate: &mut G,
    report: &mut FrameReport,
) where
    W: PhysicsWorld,
    M: TextMeasure + ?Sized,
    G: ScrollGate + ?Sized,
{
    match state.launcher.tick(&mut state.world, &mut state.rng, now_ms) {
        LaunchEvent::Exploded => {
            let count = state.config.launch_count;
            report.spawned += state.explode_from_box(count, measure).len();
        }
        LaunchEvent::ScrollUnlocked => {
            gate.allow_scroll();
            report.scroll_unlocked = true;
            log::info!("Scrolling unlocked");
        }
        LaunchEvent::Vibrating | LaunchEvent::Idle => {}
    }
}

fn after_step<W: PhysicsWorld>(state: &mut SceneState<W>, report: &mut FrameReport) {
    let viewport_h = state.viewport().y;
    let removed = cleanup_tick(&mut state.world, viewport_h, state.config.cleanup_margin);
    if !removed.is_empty() {
        report.removed += removed.len();
        state.forget(&removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::settings::SceneConfig;
    use crate::sim::host::{Clock, LatchGate, ManualClock};
    use crate::sim::scroll::TrackedRegion;
    use crate::sim::text_fit::ApproxMeasure;
    use crate::sim::world::{Body, BodyOptions};
    use glam::Vec2;

    const VIEWPORT: Vec2 = Vec2::new(1200.0, 800.0);

    struct NoPage;

    impl RegionSource for NoPage {
        fn host_rect(&self) -> Option<Rect> {
            None
        }

        fn region_rect(&self, _region: TrackedRegion) -> Option<Rect> {
            None
        }
    }

    /// Run frames at 60 Hz until `until_ms`, returning the summed report
    fn run(state: &mut SceneState, clock: &ManualClock, gate: &mut LatchGate, until_ms: f64) -> FrameReport {
        let mut total = FrameReport::default();
        while clock.now_ms() < until_ms {
            clock.advance(STEP_MS);
            let report = tick(state, clock.now_ms(), &ApproxMeasure::default(), &NoPage, gate);
            total.substeps += report.substeps;
            total.spawned += report.spawned;
            total.removed += report.removed;
            total.scroll_unlocked |= report.scroll_unlocked;
        }
        total
    }

    #[test]
    fn test_explodes_exactly_once() {
        let clock = ManualClock::new(0.0);
        let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 1, clock.now_ms());
        let mut gate = LatchGate::default();

        let report = run(&mut state, &clock, &mut gate, 1900.0);
        assert_eq!(report.spawned, 0);
        assert!(!state.launcher.is_exploded());

        let report = run(&mut state, &clock, &mut gate, 6000.0);
        assert_eq!(report.spawned, LAUNCH_COUNT);
        assert!(state.launcher.is_exploded());
        assert!(state.sticker_count() <= LAUNCH_COUNT);
    }

    #[test]
    fn test_scroll_gate_fires_once() {
        let clock = ManualClock::new(0.0);
        let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 1, clock.now_ms());
        let mut gate = LatchGate::default();

        run(&mut state, &clock, &mut gate, 2900.0);
        assert_eq!(gate.opened, 0);
        run(&mut state, &clock, &mut gate, 8000.0);
        assert_eq!(gate.opened, 1);
    }

    #[test]
    fn test_first_frame_runs_one_step() {
        let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 1, 0.0);
        let report = tick(&mut state, 0.0, &ApproxMeasure::default(), &NoPage, &mut LatchGate::default());
        assert_eq!(report.substeps, 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 1, 0.0);
        let measure = ApproxMeasure::default();
        let mut gate = LatchGate::default();
        tick(&mut state, 0.0, &measure, &NoPage, &mut gate);

        let report = tick(&mut state, 5000.0, &measure, &NoPage, &mut gate);
        assert!(report.substeps <= 2);
    }

    #[test]
    fn test_cleanup_forgets_fallen_stickers() {
        let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 1, 0.0);
        let handles = state.explode_from_box(2, &ApproxMeasure::default());
        state.world.set_position(handles[0], Vec2::new(100.0, 5000.0));
        let bystander = state
            .world
            .add(Body::circle(Vec2::new(100.0, 5000.0), 10.0, BodyOptions::fixed()));

        let report = tick(&mut state, 0.0, &ApproxMeasure::default(), &NoPage, &mut LatchGate::default());
        assert_eq!(report.removed, 1);
        assert_eq!(state.sticker_count(), 1);
        assert!(state.world.contains(bystander));
    }

    #[test]
    fn test_same_seed_same_scene() {
        let simulate = || {
            let clock = ManualClock::new(0.0);
            let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 99, clock.now_ms());
            run(&mut state, &clock, &mut LatchGate::default(), 3000.0);
            state
                .stickers()
                .map(|s| (s.kind, state.world.body(s.handle).map(|b| b.position)))
                .collect::<Vec<_>>()
        };
        let a = simulate();
        assert!(!a.is_empty());
        assert_eq!(a, simulate());
    }

    #[test]
    fn test_settled_stickers_do_not_stack() {
        let clock = ManualClock::new(0.0);
        let mut state = SceneState::new(SceneConfig::default(), VIEWPORT, 42, clock.now_ms());
        run(&mut state, &clock, &mut LatchGate::default(), 10_000.0);

        let centers: Vec<Vec2> = state
            .stickers()
            .filter_map(|s| state.world.body(s.handle).map(|b| b.position))
            .collect();
        assert!(centers.len() > 1);

        // Every sticker is at least 60 px across, so centers this close mean overlap
        let stacked = centers
            .iter()
            .enumerate()
            .flat_map(|(i, a)| centers[i + 1..].iter().map(move |b| a.distance(*b)))
            .filter(|d| *d < 30.0)
            .count();
        assert_eq!(stacked, 0);
    }
}
