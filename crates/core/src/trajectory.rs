//! Seed points and their fixed-step Euler trajectories.
//!
//! Each [`Trajectory`] freezes its start position when it is seeded. Every
//! frame the whole path is rebuilt from that frozen origin by replaying up to
//! `iteration_count` steps at the current animation time, so paths regrow
//! from their seed as the field changes rather than continuing from where the
//! previous frame stopped.
//!
//! A step moves a point `step_size` pixels along the normalized field
//! direction. A point that is found outside the canvas rectangle is marked
//! exited and never moves again during that replay.

use crate::coords::CoordinateRange;
use crate::ode::OdeSystem;
use crate::vector::Vector;

/// Lifecycle of a point within one replay pass. `Active → Exited` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointState {
    Active,
    Exited,
}

/// Outcome of a single [`TrajectoryIntegrator::step_point`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Moved,
    Exited,
}

/// A moving point in canvas space.
///
/// `acceleration` is carried for completeness; the Euler rule sets the
/// velocity directly from the field and ignores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vector,
    pub velocity: Vector,
    pub acceleration: Vector,
    exited: bool,
}

impl Point {
    /// An active, motionless point at `position`.
    pub fn at(position: Vector) -> Self {
        Self {
            position,
            velocity: Vector::ZERO,
            acceleration: Vector::ZERO,
            exited: false,
        }
    }

    pub fn state(&self) -> PointState {
        if self.exited {
            PointState::Exited
        } else {
            PointState::Active
        }
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    fn mark_exited(&mut self) {
        self.exited = true;
    }
}

/// A seed point: the frozen origin plus the point as left by the last replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    origin: Vector,
    point: Point,
}

impl Trajectory {
    fn new(origin: Vector) -> Self {
        Self {
            origin,
            point: Point::at(origin),
        }
    }

    /// Start position, fixed when the trajectory was seeded.
    pub fn origin(&self) -> Vector {
        self.origin
    }

    /// Point state at the end of the most recent replay.
    pub fn point(&self) -> &Point {
        &self.point
    }
}

/// Polyline produced by replaying one trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// The frozen start position; also `path[0]`.
    pub origin: Vector,
    /// Every visited position, starting with the origin.
    pub path: Vec<Vector>,
    pub exited: bool,
}

impl Trace {
    /// Number of line segments in the polyline.
    pub fn segments(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Owns the seed points and integrates them through an ODE system.
#[derive(Debug, Clone)]
pub struct TrajectoryIntegrator {
    canvas: Vector,
    range: CoordinateRange,
    step_size: f64,
    iteration_count: usize,
    trajectories: Vec<Trajectory>,
}

impl TrajectoryIntegrator {
    /// Pixels moved per Euler step.
    pub const DEFAULT_STEP_SIZE: f64 = 1.0;
    /// Steps replayed per trajectory per frame.
    pub const DEFAULT_ITERATION_COUNT: usize = 500;

    /// Integrates over a canvas of `canvas.x × canvas.y` pixels showing
    /// `range`. Both must already be valid; see [`CoordinateRange::new`].
    pub fn new(canvas: Vector, range: CoordinateRange) -> Self {
        Self {
            canvas,
            range,
            step_size: Self::DEFAULT_STEP_SIZE,
            iteration_count: Self::DEFAULT_ITERATION_COUNT,
            trajectories: Vec::new(),
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn set_step_size(&mut self, step_size: f64) {
        self.step_size = step_size;
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    pub fn set_iteration_count(&mut self, iteration_count: usize) {
        self.iteration_count = iteration_count;
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn origins(&self) -> impl Iterator<Item = Vector> + '_ {
        self.trajectories.iter().map(Trajectory::origin)
    }

    /// Whether `pos` lies in the closed canvas rectangle.
    pub fn contains(&self, pos: Vector) -> bool {
        pos.within_rect(0.0, 0.0, self.canvas.x, self.canvas.y)
    }

    /// Adds a trajectory starting at `pos`.
    pub fn place_seed(&mut self, pos: Vector) {
        self.trajectories.push(Trajectory::new(pos));
    }

    /// Replaces all trajectories with `count` new ones drawn from
    /// `dist(width, height)`.
    pub fn reseed<D>(&mut self, count: usize, mut dist: D)
    where
        D: FnMut(f64, f64) -> Vector,
    {
        self.trajectories.clear();
        self.trajectories
            .extend((0..count).map(|_| Trajectory::new(dist(self.canvas.x, self.canvas.y))));
    }

    pub fn clear(&mut self) {
        self.trajectories.clear();
    }

    /// Removes the trajectory whose origin is closest to `pos`, if it lies
    /// within `threshold` pixels. Returns the removed origin.
    pub fn remove_nearest(&mut self, pos: Vector, threshold: f64) -> Option<Vector> {
        let (idx, dist) = self
            .trajectories
            .iter()
            .enumerate()
            .map(|(i, tr)| (i, tr.origin.distance(pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if dist > threshold {
            return None;
        }
        Some(self.trajectories.remove(idx).origin)
    }

    /// Advances `point` by one Euler step at time `t`.
    ///
    /// A point outside the canvas is marked exited and left where it is.
    pub fn step_point(&self, point: &mut Point, system: &dyn OdeSystem, t: f64) -> StepResult {
        if point.exited || !self.contains(point.position) {
            point.mark_exited();
            return StepResult::Exited;
        }
        let chart_pos = self.range.to_chart_coords(point.position, self.canvas);
        point.velocity = system.eval(chart_pos, t).normalized() * self.step_size;
        point.position += point.velocity;
        StepResult::Moved
    }

    /// Walks a fresh point from `origin` for up to `iteration_count` steps.
    ///
    /// The step that carries the point off the canvas still contributes its
    /// endpoint; the next step sees the exit and ends the walk.
    pub fn trace(&self, origin: Vector, system: &dyn OdeSystem, t: f64) -> (Trace, Point) {
        let mut point = Point::at(origin);
        let mut path = vec![origin];
        for _ in 0..self.iteration_count {
            if self.step_point(&mut point, system, t) == StepResult::Exited {
                break;
            }
            path.push(point.position);
        }
        let trace = Trace {
            origin,
            path,
            exited: point.is_exited(),
        };
        (trace, point)
    }

    /// Rebuilds every trajectory from its origin at time `t`.
    pub fn replay(&mut self, system: &dyn OdeSystem, t: f64) -> Vec<Trace> {
        let mut traces = Vec::with_capacity(self.trajectories.len());
        for i in 0..self.trajectories.len() {
            let (trace, point) = self.trace(self.trajectories[i].origin, system, t);
            self.trajectories[i].point = point;
            traces.push(trace);
        }
        traces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ode::{FnSystem, HarmonicOscillator};

    fn integrator() -> TrajectoryIntegrator {
        TrajectoryIntegrator::new(
            Vector::new(100.0, 100.0),
            CoordinateRange::symmetric(1.0, 1.0).unwrap(),
        )
    }

    fn rightward() -> FnSystem<impl Fn(f64, f64, f64) -> f64, impl Fn(f64, f64, f64) -> f64> {
        FnSystem::new(|_, _, _| 5.0, |_, _, _| 0.0)
    }

    #[test]
    fn point_on_boundary_is_active() {
        let integ = integrator();
        let mut p = Point::at(Vector::new(100.0, 0.0));
        assert_eq!(p.state(), PointState::Active);
        let sys = FnSystem::new(|_, _, _| -1.0, |_, _, _| 0.0);
        assert_eq!(integ.step_point(&mut p, &sys, 0.0), StepResult::Moved);
        assert_eq!(p.state(), PointState::Active);
        assert_eq!(p.position, Vector::new(99.0, 0.0));
    }

    #[test]
    fn step_uses_normalized_direction_times_step_size() {
        let mut integ = integrator();
        integ.set_step_size(2.0);
        let mut p = Point::at(Vector::new(50.0, 50.0));
        integ.step_point(&mut p, &rightward(), 0.0);
        assert_eq!(p.velocity, Vector::new(2.0, 0.0));
        assert_eq!(p.position, Vector::new(52.0, 50.0));
        assert_eq!(p.acceleration, Vector::ZERO);
    }

    #[test]
    fn zero_field_leaves_point_in_place() {
        let integ = integrator();
        let mut p = Point::at(Vector::new(30.0, 40.0));
        let still = FnSystem::new(|_, _, _| 0.0, |_, _, _| 0.0);
        assert_eq!(integ.step_point(&mut p, &still, 0.0), StepResult::Moved);
        assert_eq!(p.position, Vector::new(30.0, 40.0));
    }

    #[test]
    fn outside_point_exits_without_moving() {
        let integ = integrator();
        let mut p = Point::at(Vector::new(100.5, 10.0));
        assert_eq!(integ.step_point(&mut p, &rightward(), 0.0), StepResult::Exited);
        assert_eq!(p.state(), PointState::Exited);
        assert_eq!(p.position, Vector::new(100.5, 10.0));
    }

    #[test]
    fn exit_is_irreversible_within_a_pass() {
        let integ = integrator();
        let mut p = Point::at(Vector::new(101.0, 10.0));
        integ.step_point(&mut p, &rightward(), 0.0);
        p.position = Vector::new(50.0, 50.0);
        assert_eq!(integ.step_point(&mut p, &rightward(), 0.0), StepResult::Exited);
        assert_eq!(p.position, Vector::new(50.0, 50.0));
    }

    #[test]
    fn trace_stops_after_leaving_canvas() {
        let mut integ = integrator();
        integ.set_step_size(1.0);
        integ.set_iteration_count(50);
        let (trace, end) = integ.trace(Vector::new(98.0, 50.0), &rightward(), 0.0);
        // 98 -> 99 -> 100 -> 101 (off canvas), then the exit is observed.
        assert_eq!(
            trace.path,
            vec![
                Vector::new(98.0, 50.0),
                Vector::new(99.0, 50.0),
                Vector::new(100.0, 50.0),
                Vector::new(101.0, 50.0),
            ]
        );
        assert!(trace.exited);
        assert_eq!(trace.segments(), 3);
        assert!(end.is_exited());
    }

    #[test]
    fn trace_respects_iteration_budget() {
        let mut integ = integrator();
        integ.set_iteration_count(10);
        integ.set_step_size(0.5);
        let (trace, _) = integ.trace(Vector::new(10.0, 50.0), &rightward(), 0.0);
        assert_eq!(trace.path.len(), 11);
        assert!(!trace.exited);
        assert_eq!(trace.path[10], Vector::new(15.0, 50.0));
    }

    #[test]
    fn zero_iterations_yield_only_origin() {
        let mut integ = integrator();
        integ.set_iteration_count(0);
        let (trace, _) = integ.trace(Vector::new(10.0, 10.0), &rightward(), 0.0);
        assert_eq!(trace.path, vec![Vector::new(10.0, 10.0)]);
    }

    #[test]
    fn huge_iteration_count_off_canvas_yields_only_origin() {
        let mut integ = integrator();
        integ.set_iteration_count(usize::MAX);
        let (trace, end) = integ.trace(Vector::new(150.0, 50.0), &rightward(), 0.0);
        assert_eq!(trace.path.len(), 1);
        assert!(trace.exited);
        assert!(end.is_exited());
    }

    #[test]
    fn harmonic_orbit_stays_near_its_radius() {
        let mut integ = TrajectoryIntegrator::new(
            Vector::new(400.0, 400.0),
            CoordinateRange::symmetric(2.0, 2.0).unwrap(),
        );
        integ.set_step_size(0.5);
        integ.set_iteration_count(400);
        let center = Vector::new(200.0, 200.0);
        let origin = Vector::new(300.0, 200.0);
        let (trace, _) = integ.trace(origin, &HarmonicOscillator::default(), 0.0);
        assert!(!trace.exited);
        for p in &trace.path {
            let r = p.distance(center);
            assert!((r - 100.0).abs() < 5.0, "radius drifted to {r}");
        }
    }

    #[test]
    fn place_seed_freezes_origin() {
        let mut integ = integrator();
        integ.set_iteration_count(5);
        integ.place_seed(Vector::new(20.0, 20.0));
        integ.replay(&rightward(), 0.0);
        assert_eq!(integ.trajectories()[0].origin(), Vector::new(20.0, 20.0));
        assert_eq!(integ.trajectories()[0].point().position, Vector::new(25.0, 20.0));
    }

    #[test]
    fn replay_restarts_from_origin_every_frame() {
        let mut integ = integrator();
        integ.set_iteration_count(5);
        integ.place_seed(Vector::new(20.0, 20.0));
        let first = integ.replay(&rightward(), 0.0);
        let second = integ.replay(&rightward(), 0.0);
        assert_eq!(first, second);
        assert_eq!(second[0].path[0], Vector::new(20.0, 20.0));
    }

    #[test]
    fn replay_depends_on_time() {
        let mut integ = integrator();
        integ.set_iteration_count(3);
        integ.place_seed(Vector::new(50.0, 50.0));
        let turning = FnSystem::new(|_, _, t: f64| t.cos(), |_, _, t: f64| t.sin());
        let a = integ.replay(&turning, 0.0);
        let b = integ.replay(&turning, std::f64::consts::FRAC_PI_2);
        assert_ne!(a[0].path[1], b[0].path[1]);
    }

    #[test]
    fn reseed_replaces_with_count_points() {
        let mut integ = integrator();
        integ.place_seed(Vector::new(1.0, 1.0));
        let seeds = [
            Vector::new(10.0, 20.0),
            Vector::new(30.0, 40.0),
            Vector::new(50.0, 60.0),
        ];
        let mut k = 0;
        integ.reseed(3, |w, h| {
            assert_eq!((w, h), (100.0, 100.0));
            let p = seeds[k];
            k += 1;
            p
        });
        assert_eq!(integ.len(), 3);
        assert_eq!(integ.origins().collect::<Vec<_>>(), seeds.to_vec());
    }

    #[test]
    fn remove_nearest_honors_threshold() {
        let mut integ = integrator();
        integ.place_seed(Vector::new(10.0, 10.0));
        integ.place_seed(Vector::new(60.0, 60.0));
        assert_eq!(integ.remove_nearest(Vector::new(90.0, 90.0), 5.0), None);
        assert_eq!(
            integ.remove_nearest(Vector::new(58.0, 61.0), 5.0),
            Some(Vector::new(60.0, 60.0))
        );
        assert_eq!(integ.len(), 1);
        integ.clear();
        assert!(integ.is_empty());
        assert_eq!(integ.remove_nearest(Vector::ZERO, 100.0), None);
    }
}
