//! Right-hand sides of planar ODE systems.
//!
//! An [`OdeSystem`] supplies `x' = f(x, y, t)` and `y' = g(x, y, t)` in chart
//! coordinates. Any pair of closures can be wrapped with [`FnSystem`]; the
//! built-in presets are selected by name through [`SystemKind`].
//!
//! Implementations must be pure: same inputs, same output. Nothing here
//! guards against non-finite results; they flow into the geometry as-is.

use noise::{NoiseFn, Perlin};
use serde_json::{json, Value};

use crate::error::VizError;
use crate::params::param_f64;
use crate::vector::Vector;

/// A two-dimensional, possibly non-autonomous, first-order ODE.
pub trait OdeSystem: Send + Sync {
    /// `dx/dt` at `(x, y)` and time `t`.
    fn x_dot(&self, x: f64, y: f64, t: f64) -> f64;

    /// `dy/dt` at `(x, y)` and time `t`.
    fn y_dot(&self, x: f64, y: f64, t: f64) -> f64;

    /// Evaluates both components at a chart-space position.
    fn eval(&self, pos: Vector, t: f64) -> Vector {
        Vector::new(self.x_dot(pos.x, pos.y, t), self.y_dot(pos.x, pos.y, t))
    }
}

/// Adapts two closures into an [`OdeSystem`].
pub struct FnSystem<F, G> {
    x_dot: F,
    y_dot: G,
}

impl<F, G> FnSystem<F, G>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
    G: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    pub fn new(x_dot: F, y_dot: G) -> Self {
        Self { x_dot, y_dot }
    }
}

impl<F, G> OdeSystem for FnSystem<F, G>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
    G: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn x_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        (self.x_dot)(x, y, t)
    }

    fn y_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        (self.y_dot)(x, y, t)
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// `x' = y, y' = -ω²x`. Closed elliptical orbits around the origin.
#[derive(Debug, Clone, Copy)]
pub struct HarmonicOscillator {
    pub omega: f64,
}

/// Pendulum with gravity and a damping coefficient that oscillates in time.
///
/// `x' = y`, `y' = -(g / l)·sin(x) - c(t)·y` where `c(t)` sweeps between
/// `gain·damping_min` and `gain·damping_max` following `sin(t)`.
#[derive(Debug, Clone, Copy)]
pub struct DampedPendulum {
    pub gravity: f64,
    pub length: f64,
    pub damping_min: f64,
    pub damping_max: f64,
    pub damping_gain: f64,
}

/// `x' = y, y' = μ(1 - x²)y - x`. Converges onto a limit cycle.
#[derive(Debug, Clone, Copy)]
pub struct VanDerPol {
    pub mu: f64,
}

/// `x' = x, y' = -y`. Hyperbolic fixed point at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Saddle;

/// `x' = -a·x - ω·y, y' = ω·x - a·y`. Spirals into the origin for `a > 0`.
#[derive(Debug, Clone, Copy)]
pub struct SpiralSink {
    pub decay: f64,
    pub omega: f64,
}

/// Gaussian vortex whose center circles the origin over time.
#[derive(Debug, Clone, Copy)]
pub struct OrbitingVortex {
    pub strength: f64,
    pub radius: f64,
    pub orbit_radius: f64,
    pub orbit_speed: f64,
}

/// Time-varying flow built from two decorrelated Perlin noise samples.
pub struct PerlinFlow {
    noise: Perlin,
    scale: f64,
    strength: f64,
    drift: f64,
}

/// Distances below this are treated as zero.
const SINGULARITY_EPS: f64 = 1e-10;

/// Offset between the x and y noise lookups.
const NOISE_DECORRELATION: f64 = 100.0;

impl Default for HarmonicOscillator {
    fn default() -> Self {
        Self { omega: 1.0 }
    }
}

impl Default for DampedPendulum {
    fn default() -> Self {
        Self {
            gravity: 9.807,
            length: 10.0,
            damping_min: 0.001,
            damping_max: 0.1,
            damping_gain: 10.0,
        }
    }
}

impl DampedPendulum {
    /// Damping coefficient at time `t`.
    pub fn damping(&self, t: f64) -> f64 {
        let s = (t.sin() + 1.0) / 2.0;
        (self.damping_min + s * (self.damping_max - self.damping_min)) * self.damping_gain
    }
}

impl Default for VanDerPol {
    fn default() -> Self {
        Self { mu: 1.0 }
    }
}

impl Default for SpiralSink {
    fn default() -> Self {
        Self {
            decay: 0.2,
            omega: 1.0,
        }
    }
}

impl Default for OrbitingVortex {
    fn default() -> Self {
        Self {
            strength: 2.0,
            radius: 2.0,
            orbit_radius: 2.0,
            orbit_speed: 0.5,
        }
    }
}

impl OrbitingVortex {
    /// Vortex center at time `t`.
    pub fn center(&self, t: f64) -> Vector {
        let phase = t * self.orbit_speed;
        Vector::new(
            self.orbit_radius * phase.cos(),
            self.orbit_radius * phase.sin(),
        )
    }

    fn velocity(&self, x: f64, y: f64, t: f64) -> (f64, f64) {
        let c = self.center(t);
        let rx = x - c.x;
        let ry = y - c.y;
        let dist_sq = rx * rx + ry * ry;
        let dist = dist_sq.sqrt();
        if dist < SINGULARITY_EPS || self.radius.abs() < SINGULARITY_EPS {
            return (0.0, 0.0);
        }
        let falloff = (-dist_sq / (2.0 * self.radius * self.radius)).exp();
        (
            -ry / dist * self.strength * falloff,
            rx / dist * self.strength * falloff,
        )
    }
}

impl PerlinFlow {
    pub fn new(scale: f64, strength: f64, drift: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            strength,
            drift,
        }
    }
}

impl OdeSystem for HarmonicOscillator {
    fn x_dot(&self, _x: f64, y: f64, _t: f64) -> f64 {
        y
    }

    fn y_dot(&self, x: f64, _y: f64, _t: f64) -> f64 {
        -self.omega * self.omega * x
    }
}

impl OdeSystem for DampedPendulum {
    fn x_dot(&self, _x: f64, y: f64, _t: f64) -> f64 {
        y
    }

    fn y_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        -self.gravity / self.length * x.sin() - self.damping(t) * y
    }
}

impl OdeSystem for VanDerPol {
    fn x_dot(&self, _x: f64, y: f64, _t: f64) -> f64 {
        y
    }

    fn y_dot(&self, x: f64, y: f64, _t: f64) -> f64 {
        self.mu * (1.0 - x * x) * y - x
    }
}

impl OdeSystem for Saddle {
    fn x_dot(&self, x: f64, _y: f64, _t: f64) -> f64 {
        x
    }

    fn y_dot(&self, _x: f64, y: f64, _t: f64) -> f64 {
        -y
    }
}

impl OdeSystem for SpiralSink {
    fn x_dot(&self, x: f64, y: f64, _t: f64) -> f64 {
        -self.decay * x - self.omega * y
    }

    fn y_dot(&self, x: f64, y: f64, _t: f64) -> f64 {
        self.omega * x - self.decay * y
    }
}

impl OdeSystem for OrbitingVortex {
    fn x_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        self.velocity(x, y, t).0
    }

    fn y_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        self.velocity(x, y, t).1
    }
}

impl OdeSystem for PerlinFlow {
    fn x_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        self.noise
            .get([x * self.scale, y * self.scale, t * self.drift])
            * self.strength
    }

    fn y_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        self.noise.get([
            x * self.scale + NOISE_DECORRELATION,
            y * self.scale + NOISE_DECORRELATION,
            t * self.drift,
        ]) * self.strength
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

const SYSTEM_NAMES: &[&str] = &[
    "harmonic",
    "pendulum",
    "van-der-pol",
    "saddle",
    "spiral",
    "vortex",
    "perlin",
];

/// The built-in systems, constructible by name.
pub enum SystemKind {
    Harmonic(HarmonicOscillator),
    Pendulum(DampedPendulum),
    VanDerPol(VanDerPol),
    Saddle(Saddle),
    Spiral(SpiralSink),
    Vortex(OrbitingVortex),
    Perlin(PerlinFlow, PerlinParams),
}

/// Construction parameters kept alongside a [`PerlinFlow`] so they can be
/// reported back.
#[derive(Debug, Clone, Copy)]
pub struct PerlinParams {
    pub scale: f64,
    pub strength: f64,
    pub drift: f64,
    pub seed: u32,
}

impl SystemKind {
    /// Builds a preset, reading its parameters from `params` with defaults
    /// for anything missing.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, VizError> {
        match name {
            "harmonic" => Ok(SystemKind::Harmonic(HarmonicOscillator {
                omega: param_f64(params, "omega", HarmonicOscillator::default().omega),
            })),
            "pendulum" => {
                let d = DampedPendulum::default();
                Ok(SystemKind::Pendulum(DampedPendulum {
                    gravity: param_f64(params, "gravity", d.gravity),
                    length: param_f64(params, "length", d.length),
                    damping_min: param_f64(params, "damping_min", d.damping_min),
                    damping_max: param_f64(params, "damping_max", d.damping_max),
                    damping_gain: param_f64(params, "damping_gain", d.damping_gain),
                }))
            }
            "van-der-pol" => Ok(SystemKind::VanDerPol(VanDerPol {
                mu: param_f64(params, "mu", VanDerPol::default().mu),
            })),
            "saddle" => Ok(SystemKind::Saddle(Saddle)),
            "spiral" => {
                let d = SpiralSink::default();
                Ok(SystemKind::Spiral(SpiralSink {
                    decay: param_f64(params, "decay", d.decay),
                    omega: param_f64(params, "omega", d.omega),
                }))
            }
            "vortex" => {
                let d = OrbitingVortex::default();
                Ok(SystemKind::Vortex(OrbitingVortex {
                    strength: param_f64(params, "strength", d.strength),
                    radius: param_f64(params, "radius", d.radius),
                    orbit_radius: param_f64(params, "orbit_radius", d.orbit_radius),
                    orbit_speed: param_f64(params, "orbit_speed", d.orbit_speed),
                }))
            }
            "perlin" => {
                let raw_seed = params.get("seed").and_then(Value::as_u64).unwrap_or(0);
                let seed = u32::try_from(raw_seed).map_err(|_| VizError::InvalidSetting {
                    name: "seed".to_string(),
                    reason: format!("perlin seed {raw_seed} exceeds {}", u32::MAX),
                })?;
                let p = PerlinParams {
                    scale: param_f64(params, "scale", 0.3),
                    strength: param_f64(params, "strength", 1.0),
                    drift: param_f64(params, "drift", 0.2),
                    seed,
                };
                Ok(SystemKind::Perlin(
                    PerlinFlow::new(p.scale, p.strength, p.drift, p.seed),
                    p,
                ))
            }
            _ => Err(VizError::UnknownSystem(name.to_string())),
        }
    }

    /// Names accepted by [`SystemKind::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        SYSTEM_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            SystemKind::Harmonic(_) => "harmonic",
            SystemKind::Pendulum(_) => "pendulum",
            SystemKind::VanDerPol(_) => "van-der-pol",
            SystemKind::Saddle(_) => "saddle",
            SystemKind::Spiral(_) => "spiral",
            SystemKind::Vortex(_) => "vortex",
            SystemKind::Perlin(..) => "perlin",
        }
    }

    /// Current parameter values as a JSON object.
    pub fn params(&self) -> Value {
        match self {
            SystemKind::Harmonic(s) => json!({ "omega": s.omega }),
            SystemKind::Pendulum(s) => json!({
                "gravity": s.gravity,
                "length": s.length,
                "damping_min": s.damping_min,
                "damping_max": s.damping_max,
                "damping_gain": s.damping_gain,
            }),
            SystemKind::VanDerPol(s) => json!({ "mu": s.mu }),
            SystemKind::Saddle(_) => json!({}),
            SystemKind::Spiral(s) => json!({ "decay": s.decay, "omega": s.omega }),
            SystemKind::Vortex(s) => json!({
                "strength": s.strength,
                "radius": s.radius,
                "orbit_radius": s.orbit_radius,
                "orbit_speed": s.orbit_speed,
            }),
            SystemKind::Perlin(_, p) => json!({
                "scale": p.scale,
                "strength": p.strength,
                "drift": p.drift,
                "seed": p.seed,
            }),
        }
    }

    fn inner(&self) -> &dyn OdeSystem {
        match self {
            SystemKind::Harmonic(s) => s,
            SystemKind::Pendulum(s) => s,
            SystemKind::VanDerPol(s) => s,
            SystemKind::Saddle(s) => s,
            SystemKind::Spiral(s) => s,
            SystemKind::Vortex(s) => s,
            SystemKind::Perlin(s, _) => s,
        }
    }
}

impl OdeSystem for SystemKind {
    fn x_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        self.inner().x_dot(x, y, t)
    }

    fn y_dot(&self, x: f64, y: f64, t: f64) -> f64 {
        self.inner().y_dot(x, y, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn fn_system_forwards_to_closures() {
        let sys = FnSystem::new(|x, y, t| x + y + t, |x, y, t| x * y * t);
        assert!((sys.x_dot(1.0, 2.0, 3.0) - 6.0).abs() < EPSILON);
        assert!((sys.y_dot(1.0, 2.0, 3.0) - 6.0).abs() < EPSILON);
        assert_eq!(sys.eval(Vector::new(1.0, 2.0), 3.0), Vector::new(6.0, 6.0));
    }

    #[test]
    fn harmonic_oscillator_is_rotation() {
        let h = HarmonicOscillator::default();
        assert_eq!(h.eval(Vector::new(0.5, -0.25), 0.0), Vector::new(-0.25, -0.5));
    }

    #[test]
    fn pendulum_damping_sweeps_between_bounds() {
        let p = DampedPendulum::default();
        let low = p.damping(-std::f64::consts::FRAC_PI_2);
        let high = p.damping(std::f64::consts::FRAC_PI_2);
        assert!((low - 0.01).abs() < 1e-9, "low = {low}");
        assert!((high - 1.0).abs() < 1e-9, "high = {high}");
    }

    #[test]
    fn pendulum_at_rest_stays_at_rest() {
        let p = DampedPendulum::default();
        let v = p.eval(Vector::ZERO, 1.3);
        assert!(v.magnitude() < EPSILON);
    }

    #[test]
    fn van_der_pol_matches_formula() {
        let s = VanDerPol { mu: 2.0 };
        let v = s.eval(Vector::new(2.0, 1.0), 0.0);
        assert!((v.x - 1.0).abs() < EPSILON);
        assert!((v.y - (2.0 * (1.0 - 4.0) * 1.0 - 2.0)).abs() < EPSILON);
    }

    #[test]
    fn spiral_sink_points_inward() {
        let s = SpiralSink::default();
        let p = Vector::new(1.0, 1.0);
        assert!(s.eval(p, 0.0).dot(p) < 0.0);
    }

    #[test]
    fn vortex_is_tangential_to_center() {
        let v = OrbitingVortex::default();
        let t = 0.7;
        let c = v.center(t);
        let p = c + Vector::new(0.5, 0.25);
        let flow = v.eval(p, t);
        assert!(flow.magnitude() > 0.0);
        assert!(flow.dot(p - c).abs() < 1e-9);
    }

    #[test]
    fn vortex_center_is_zero() {
        let v = OrbitingVortex::default();
        let c = v.center(0.0);
        assert_eq!(v.eval(c, 0.0), Vector::ZERO);
    }

    #[test]
    fn perlin_flow_is_deterministic() {
        let a = PerlinFlow::new(0.3, 2.0, 0.2, 7);
        let b = PerlinFlow::new(0.3, 2.0, 0.2, 7);
        for i in 0..20 {
            let p = Vector::new(i as f64 * 0.37, i as f64 * -0.21);
            let va = a.eval(p, i as f64);
            let vb = b.eval(p, i as f64);
            assert_eq!(va, vb);
            assert!(va.is_finite());
        }
    }

    #[test]
    fn from_name_builds_every_listed_system() {
        for name in SystemKind::list_names() {
            let sys = SystemKind::from_name(name, &json!({})).unwrap();
            assert_eq!(sys.name(), *name);
            assert!(sys.params().is_object());
        }
    }

    #[test]
    fn from_name_reads_params() {
        let sys = SystemKind::from_name("harmonic", &json!({"omega": 2.0})).unwrap();
        assert_eq!(sys.params()["omega"], 2.0);
        assert_eq!(sys.eval(Vector::new(1.0, 0.0), 0.0), Vector::new(0.0, -4.0));
    }

    #[test]
    fn from_name_unknown_returns_error() {
        assert!(matches!(
            SystemKind::from_name("lorenz", &json!({})),
            Err(VizError::UnknownSystem(_))
        ));
    }

    #[test]
    fn perlin_seed_beyond_u32_is_rejected() {
        let ok = SystemKind::from_name("perlin", &json!({"seed": u32::MAX})).unwrap();
        assert_eq!(ok.params()["seed"], u32::MAX);
        assert!(matches!(
            SystemKind::from_name("perlin", &json!({"seed": u64::from(u32::MAX) + 1})),
            Err(VizError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn system_kind_is_object_safe_behind_dyn() {
        let boxed: Box<dyn OdeSystem> =
            Box::new(SystemKind::from_name("saddle", &json!({})).unwrap());
        assert_eq!(boxed.eval(Vector::new(1.0, 1.0), 0.0), Vector::new(1.0, -1.0));
    }
}
