const MAX_SUBSTEP_SECONDS: f64 = 1.0 / 240.0;
const REST_DELTA: f64 = 0.01;
const REST_SPEED: f64 = 0.05;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringConfig {
    pub const fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    fn acceleration(&self, displacement: f64, velocity: f64) -> f64 {
        (-self.stiffness * displacement - self.damping * velocity) / self.mass
    }
}

/// Damped harmonic oscillator chasing a target value.
///
/// Integrated with RK4 over fixed substeps so the result does not depend on the
/// frame rate. Once both the displacement and the velocity drop under the rest
/// thresholds the value snaps onto the target and the spring stops moving.
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn jump_to(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advances the spring by `dt` seconds. Returns whether the value moved.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.is_settled() || dt <= 0.0 {
            return false;
        }

        let substeps = (dt / MAX_SUBSTEP_SECONDS).ceil().max(1.0);
        let h = dt / substeps;
        for _ in 0..substeps as usize {
            self.rk4_step(h);
        }

        if (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED {
            self.value = self.target;
            self.velocity = 0.0;
        }

        true
    }

    fn rk4_step(&mut self, h: f64) {
        let config = self.config;
        let x0 = self.value - self.target;
        let v0 = self.velocity;

        let (k1x, k1v) = (v0, config.acceleration(x0, v0));
        let (k2x, k2v) = {
            let (x, v) = (x0 + k1x * h / 2.0, v0 + k1v * h / 2.0);
            (v, config.acceleration(x, v))
        };
        let (k3x, k3v) = {
            let (x, v) = (x0 + k2x * h / 2.0, v0 + k2v * h / 2.0);
            (v, config.acceleration(x, v))
        };
        let (k4x, k4v) = {
            let (x, v) = (x0 + k3x * h, v0 + k3v * h);
            (v, config.acceleration(x, v))
        };

        let x1 = x0 + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        let v1 = v0 + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);

        self.value = self.target + x1;
        self.velocity = v1;
    }
}

#[derive(Clone, Debug)]
pub struct SpringPoint {
    x: Spring,
    y: Spring,
}

impl SpringPoint {
    pub fn new(config: SpringConfig, initial: Point) -> Self {
        Self {
            x: Spring::new(config, initial.x),
            y: Spring::new(config, initial.y),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }

    pub fn set_target(&mut self, target: Point) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    pub fn jump_to(&mut self, position: Point) {
        self.x.jump_to(position.x);
        self.y.jump_to(position.y);
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }

    pub fn step(&mut self, dt: f64) -> bool {
        let moved_x = self.x.step(dt);
        let moved_y = self.y.step(dt);
        moved_x || moved_y
    }
}

/// Linear map from `input` onto `output`, clamped to the input domain.
pub fn map_range(value: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let span = input.1 - input.0;
    if span == 0.0 {
        return output.0;
    }

    let progress = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + progress * (output.1 - output.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn run_frames(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.step(FRAME);
        }
    }

    #[test]
    fn spring_settles_exactly_on_stationary_target() {
        let mut spring = Spring::new(SpringConfig::new(140.0, 18.0, 0.8), 0.0);
        spring.set_target(640.0);

        run_frames(&mut spring, 240);

        assert!(spring.is_settled());
        assert_eq!(spring.value(), 640.0);
    }

    #[test]
    fn settled_spring_stays_put() {
        let mut spring = Spring::new(SpringConfig::new(420.0, 28.0, 0.28), 12.0);
        spring.set_target(300.0);
        run_frames(&mut spring, 240);

        for _ in 0..120 {
            assert!(!spring.step(FRAME));
            assert_eq!(spring.value(), 300.0);
        }
    }

    #[test]
    fn overdamped_spring_never_overshoots() {
        let mut spring = Spring::new(SpringConfig::new(420.0, 28.0, 0.28), 0.0);
        spring.set_target(500.0);

        let mut previous = spring.value();
        for _ in 0..240 {
            spring.step(FRAME);
            assert!(spring.value() <= 500.0);
            assert!(spring.value() >= previous);
            previous = spring.value();
        }
    }

    #[test]
    fn step_result_does_not_depend_on_frame_size() {
        let config = SpringConfig::new(200.0, 18.0, 1.0);
        let mut coarse = Spring::new(config, 0.0);
        let mut fine = Spring::new(config, 0.0);
        coarse.set_target(80.0);
        fine.set_target(80.0);

        coarse.step(0.1);
        for _ in 0..10 {
            fine.step(0.01);
        }

        assert!((coarse.value() - fine.value()).abs() < 1e-3);
    }

    #[test]
    fn jump_to_skips_animation() {
        let mut point = SpringPoint::new(SpringConfig::new(220.0, 20.0, 1.0), Point::ORIGIN);
        point.set_target(Point::new(40.0, -40.0));
        point.step(FRAME);

        point.jump_to(Point::new(5.0, 6.0));

        assert!(point.is_settled());
        assert_eq!(point.position(), Point::new(5.0, 6.0));
    }

    #[test]
    fn map_range_clamps_outside_input_domain() {
        assert_eq!(map_range(0.0, (-80.0, 80.0), (-8.0, 8.0)), 0.0);
        assert_eq!(map_range(80.0, (-80.0, 80.0), (-8.0, 8.0)), 8.0);
        assert_eq!(map_range(400.0, (-80.0, 80.0), (-8.0, 8.0)), 8.0);
        assert_eq!(map_range(-400.0, (-80.0, 80.0), (8.0, -8.0)), 8.0);
        assert_eq!(map_range(40.0, (-80.0, 80.0), (8.0, -8.0)), -4.0);
    }

    #[test]
    fn map_range_with_empty_domain_returns_output_start() {
        assert_eq!(map_range(3.0, (1.0, 1.0), (5.0, 9.0)), 5.0);
    }
}
