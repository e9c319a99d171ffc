use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    motion::{Point, Spring, SpringConfig, SpringPoint},
    targets::CursorAppearance,
    trail::{Particle, Trail},
};

const CORE_SPRING: SpringConfig = SpringConfig::new(420.0, 28.0, 0.28);
const AURA_SPRING: SpringConfig = SpringConfig::new(140.0, 18.0, 0.8);
const CORE_SHAPE_SPRING: SpringConfig = SpringConfig::new(600.0, 30.0, 1.0);
const AURA_SHAPE_SPRING: SpringConfig = SpringConfig::new(120.0, 16.0, 1.0);

const PRESSED_SCALE: f64 = 0.9;
const HOVER_AURA_ROTATE_DEG: f64 = 8.0;
const IDLE_AURA_BLUR_PX: f64 = 10.0;
const HOVER_AURA_BLUR_PX: f64 = 14.0;

const IDLE_AURA_RADIUS: &str = "999px";
const HOVER_AURA_RADIUS: &str = "36% 64% 60% 40% / 42% 44% 56% 58%";

/// Class put on the document root while the custom cursor is drawn. The
/// stylesheet hides the system cursor only under it.
pub const CUSTOM_CURSOR_CLASS: &str = "cursor-active";

/// Whether the page draws its own cursor or leaves the system one alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMode {
    Custom,
    System,
}

impl CursorMode {
    /// Any sign of touch input turns the custom cursor off entirely.
    pub fn detect(has_ontouchstart: bool, max_touch_points: i32) -> Self {
        if has_ontouchstart || max_touch_points > 0 {
            Self::System
        } else {
            Self::Custom
        }
    }

    pub fn is_custom(self) -> bool {
        self == Self::Custom
    }

    pub fn root_class(self) -> Option<&'static str> {
        match self {
            Self::Custom => Some(CUSTOM_CURSOR_CLASS),
            Self::System => None,
        }
    }
}

/// State behind the custom cursor: the raw pointer, the springs trailing it and
/// the spark trail.
pub struct PointerEngine {
    pointer: Point,
    pressed: bool,
    appearance: CursorAppearance,
    core: SpringPoint,
    aura: SpringPoint,
    core_size: Spring,
    press_scale: Spring,
    aura_size: Spring,
    aura_rotate: Spring,
    aura_blur: Spring,
    trail: Trail,
    rng: SmallRng,
}

impl PointerEngine {
    pub fn new(origin: Point, seed: u64) -> Self {
        let appearance = CursorAppearance::idle();

        Self {
            pointer: origin,
            pressed: false,
            core: SpringPoint::new(CORE_SPRING, origin),
            aura: SpringPoint::new(AURA_SPRING, origin),
            core_size: Spring::new(CORE_SHAPE_SPRING, f64::from(appearance.core)),
            press_scale: Spring::new(CORE_SHAPE_SPRING, 1.0),
            aura_size: Spring::new(AURA_SHAPE_SPRING, f64::from(appearance.aura)),
            aura_rotate: Spring::new(AURA_SHAPE_SPRING, 0.0),
            aura_blur: Spring::new(AURA_SHAPE_SPRING, IDLE_AURA_BLUR_PX),
            appearance,
            trail: Trail::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn pointer_moved(&mut self, position: Point) {
        self.pointer = position;
        self.core.set_target(position);
        self.aura.set_target(position);
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
        self.press_scale
            .set_target(if pressed { PRESSED_SCALE } else { 1.0 });
    }

    pub fn apply_appearance(&mut self, appearance: &CursorAppearance) {
        self.appearance = appearance.clone();
        self.core_size.set_target(f64::from(appearance.core));
        self.aura_size.set_target(f64::from(appearance.aura));

        let (rotate, blur) = if appearance.hovering {
            (HOVER_AURA_ROTATE_DEG, HOVER_AURA_BLUR_PX)
        } else {
            (0.0, IDLE_AURA_BLUR_PX)
        };
        self.aura_rotate.set_target(rotate);
        self.aura_blur.set_target(blur);
    }

    /// One animation frame: steps every spring and grows the trail by one spark.
    pub fn tick(&mut self, delta_seconds: f64, now_ms: f64) {
        self.core.step(delta_seconds);
        self.aura.step(delta_seconds);
        self.core_size.step(delta_seconds);
        self.press_scale.step(delta_seconds);
        self.aura_size.step(delta_seconds);
        self.aura_rotate.step(delta_seconds);
        self.aura_blur.step(delta_seconds);

        self.trail.advance(self.pointer, now_ms, &mut self.rng);
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    pub fn appearance(&self) -> &CursorAppearance {
        &self.appearance
    }

    pub fn core_position(&self) -> Point {
        self.core.position()
    }

    pub fn aura_position(&self) -> Point {
        self.aura.position()
    }

    pub fn core_size(&self) -> f64 {
        self.core_size.value()
    }

    pub fn press_scale(&self) -> f64 {
        self.press_scale.value()
    }

    pub fn aura_size(&self) -> f64 {
        self.aura_size.value()
    }

    pub fn aura_rotate(&self) -> f64 {
        self.aura_rotate.value()
    }

    pub fn aura_blur(&self) -> f64 {
        self.aura_blur.value()
    }

    pub fn aura_border_radius(&self) -> &'static str {
        if self.appearance.hovering {
            HOVER_AURA_RADIUS
        } else {
            IDLE_AURA_RADIUS
        }
    }

    pub fn particles(&self) -> &[Particle] {
        self.trail.particles()
    }
}
