use std::{
    cell::RefCell,
    f64::consts::{FRAC_PI_4, TAU},
    rc::Rc,
};

use crate::{
    motion::{map_range, Point, Spring, SpringConfig, SpringPoint},
    ticker::{start_ticks_while, FrameScheduler, TickHandle},
};

pub const DEFAULT_ACCENT: &str = "#2563eb";

const OFFSET_RANGE: (f64, f64) = (-80.0, 80.0);
const MAX_TILT_DEG: f64 = 8.0;
const HIGHLIGHT_INSET_PERCENT: f64 = 20.0;
const HIGHLIGHT_SPAN_PERCENT: f64 = 60.0;

pub const PEG_COUNT: usize = 6;
const PEG_RADIUS_X: f64 = 130.0;
const PEG_RADIUS_Y: f64 = 85.0;
const PEG_LIFT_PX: f64 = 3.0;

pub const PROGRESS_REST_PERCENT: f64 = 35.0;
pub const PROGRESS_FULL_PERCENT: f64 = 100.0;

const RING_HOVER_ROTATE_DEG: f64 = 20.0;
const RING_HOVER_SCALE: f64 = 1.1;
const PUCK_HOVER_LIFT_PX: f64 = -6.0;
const PUCK_HOVER_ROTATE_DEG: f64 = -6.0;

const TILT_SPRING: SpringConfig = SpringConfig::new(200.0, 18.0, 1.0);
const CHASE_SPRING: SpringConfig = SpringConfig::new(220.0, 20.0, 1.0);
const RING_SPRING: SpringConfig = SpringConfig::new(160.0, 14.0, 1.0);
const PUCK_SPRING: SpringConfig = SpringConfig::new(220.0, 16.0, 1.0);
const PEG_SPRING: SpringConfig = SpringConfig::new(300.0, 18.0, 1.0);
const FADE_SPRING: SpringConfig = SpringConfig::new(100.0, 10.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

pub fn pointer_offset(client: Point, rect: CardRect) -> Point {
    Point::new(
        client.x - rect.left - rect.width / 2.0,
        client.y - rect.top - rect.height / 2.0,
    )
}

pub fn tilt_for(offset: Point) -> Tilt {
    Tilt {
        rotate_x: map_range(offset.y, OFFSET_RANGE, (MAX_TILT_DEG, -MAX_TILT_DEG)),
        rotate_y: map_range(offset.x, OFFSET_RANGE, (-MAX_TILT_DEG, MAX_TILT_DEG)),
    }
}

/// Centre of the radial highlight, in percent of the card box.
pub fn highlight_center(offset: Point) -> Point {
    let axis = |value: f64| {
        let normalized = (value - OFFSET_RANGE.0) / (OFFSET_RANGE.1 - OFFSET_RANGE.0);
        (HIGHLIGHT_INSET_PERCENT + normalized * HIGHLIGHT_SPAN_PERCENT).clamp(0.0, 100.0)
    };

    Point::new(axis(offset.x), axis(offset.y))
}

pub fn highlight_gradient(offset: Point) -> String {
    let center = highlight_center(offset);
    format!(
        "radial-gradient(circle at {:.2}% {:.2}%, rgba(255,255,255,0.4), transparent 60%)",
        center.x, center.y
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peg {
    pub index: usize,
    pub angle: f64,
    /// Offset from the card centre in pixels.
    pub position: Point,
    /// Vertical displacement while the card is hovered.
    pub hover_lift: f64,
}

pub fn pegs() -> [Peg; PEG_COUNT] {
    std::array::from_fn(|index| {
        let angle = index as f64 / PEG_COUNT as f64 * TAU;
        Peg {
            index,
            angle,
            position: Point::new(angle.cos() * PEG_RADIUS_X, angle.sin() * PEG_RADIUS_Y),
            hover_lift: (angle + FRAC_PI_4).sin() * PEG_LIFT_PX,
        }
    })
}

/// Hover flag and pointer offset of one card, plus the springs animating it.
pub struct HoverCardModel {
    hovered: bool,
    offset: Point,
    rotate_x: Spring,
    rotate_y: Spring,
    chase: SpringPoint,
    chase_visibility: Spring,
    ring_rotate: Spring,
    ring_scale: Spring,
    puck_lift: Spring,
    puck_rotate: Spring,
    peg_lift: Spring,
    progress: Spring,
}

impl Default for HoverCardModel {
    fn default() -> Self {
        Self {
            hovered: false,
            offset: Point::ORIGIN,
            rotate_x: Spring::new(TILT_SPRING, 0.0),
            rotate_y: Spring::new(TILT_SPRING, 0.0),
            chase: SpringPoint::new(CHASE_SPRING, Point::ORIGIN),
            chase_visibility: Spring::new(FADE_SPRING, 0.0),
            ring_rotate: Spring::new(RING_SPRING, 0.0),
            ring_scale: Spring::new(RING_SPRING, 1.0),
            puck_lift: Spring::new(PUCK_SPRING, 0.0),
            puck_rotate: Spring::new(PUCK_SPRING, 0.0),
            peg_lift: Spring::new(PEG_SPRING, 0.0),
            progress: Spring::new(RING_SPRING, PROGRESS_REST_PERCENT),
        }
    }
}

impl HoverCardModel {
    pub fn pointer_enter(&mut self) {
        self.set_hovered(true);
    }

    pub fn pointer_leave(&mut self) {
        self.set_hovered(false);
        self.set_offset(Point::ORIGIN);
    }

    pub fn pointer_moved(&mut self, client: Point, rect: CardRect) {
        self.set_offset(pointer_offset(client, rect));
    }

    fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
        let tilt = tilt_for(offset);
        self.rotate_x.set_target(tilt.rotate_x);
        self.rotate_y.set_target(tilt.rotate_y);
        self.chase.set_target(offset);
    }

    fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        let pick = |hover_value: f64, rest_value: f64| if hovered { hover_value } else { rest_value };

        self.chase_visibility.set_target(pick(1.0, 0.0));
        self.ring_rotate.set_target(pick(RING_HOVER_ROTATE_DEG, 0.0));
        self.ring_scale.set_target(pick(RING_HOVER_SCALE, 1.0));
        self.puck_lift.set_target(pick(PUCK_HOVER_LIFT_PX, 0.0));
        self.puck_rotate.set_target(pick(PUCK_HOVER_ROTATE_DEG, 0.0));
        self.peg_lift.set_target(pick(1.0, 0.0));
        self.progress
            .set_target(pick(PROGRESS_FULL_PERCENT, PROGRESS_REST_PERCENT));
    }

    /// Steps every spring. Returns whether anything visible moved.
    pub fn step(&mut self, dt: f64) -> bool {
        [
            self.rotate_x.step(dt),
            self.rotate_y.step(dt),
            self.chase.step(dt),
            self.chase_visibility.step(dt),
            self.ring_rotate.step(dt),
            self.ring_scale.step(dt),
            self.puck_lift.step(dt),
            self.puck_rotate.step(dt),
            self.peg_lift.step(dt),
            self.progress.step(dt),
        ]
        .into_iter()
        .any(|moved| moved)
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn tilt(&self) -> Tilt {
        Tilt {
            rotate_x: self.rotate_x.value(),
            rotate_y: self.rotate_y.value(),
        }
    }

    pub fn highlight(&self) -> String {
        highlight_gradient(self.offset)
    }

    pub fn chase_position(&self) -> Point {
        self.chase.position()
    }

    pub fn chase_visibility(&self) -> f64 {
        self.chase_visibility.value()
    }

    pub fn ring_rotate(&self) -> f64 {
        self.ring_rotate.value()
    }

    pub fn ring_scale(&self) -> f64 {
        self.ring_scale.value()
    }

    pub fn puck_lift(&self) -> f64 {
        self.puck_lift.value()
    }

    pub fn puck_rotate(&self) -> f64 {
        self.puck_rotate.value()
    }

    pub fn peg_lift(&self, peg: &Peg) -> f64 {
        peg.hover_lift * self.peg_lift.value()
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress.value()
    }

    pub fn progress_target(&self) -> f64 {
        self.progress.target()
    }
}

/// Drives a card's springs from the frame signal only while they are moving.
/// The loop stops itself on the first frame where nothing moved; pointer
/// input wakes it again.
pub struct CardAnimator {
    model: Rc<RefCell<HoverCardModel>>,
    scheduler: Rc<dyn FrameScheduler>,
    ticks: Option<TickHandle>,
}

impl CardAnimator {
    pub fn new(model: Rc<RefCell<HoverCardModel>>, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            model,
            scheduler,
            ticks: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticks
            .as_ref()
            .is_some_and(|ticks| !ticks.token().is_cancelled())
    }

    /// Starts the loop unless one is already running. `on_motion` runs after
    /// every frame that moved something.
    pub fn wake<F>(&mut self, on_motion: F)
    where
        F: Fn() + 'static,
    {
        if self.is_running() {
            return;
        }

        let model = self.model.clone();
        self.ticks = Some(start_ticks_while(self.scheduler.clone(), move |tick| {
            let moved = model.borrow_mut().step(tick.delta_seconds);
            if moved {
                on_motion();
            }
            moved
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::testing::ManualFrames;
    use std::cell::Cell;

    const FRAME: f64 = 1.0 / 60.0;
    const CARD: CardRect = CardRect {
        left: 100.0,
        top: 50.0,
        width: 320.0,
        height: 224.0,
    };

    fn settle(model: &mut HoverCardModel) {
        for _ in 0..360 {
            model.step(FRAME);
        }
    }

    fn center_of(rect: CardRect) -> Point {
        Point::new(rect.left + rect.width / 2.0, rect.top + rect.height / 2.0)
    }

    #[test]
    fn pointer_at_center_gives_zero_offset_and_tilt() {
        let offset = pointer_offset(center_of(CARD), CARD);

        assert_eq!(offset, Point::ORIGIN);
        assert_eq!(tilt_for(offset), Tilt { rotate_x: 0.0, rotate_y: 0.0 });
    }

    #[test]
    fn corner_gives_maximum_tilt_per_axis() {
        let top_left = pointer_offset(Point::new(CARD.left, CARD.top), CARD);
        let bottom_right = pointer_offset(
            Point::new(CARD.left + CARD.width, CARD.top + CARD.height),
            CARD,
        );

        assert_eq!(tilt_for(top_left), Tilt { rotate_x: 8.0, rotate_y: -8.0 });
        assert_eq!(tilt_for(bottom_right), Tilt { rotate_x: -8.0, rotate_y: 8.0 });
    }

    #[test]
    fn tilt_is_not_amplified_past_mapping_domain() {
        assert_eq!(tilt_for(Point::new(80.0, 0.0)).rotate_y, 8.0);
        assert_eq!(tilt_for(Point::new(500.0, 0.0)).rotate_y, 8.0);
        assert_eq!(tilt_for(Point::new(40.0, 0.0)).rotate_y, 4.0);
    }

    #[test]
    fn highlight_tracks_offset_inside_percent_space() {
        assert_eq!(highlight_center(Point::ORIGIN), Point::new(50.0, 50.0));
        assert_eq!(highlight_center(Point::new(-80.0, 80.0)), Point::new(20.0, 80.0));
        assert_eq!(highlight_center(Point::new(-400.0, 400.0)), Point::new(0.0, 100.0));
        assert!(highlight_gradient(Point::ORIGIN).contains("circle at 50.00% 50.00%"));
    }

    #[test]
    fn pegs_sit_on_ellipse_with_angle_dependent_lift() {
        let pegs = pegs();

        assert_eq!(pegs.len(), 6);
        assert_eq!(pegs[0].position, Point::new(130.0, 0.0));
        assert!((pegs[3].position.x + 130.0).abs() < 1e-9);
        for peg in &pegs {
            let normalized = (peg.position.x / 130.0).powi(2) + (peg.position.y / 85.0).powi(2);
            assert!((normalized - 1.0).abs() < 1e-9);
            assert!((peg.hover_lift - (peg.angle + FRAC_PI_4).sin() * 3.0).abs() < 1e-12);
        }
        assert_ne!(pegs[0].hover_lift, pegs[1].hover_lift);
    }

    #[test]
    fn leaving_resets_offset_and_tilt_regardless_of_position() {
        let mut model = HoverCardModel::default();
        model.pointer_enter();
        model.pointer_moved(Point::new(CARD.left + 3.0, CARD.top + 2.0), CARD);
        settle(&mut model);
        assert!(model.tilt().rotate_x > 0.0);

        model.pointer_leave();
        assert_eq!(model.offset(), Point::ORIGIN);
        settle(&mut model);

        assert_eq!(model.tilt(), Tilt { rotate_x: 0.0, rotate_y: 0.0 });
        assert_eq!(model.chase_position(), Point::ORIGIN);
        assert!(!model.hovered());
    }

    #[test]
    fn progress_bar_ends_on_last_hover_state() {
        let mut model = HoverCardModel::default();
        assert_eq!(model.progress_percent(), PROGRESS_REST_PERCENT);

        model.pointer_enter();
        model.pointer_leave();
        model.pointer_enter();
        settle(&mut model);
        assert_eq!(model.progress_percent(), PROGRESS_FULL_PERCENT);

        model.pointer_leave();
        model.step(FRAME);
        model.pointer_enter();
        model.pointer_leave();
        assert_eq!(model.progress_target(), PROGRESS_REST_PERCENT);
        settle(&mut model);
        assert_eq!(model.progress_percent(), PROGRESS_REST_PERCENT);
    }

    #[test]
    fn hover_decorations_settle_on_their_targets() {
        let mut model = HoverCardModel::default();
        let pegs = pegs();

        model.pointer_enter();
        settle(&mut model);

        assert_eq!(model.ring_rotate(), 20.0);
        assert_eq!(model.ring_scale(), 1.1);
        assert_eq!(model.puck_lift(), -6.0);
        assert_eq!(model.puck_rotate(), -6.0);
        assert_eq!(model.chase_visibility(), 1.0);
        assert_eq!(model.peg_lift(&pegs[2]), pegs[2].hover_lift);
        assert!(!model.step(FRAME));
    }

    #[test]
    fn chase_dot_follows_offset() {
        let mut model = HoverCardModel::default();
        model.pointer_enter();
        model.pointer_moved(center_of(CARD), CARD);
        model.pointer_moved(Point::new(center_of(CARD).x + 30.0, center_of(CARD).y - 12.0), CARD);

        model.step(FRAME);
        assert!(model.chase_position().x > 0.0 && model.chase_position().x < 30.0);

        settle(&mut model);
        assert_eq!(model.chase_position(), Point::new(30.0, -12.0));
    }

    fn animator_with_counter(
        model: &Rc<RefCell<HoverCardModel>>,
    ) -> (Rc<ManualFrames>, CardAnimator, Rc<Cell<u32>>) {
        let frames = Rc::new(ManualFrames::default());
        let animator = CardAnimator::new(model.clone(), frames.clone());
        (frames, animator, Rc::new(Cell::new(0)))
    }

    #[test]
    fn idle_card_loop_stops_after_one_frame() {
        let model = Rc::new(RefCell::new(HoverCardModel::default()));
        let (frames, mut animator, renders) = animator_with_counter(&model);

        let counter = renders.clone();
        animator.wake(move || counter.set(counter.get() + 1));
        for _ in 0..600 {
            frames.advance(16.0);
        }

        assert_eq!(renders.get(), 0);
        assert_eq!(frames.pending(), 0);
        assert!(!animator.is_running());
    }

    #[test]
    fn hovered_card_animates_until_settled_then_stops() {
        let model = Rc::new(RefCell::new(HoverCardModel::default()));
        let (frames, mut animator, renders) = animator_with_counter(&model);

        model.borrow_mut().pointer_enter();
        let counter = renders.clone();
        animator.wake(move || counter.set(counter.get() + 1));
        for _ in 0..600 {
            frames.advance(16.0);
        }

        assert!(renders.get() > 0);
        assert!(renders.get() < 600);
        assert_eq!(frames.pending(), 0);
        assert!(!animator.is_running());
        assert_eq!(model.borrow().progress_percent(), PROGRESS_FULL_PERCENT);
    }

    #[test]
    fn waking_a_running_loop_keeps_a_single_frame_pending() {
        let model = Rc::new(RefCell::new(HoverCardModel::default()));
        let (frames, mut animator, _renders) = animator_with_counter(&model);

        model.borrow_mut().pointer_enter();
        animator.wake(|| {});
        frames.advance(16.0);
        animator.wake(|| {});
        animator.wake(|| {});

        assert_eq!(frames.pending(), 1);
        assert!(animator.is_running());
    }

    #[test]
    fn pointer_input_after_rest_restarts_the_loop() {
        let model = Rc::new(RefCell::new(HoverCardModel::default()));
        let (frames, mut animator, renders) = animator_with_counter(&model);

        animator.wake(|| {});
        frames.advance(16.0);
        assert!(!animator.is_running());

        model.borrow_mut().pointer_moved(Point::new(420.0, 274.0), CARD);
        let counter = renders.clone();
        animator.wake(move || counter.set(counter.get() + 1));
        frames.advance(16.0);

        assert!(animator.is_running());
        assert_eq!(renders.get(), 1);
    }
}
