use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

const FIRST_FRAME_SECONDS: f64 = 1.0 / 60.0;
const MAX_FRAME_SECONDS: f64 = 1.0 / 20.0;

/// Source of display refresh callbacks.
///
/// At most one frame is pending at a time; `cancel_pending` drops it without
/// running it.
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);
    fn cancel_pending(&self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub index: u64,
    pub timestamp_ms: f64,
    pub delta_seconds: f64,
}

#[derive(Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Owns a running tick loop. Dropping the handle cancels the loop.
pub struct TickHandle {
    token: CancelToken,
    scheduler: Rc<dyn FrameScheduler>,
}

impl TickHandle {
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        if self.token.is_cancelled() {
            return;
        }

        self.token.cancel();
        self.scheduler.cancel_pending();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct TickLoop<F> {
    scheduler: Rc<dyn FrameScheduler>,
    token: CancelToken,
    on_tick: F,
    last_timestamp_ms: Option<f64>,
    next_index: u64,
}

/// Runs `on_tick` once per frame until the returned handle is cancelled or dropped.
pub fn start_ticks<F>(scheduler: Rc<dyn FrameScheduler>, mut on_tick: F) -> TickHandle
where
    F: FnMut(Tick) + 'static,
{
    start_ticks_while(scheduler, move |tick| {
        on_tick(tick);
        true
    })
}

/// Like [`start_ticks`], but the loop also stops on its own the first time
/// `on_tick` returns `false`.
pub fn start_ticks_while<F>(scheduler: Rc<dyn FrameScheduler>, on_tick: F) -> TickHandle
where
    F: FnMut(Tick) -> bool + 'static,
{
    let token = CancelToken::default();
    let tick_loop = Rc::new(RefCell::new(TickLoop {
        scheduler: scheduler.clone(),
        token: token.clone(),
        on_tick,
        last_timestamp_ms: None,
        next_index: 0,
    }));

    schedule_next(tick_loop);

    TickHandle { token, scheduler }
}

fn schedule_next<F>(tick_loop: Rc<RefCell<TickLoop<F>>>)
where
    F: FnMut(Tick) -> bool + 'static,
{
    let scheduler = tick_loop.borrow().scheduler.clone();
    scheduler.request_frame(Box::new(move |timestamp_ms| {
        run_frame(tick_loop, timestamp_ms);
    }));
}

fn run_frame<F>(tick_loop: Rc<RefCell<TickLoop<F>>>, timestamp_ms: f64)
where
    F: FnMut(Tick) -> bool + 'static,
{
    {
        let state = &mut *tick_loop.borrow_mut();
        if state.token.is_cancelled() {
            return;
        }

        let delta_seconds = match state.last_timestamp_ms {
            Some(previous) => ((timestamp_ms - previous) / 1000.0).clamp(0.0, MAX_FRAME_SECONDS),
            None => FIRST_FRAME_SECONDS,
        };
        state.last_timestamp_ms = Some(timestamp_ms);

        let tick = Tick {
            index: state.next_index,
            timestamp_ms,
            delta_seconds,
        };
        state.next_index += 1;
        if !(state.on_tick)(tick) {
            state.token.cancel();
        }

        if state.token.is_cancelled() {
            return;
        }
    }

    schedule_next(tick_loop);
}


#[cfg(test)]
mod tests {
    use super::{testing::ManualFrames, *};

    fn recording_loop(frames: &Rc<ManualFrames>) -> (TickHandle, Rc<RefCell<Vec<Tick>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let handle = start_ticks(frames.clone(), move |tick| sink.borrow_mut().push(tick));
        (handle, seen)
    }

    #[test]
    fn loop_reschedules_itself_every_frame() {
        let frames = Rc::new(ManualFrames::default());
        let (_handle, seen) = recording_loop(&frames);

        for _ in 0..5 {
            frames.advance(16.0);
        }

        let indexes: Vec<u64> = seen.borrow().iter().map(|tick| tick.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn delta_comes_from_frame_timestamps() {
        let frames = Rc::new(ManualFrames::default());
        let (_handle, seen) = recording_loop(&frames);

        frames.advance(16.0);
        frames.advance(20.0);
        frames.advance(5_000.0);

        let deltas: Vec<f64> = seen.borrow().iter().map(|tick| tick.delta_seconds).collect();
        assert_eq!(deltas[0], FIRST_FRAME_SECONDS);
        assert!((deltas[1] - 0.020).abs() < 1e-9);
        assert_eq!(deltas[2], MAX_FRAME_SECONDS);
    }

    #[test]
    fn cancel_releases_pending_frame_and_stops_ticks() {
        let frames = Rc::new(ManualFrames::default());
        let (handle, seen) = recording_loop(&frames);

        frames.advance(16.0);
        handle.cancel();
        assert_eq!(frames.pending(), 0);

        frames.advance(16.0);
        frames.advance(16.0);
        assert_eq!(seen.borrow().len(), 1);
        assert!(handle.token().is_cancelled());
    }

    #[test]
    fn dropping_handle_cancels_loop() {
        let frames = Rc::new(ManualFrames::default());
        let (handle, seen) = recording_loop(&frames);

        drop(handle);
        frames.advance(16.0);

        assert!(seen.borrow().is_empty());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn token_cancelled_during_tick_prevents_rescheduling() {
        let frames = Rc::new(ManualFrames::default());
        let slot: Rc<RefCell<Option<CancelToken>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));

        let handle = {
            let slot = slot.clone();
            let count = count.clone();
            start_ticks(frames.clone(), move |_| {
                count.set(count.get() + 1);
                if let Some(token) = slot.borrow().as_ref() {
                    token.cancel();
                }
            })
        };
        *slot.borrow_mut() = Some(handle.token());

        frames.advance(16.0);
        frames.advance(16.0);

        assert_eq!(count.get(), 1);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn loop_stops_itself_when_callback_reports_idle() {
        let frames = Rc::new(ManualFrames::default());
        let count = Rc::new(Cell::new(0));

        let handle = {
            let count = count.clone();
            start_ticks_while(frames.clone(), move |_| {
                count.set(count.get() + 1);
                count.get() < 3
            })
        };

        for _ in 0..10 {
            frames.advance(16.0);
        }

        assert_eq!(count.get(), 3);
        assert_eq!(frames.pending(), 0);
        assert!(handle.token().is_cancelled());
    }
}
