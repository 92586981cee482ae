//! Single-threaded cooperative event loop for the native deck.
//!
//! Mirrors the browser's model: a repeating interval for the countdown and
//! one-shot frame callbacks for the meter, each run to completion before the
//! next one is dispatched.

use deck_core::{Scheduler, TimerId};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Due {
    Tick,
    Frame,
}

#[derive(Debug)]
struct Interval {
    id: TimerId,
    period: Duration,
    due: Instant,
}

#[derive(Debug)]
pub struct TimerQueue {
    next_id: u32,
    frame_period: Duration,
    intervals: Vec<Interval>,
    frames: Vec<(TimerId, Instant)>,
}

impl TimerQueue {
    pub fn new(frame_period: Duration) -> Self {
        Self {
            next_id: 0,
            frame_period,
            intervals: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn next_id(&mut self) -> TimerId {
        self.next_id = self.next_id.wrapping_add(1);
        TimerId(self.next_id)
    }

    pub fn add_interval(&mut self, period: Duration, now: Instant) -> TimerId {
        let id = self.next_id();
        self.intervals.push(Interval {
            id,
            period,
            due: now + period,
        });
        id
    }

    pub fn add_frame(&mut self, now: Instant) -> TimerId {
        let id = self.next_id();
        self.frames.push((id, now + self.frame_period));
        id
    }

    pub fn cancel_interval(&mut self, id: TimerId) {
        self.intervals.retain(|i| i.id != id);
    }

    pub fn cancel_frame(&mut self, id: TimerId) {
        self.frames.retain(|(f, _)| *f != id);
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty() && self.frames.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let intervals = self.intervals.iter().map(|i| i.due);
        let frames = self.frames.iter().map(|(_, at)| *at);
        intervals.chain(frames).min()
    }

    /// Take the earliest callback due at `now`. Intervals re-arm one period
    /// after their previous deadline; frames are consumed.
    pub fn pop_due(&mut self, now: Instant) -> Option<Due> {
        let interval = self
            .intervals
            .iter()
            .enumerate()
            .min_by_key(|(_, i)| i.due)
            .map(|(idx, i)| (idx, i.due));
        let frame = self
            .frames
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, at))| *at)
            .map(|(idx, (_, at))| (idx, *at));

        match (interval, frame) {
            (Some((idx, at)), f) if at <= now && f.map_or(true, |(_, fat)| at <= fat) => {
                let i = &mut self.intervals[idx];
                i.due += i.period;
                Some(Due::Tick)
            }
            (_, Some((idx, at))) if at <= now => {
                self.frames.remove(idx);
                Some(Due::Frame)
            }
            _ => None,
        }
    }
}

/// `Scheduler` handle sharing a queue with the loop that drains it.
#[derive(Clone, Debug)]
pub struct LoopScheduler {
    queue: Rc<RefCell<TimerQueue>>,
}

impl LoopScheduler {
    pub fn new(queue: Rc<RefCell<TimerQueue>>) -> Self {
        Self { queue }
    }
}

impl Scheduler for LoopScheduler {
    fn start_interval(&mut self, period: Duration) -> deck_core::Result<TimerId> {
        Ok(self.queue.borrow_mut().add_interval(period, Instant::now()))
    }

    fn cancel_interval(&mut self, id: TimerId) {
        self.queue.borrow_mut().cancel_interval(id);
    }

    fn request_frame(&mut self) -> deck_core::Result<TimerId> {
        Ok(self.queue.borrow_mut().add_frame(Instant::now()))
    }

    fn cancel_frame(&mut self, id: TimerId) {
        self.queue.borrow_mut().cancel_frame(id);
    }
}
