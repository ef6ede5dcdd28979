//! Replay of search traces as a cancellable, tick-based schedule.
//!
//! [`plan`] turns a visitation trace and an optional path into a strictly
//! increasing list of `(tick, AnimEvent)` pairs: one `Touched` per visited
//! cell, then one `Path` per path cell before the target, then a single
//! `Finished`. [`Scheduler`] holds at most one such plan in flight and
//! delivers its events to an [`AnimationHandler`] as the clock advances.

use log::debug;

use pathviz_core::{Context, Pos};

use crate::queue::EventQueue;

/// One state transition of the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimEvent {
    Touched(Pos),
    Path(Pos),
    /// Last event of every uncancelled schedule. `found` is false when the
    /// target was unreachable.
    Finished { found: bool },
}

/// Spacing between events, in ticks. Both steps are at least one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    pub touch_step: u64,
    pub path_step: u64,
}

impl Timing {
    pub fn new(touch_step: u64, path_step: u64) -> Self {
        Self {
            touch_step: touch_step.max(1),
            path_step: path_step.max(1),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(1, 3)
    }
}

/// Receives replayed events in order.
pub trait AnimationHandler {
    fn on_touched(&mut self, pos: Pos);
    fn on_path(&mut self, pos: Pos);
    fn on_finished(&mut self, found: bool);

    /// Route one event to the matching callback.
    fn dispatch(&mut self, event: AnimEvent) {
        match event {
            AnimEvent::Touched(p) => self.on_touched(p),
            AnimEvent::Path(p) => self.on_path(p),
            AnimEvent::Finished { found } => self.on_finished(found),
        }
    }
}

/// Adapts three closures into an [`AnimationHandler`].
pub struct Callbacks<T, P, F> {
    pub on_touched: T,
    pub on_path: P,
    pub on_finished: F,
}

impl<T, P, F> AnimationHandler for Callbacks<T, P, F>
where
    T: FnMut(Pos),
    P: FnMut(Pos),
    F: FnMut(bool),
{
    fn on_touched(&mut self, pos: Pos) {
        (self.on_touched)(pos)
    }

    fn on_path(&mut self, pos: Pos) {
        (self.on_path)(pos)
    }

    fn on_finished(&mut self, found: bool) {
        (self.on_finished)(found)
    }
}

/// Handle to one scheduled replay.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    id: u64,
    ctx: Context,
}

impl CancelHandle {
    /// Drop every event of this replay that has not been delivered yet.
    /// No `Finished` event follows a cancellation.
    pub fn cancel(&self) {
        self.ctx.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.ctx.is_done()
    }

    /// Identifier of the replay, unique per [`Scheduler`].
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Build the event list for a replay starting after tick `origin`.
///
/// The target (the last path cell) gets no `Path` event; reaching it is what
/// `Finished` reports. Ticks saturate at `u64::MAX`; events that collide there
/// keep their list order.
pub fn plan(visited: &[Pos], path: Option<&[Pos]>, timing: Timing, origin: u64) -> Vec<(u64, AnimEvent)> {
    let mut out = Vec::with_capacity(visited.len() + path.map_or(0, <[Pos]>::len) + 1);
    let mut tick = origin;
    for &p in visited {
        tick = tick.saturating_add(timing.touch_step);
        out.push((tick, AnimEvent::Touched(p)));
    }
    match path {
        Some(path) => {
            let before_target = &path[..path.len().saturating_sub(1)];
            for &p in before_target {
                tick = tick.saturating_add(timing.path_step);
                out.push((tick, AnimEvent::Path(p)));
            }
            tick = tick.saturating_add(timing.path_step);
            out.push((tick, AnimEvent::Finished { found: true }));
        }
        None => {
            tick = tick.saturating_add(1);
            out.push((tick, AnimEvent::Finished { found: false }));
        }
    }
    out
}

#[derive(Debug)]
struct Scheduled {
    id: u64,
    event: AnimEvent,
}

/// Delivers at most one replay at a time.
///
/// Scheduling a new replay cancels the one in flight first, so two replays
/// never interleave. Time only moves through [`advance`](Scheduler::advance)
/// and restarts from zero with every new replay.
pub struct Scheduler {
    queue: EventQueue<Scheduled>,
    timing: Timing,
    now: u64,
    next_id: u64,
    last_tick_seen: u64,
    active: Option<CancelHandle>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}

impl Scheduler {
    pub fn new(timing: Timing) -> Self {
        Self {
            queue: EventQueue::new(),
            timing,
            now: 0,
            next_id: 0,
            last_tick_seen: 0,
            active: None,
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Ticks elapsed since the current replay was scheduled.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Whether a replay is still delivering events.
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    /// Number of undelivered events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue a replay of `visited` and `path`, cancelling any replay still in
    /// flight.
    pub fn schedule(&mut self, visited: &[Pos], path: Option<&[Pos]>) -> CancelHandle {
        self.cancel();
        self.now = 0;
        self.last_tick_seen = 0;

        let id = self.next_id;
        self.next_id += 1;
        let events = plan(visited, path, self.timing, self.now);
        debug!(
            "replay {id}: {} event(s) over {} tick(s)",
            events.len(),
            events.last().map_or(0, |(t, _)| t - self.now)
        );
        for (tick, event) in events {
            self.queue.push(Scheduled { id, event }, tick);
        }

        let handle = CancelHandle {
            id,
            ctx: Context::new(),
        };
        self.active = Some(handle.clone());
        handle
    }

    /// Cancel the replay in flight, if any, and discard its events.
    pub fn cancel(&mut self) {
        if let Some(h) = self.active.take() {
            if !self.queue.is_empty() {
                debug!("replay {} cancelled with {} event(s) left", h.id, self.queue.len());
            }
            h.cancel();
        }
        self.queue.clear();
    }

    /// Move the clock forward by `ticks` and deliver every event that falls
    /// due, in order. Returns how many events were delivered.
    pub fn advance(&mut self, ticks: u64, handler: &mut impl AnimationHandler) -> usize {
        self.now = self.now.saturating_add(ticks);
        self.deliver(Some(self.now), handler)
    }

    /// Deliver every remaining event immediately, skipping the animation.
    pub fn finish_now(&mut self, handler: &mut impl AnimationHandler) -> usize {
        let delivered = self.deliver(None, handler);
        self.now = self.now.max(self.last_tick_seen);
        delivered
    }

    fn deliver(&mut self, until: Option<u64>, handler: &mut impl AnimationHandler) -> usize {
        if self.active.as_ref().is_none_or(CancelHandle::is_cancelled) {
            self.cancel();
            return 0;
        }
        let mut delivered = 0;
        loop {
            let next = match until {
                Some(now) => self.queue.pop_due(now),
                None => self.queue.pop(),
            };
            let Some((Scheduled { id, event }, tick)) = next else {
                break;
            };
            self.last_tick_seen = tick;
            debug_assert_eq!(Some(id), self.active.as_ref().map(CancelHandle::id));
            handler.dispatch(event);
            delivered += 1;
            if let AnimEvent::Finished { found } = event {
                debug!("replay {id} finished, found = {found}");
                self.active = None;
                break;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Pos {
        Pos::new(row, col)
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<AnimEvent>,
    }

    impl AnimationHandler for Recorder {
        fn on_touched(&mut self, pos: Pos) {
            self.events.push(AnimEvent::Touched(pos));
        }
        fn on_path(&mut self, pos: Pos) {
            self.events.push(AnimEvent::Path(pos));
        }
        fn on_finished(&mut self, found: bool) {
            self.events.push(AnimEvent::Finished { found });
        }
    }

    #[test]
    fn plan_with_path() {
        let visited = [p(0, 1), p(1, 0)];
        let path = [p(0, 0), p(0, 1), p(0, 2)];
        let plan = plan(&visited, Some(&path), Timing::new(1, 2), 10);
        assert_eq!(
            plan,
            vec![
                (11, AnimEvent::Touched(p(0, 1))),
                (12, AnimEvent::Touched(p(1, 0))),
                (14, AnimEvent::Path(p(0, 0))),
                (16, AnimEvent::Path(p(0, 1))),
                (18, AnimEvent::Finished { found: true }),
            ]
        );
    }

    #[test]
    fn plan_without_path_finishes_right_after_touches() {
        let plan = plan(&[p(0, 1)], None, Timing::new(4, 4), 0);
        assert_eq!(
            plan,
            vec![
                (4, AnimEvent::Touched(p(0, 1))),
                (5, AnimEvent::Finished { found: false }),
            ]
        );
    }

    #[test]
    fn plan_ticks_strictly_increase() {
        let visited: Vec<Pos> = (0..20).map(|c| p(0, c)).collect();
        let path: Vec<Pos> = (0..6).map(|r| p(r, 0)).collect();
        let plan = plan(&visited, Some(&path), Timing::new(0, 0), 0);
        assert!(plan.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(
            plan.iter()
                .filter(|(_, e)| matches!(e, AnimEvent::Finished { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn advance_delivers_in_order() {
        let mut s = Scheduler::new(Timing::new(1, 1));
        let mut rec = Recorder::default();
        s.schedule(&[p(1, 0)], Some(&[p(0, 0), p(0, 1)]));
        assert!(s.is_active());
        assert_eq!(s.advance(0, &mut rec), 0);
        assert_eq!(s.advance(1, &mut rec), 1);
        assert_eq!(s.advance(10, &mut rec), 2);
        assert_eq!(
            rec.events,
            vec![
                AnimEvent::Touched(p(1, 0)),
                AnimEvent::Path(p(0, 0)),
                AnimEvent::Finished { found: true },
            ]
        );
        assert!(!s.is_active());
        assert_eq!(s.advance(10, &mut rec), 0);
    }

    #[test]
    fn new_schedule_cancels_previous() {
        let mut s = Scheduler::new(Timing::new(1, 1));
        let mut rec = Recorder::default();
        let first = s.schedule(&[p(0, 1), p(0, 2), p(0, 3)], None);
        s.advance(1, &mut rec);
        let second = s.schedule(&[p(5, 5)], None);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_ne!(first.id(), second.id());
        s.advance(100, &mut rec);
        assert_eq!(
            rec.events,
            vec![
                AnimEvent::Touched(p(0, 1)),
                AnimEvent::Touched(p(5, 5)),
                AnimEvent::Finished { found: false },
            ]
        );
    }

    #[test]
    fn cancelled_handle_stops_delivery() {
        let mut s = Scheduler::default();
        let mut rec = Recorder::default();
        let h = s.schedule(&[p(0, 1), p(0, 2)], None);
        s.advance(1, &mut rec);
        h.cancel();
        assert!(!s.is_active());
        assert_eq!(s.advance(100, &mut rec), 0);
        assert_eq!(rec.events, vec![AnimEvent::Touched(p(0, 1))]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn finish_now_flushes_everything() {
        let mut s = Scheduler::new(Timing::new(5, 5));
        let mut rec = Recorder::default();
        s.schedule(&[p(0, 1)], Some(&[p(0, 0), p(0, 2)]));
        assert_eq!(s.finish_now(&mut rec), 3);
        assert!(!s.is_active());
        assert_eq!(s.now(), 15);
    }

    #[test]
    fn closures_as_handler() {
        let mut touched = Vec::new();
        let mut path = Vec::new();
        let mut finished = 0;
        {
            let mut handler = Callbacks {
                on_touched: |q: Pos| touched.push(q),
                on_path: |q: Pos| path.push(q),
                on_finished: |_: bool| finished += 1,
            };
            let mut s = Scheduler::default();
            s.schedule(&[p(2, 2)], Some(&[p(1, 1), p(1, 2)]));
            s.advance(1_000, &mut handler);
        }
        assert_eq!(touched, vec![p(2, 2)]);
        assert_eq!(path, vec![p(1, 1)]);
        assert_eq!(finished, 1);
    }

    #[test]
    fn schedule_after_saturated_clock() {
        let mut s = Scheduler::new(Timing::new(1, 1));
        let mut rec = Recorder::default();
        s.schedule(&[p(0, 1)], None);
        s.advance(u64::MAX, &mut rec);
        assert_eq!(s.now(), u64::MAX);

        rec.events.clear();
        s.schedule(&[p(0, 1)], None);
        assert_eq!(s.now(), 0);
        s.advance(u64::MAX, &mut rec);
        assert_eq!(
            rec.events,
            vec![
                AnimEvent::Touched(p(0, 1)),
                AnimEvent::Finished { found: false },
            ]
        );
    }

    #[test]
    fn plan_saturates_huge_steps() {
        let plan = plan(
            &[p(0, 1), p(0, 2)],
            Some(&[p(0, 0), p(0, 3)]),
            Timing::new(u64::MAX, u64::MAX),
            0,
        );
        assert_eq!(plan.len(), 4);
        assert!(plan.iter().all(|(t, _)| *t == u64::MAX));
        assert_eq!(plan[3].1, AnimEvent::Finished { found: true });

        let mut s = Scheduler::new(Timing::new(u64::MAX, u64::MAX));
        let mut rec = Recorder::default();
        s.schedule(&[p(0, 1), p(0, 2)], Some(&[p(0, 0), p(0, 3)]));
        assert_eq!(s.advance(u64::MAX, &mut rec), 4);
        assert_eq!(rec.events.last(), Some(&AnimEvent::Finished { found: true }));
        assert_eq!(rec.events[0], AnimEvent::Touched(p(0, 1)));
    }
}
