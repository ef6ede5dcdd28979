//! **pathviz-anim**: turns a finished search into a timed replay.
//!
//! A search produces its whole trace at once; this crate spreads that trace
//! over clock ticks so a front end can show it cell by cell. See
//! [`Scheduler`] for the entry point.

mod queue;
mod schedule;

pub use queue::EventQueue;
pub use schedule::{
    AnimEvent, AnimationHandler, Callbacks, CancelHandle, Scheduler, Timing, plan,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::{Grid, Pos};

    #[derive(Default)]
    struct Log(Vec<AnimEvent>);

    impl AnimationHandler for Log {
        fn on_touched(&mut self, pos: Pos) {
            self.0.push(AnimEvent::Touched(pos));
        }
        fn on_path(&mut self, pos: Pos) {
            self.0.push(AnimEvent::Path(pos));
        }
        fn on_finished(&mut self, found: bool) {
            self.0.push(AnimEvent::Finished { found });
        }
    }

    #[test]
    fn replays_a_search() {
        let grid = Grid::from_ascii(
            "
            S..
            .#.
            ..T
            ",
        )
        .unwrap();
        let result = pathviz_paths::run(&grid, grid.start()).unwrap();
        let mut s = Scheduler::default();
        let mut log = Log::default();
        s.schedule(&result.visited, result.path.as_deref());
        s.finish_now(&mut log);

        let touched = log
            .0
            .iter()
            .filter(|e| matches!(e, AnimEvent::Touched(_)))
            .count();
        assert_eq!(touched, result.visited.len());
        let path: Vec<Pos> = log
            .0
            .iter()
            .filter_map(|e| match e {
                AnimEvent::Path(p) => Some(*p),
                _ => None,
            })
            .collect();
        let full = result.path.unwrap();
        assert_eq!(path, full[..full.len() - 1]);
        assert_eq!(log.0.last(), Some(&AnimEvent::Finished { found: true }));
    }

    #[test]
    fn walled_target_only_touches() {
        let grid = Grid::from_ascii(
            "
            S....
            .....
            ...#.
            ..#T#
            ...#.
            ",
        )
        .unwrap();
        let result = pathviz_paths::run(&grid, grid.start()).unwrap();
        assert!(!result.found());
        let mut s = Scheduler::new(Timing::new(1, 1));
        let mut log = Log::default();
        s.schedule(&result.visited, None);
        s.advance(u64::MAX, &mut log);
        let (last, rest) = log.0.split_last().unwrap();
        assert_eq!(*last, AnimEvent::Finished { found: false });
        assert!(rest.iter().all(|e| matches!(e, AnimEvent::Touched(_))));
        assert_eq!(rest.len(), result.visited.len());
    }
}
