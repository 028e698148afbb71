//! Per-cursor scheduler
//!
//! Owns one cursor's object queue and walks it as time advances:
//! - before the first object the cursor waits on it (`Idle`)
//! - between objects the mover's transition drives it (`Transitioning`)
//! - during a hold it follows the hold path (`Holding`)
//! - during a spin zone the bound spin drives it (`Spinning`)
//! - after the last object it rests where that object ended (`Idle`)
//!
//! Time passed to [`Scheduler::update`] must never decrease.

use std::rc::Rc;

use glam::Vec2;

use super::cursor::CursorSink;
use super::movers::{Mover, Transition, Waypoint};
use super::spinners::{Spin, SpinKind};
use crate::beatmap::{HitObject, ObjectKind};
use crate::settings::SpinnerSettings;

/// What the scheduler is doing at the last update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Transitioning,
    Holding,
    Spinning,
}

/// The one strategy instance live at a time
#[derive(Debug, Clone)]
enum Active {
    None,
    /// Path into the object at `index`
    Transition { index: usize, transition: Transition },
    /// Spin for the zone at `index`
    Spin { index: usize, spin: Spin },
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    mover: Mover,
    spin_kind: SpinKind,
    spin_settings: SpinnerSettings,
    queue: Vec<Rc<HitObject>>,
    /// Next object not yet fully passed
    index: usize,
    /// Highest index whose incoming transition has been fed to the mover
    moved_until: usize,
    active: Active,
    state: SchedulerState,
    position: Vec2,
    last_time: f64,
}

impl Scheduler {
    pub fn new(mover: Mover) -> Self {
        Self {
            mover,
            spin_kind: SpinKind::default(),
            spin_settings: SpinnerSettings::default(),
            queue: Vec::new(),
            index: 0,
            moved_until: 0,
            active: Active::None,
            state: SchedulerState::Idle,
            position: Vec2::ZERO,
            last_time: f64::NEG_INFINITY,
        }
    }

    /// Bind a queue and spin strategy, resetting progress
    pub fn init(&mut self, queue: Vec<Rc<HitObject>>, spin_kind: SpinKind, spin_settings: SpinnerSettings) {
        debug_assert!(
            queue.windows(2).all(|w| w[0].start_time <= w[1].start_time),
            "scheduler queue must be time-ordered"
        );
        self.queue = queue;
        self.spin_kind = spin_kind;
        self.spin_settings = spin_settings;
        self.index = 0;
        self.moved_until = 0;
        self.active = Active::None;
        self.state = SchedulerState::Idle;
        self.last_time = f64::NEG_INFINITY;
        self.mover.reset();
        self.position = match self.queue.first() {
            Some(_) => self.entry(0).pos,
            None => Vec2::ZERO,
        };
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn queue(&self) -> &[Rc<HitObject>] {
        &self.queue
    }

    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    pub fn spin_kind(&self) -> SpinKind {
        self.spin_kind
    }

    /// Recompute the position for `time` and write it to `sink`
    pub fn update(&mut self, time: f64, sink: &mut impl CursorSink) -> Vec2 {
        debug_assert!(
            time >= self.last_time,
            "scheduler time went backwards: {} -> {}",
            self.last_time,
            time
        );
        self.last_time = time;

        while self.index < self.queue.len() && self.queue[self.index].end_time <= time {
            self.index += 1;
        }

        let position = if self.queue.is_empty() {
            self.active = Active::None;
            self.state = SchedulerState::Idle;
            Vec2::ZERO
        } else if self.index >= self.queue.len() {
            self.active = Active::None;
            self.state = SchedulerState::Idle;
            self.exit(self.queue.len() - 1).pos
        } else if self.queue[self.index].start_time > time {
            if self.index == 0 {
                self.active = Active::None;
                self.state = SchedulerState::Idle;
                self.entry(0).pos
            } else {
                self.state = SchedulerState::Transitioning;
                self.transition_position(self.index, time)
            }
        } else {
            let obj = Rc::clone(&self.queue[self.index]);
            match &obj.kind {
                ObjectKind::SpinZone { .. } => {
                    self.state = SchedulerState::Spinning;
                    self.spin_position(self.index, time)
                }
                ObjectKind::Hold { .. } | ObjectKind::Point { .. } => {
                    self.active = Active::None;
                    self.state = SchedulerState::Holding;
                    obj.position_at(time)
                }
            }
        };

        self.position = position;
        sink.set_pos(position);
        position
    }

    fn bind_spin(&self, index: usize) -> Spin {
        self.spin_kind.bind(&self.queue[index], &self.spin_settings)
    }

    /// Entry waypoint of the object at `index`
    fn entry(&self, index: usize) -> Waypoint {
        let obj = &self.queue[index];
        if obj.is_spin_zone() {
            self.bind_spin(index).entry()
        } else {
            Waypoint::entry(obj)
        }
    }

    /// Exit waypoint of the object at `index`
    fn exit(&self, index: usize) -> Waypoint {
        let obj = &self.queue[index];
        if obj.is_spin_zone() {
            self.bind_spin(index).exit()
        } else {
            Waypoint::exit(obj)
        }
    }

    /// Position at `time` on the transition from object `index - 1` into `index`
    ///
    /// Every skipped pair is still fed to the mover in order, so the mover's
    /// memory does not depend on how coarse the updates were.
    fn transition_position(&mut self, index: usize, time: f64) -> Vec2 {
        if let Active::Transition { index: i, transition } = &self.active {
            if *i == index {
                return transition.position_at(time);
            }
        }

        let mut built = None;
        for k in (self.moved_until + 1).max(1)..=index {
            let (from, to) = (self.exit(k - 1), self.entry(k));
            built = Some(self.mover.transition(from, to));
        }
        self.moved_until = self.moved_until.max(index);
        // Already fed (only possible after re-entering the same index)
        let transition = built.unwrap_or_else(|| {
            let (from, to) = (self.exit(index - 1), self.entry(index));
            self.mover.clone().transition(from, to)
        });
        let position = transition.position_at(time);
        self.active = Active::Transition { index, transition };
        position
    }

    /// Position at `time` inside the spin zone at `index`
    fn spin_position(&mut self, index: usize, time: f64) -> Vec2 {
        if let Active::Spin { index: i, spin } = &self.active {
            if *i == index {
                return spin.position_at(time);
            }
        }

        let spin = self.bind_spin(index);
        log::trace!("Spinning on object {} with {}", self.queue[index].id, self.spin_kind.as_str());
        let position = spin.position_at(time);
        self.active = Active::Spin { index, spin };
        position
    }
}
