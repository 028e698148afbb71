//! Controller: owns every cursor and scheduler for one playthrough
//!
//! `set_beatmap` only records the source; `init_cursors` snapshots its objects,
//! distributes them and builds one (cursor, scheduler) pair per cursor.
//! Calling `set_beatmap` + `init_cursors` again discards the previous session.

use std::rc::Rc;

use super::cursor::Cursor;
use super::distributor::{DistributorOptions, distribute};
use super::movers::{Mover, MoverKind};
use super::scheduler::Scheduler;
use super::spinners::SpinKind;
use crate::beatmap::ObjectSource;
use crate::error::{DanceError, Result};
use crate::settings::DanceSettings;

pub struct Controller {
    settings: DanceSettings,
    beatmap: Option<Rc<dyn ObjectSource>>,
    cursors: Vec<Cursor>,
    schedulers: Vec<Scheduler>,
}

impl Controller {
    pub fn new(settings: DanceSettings) -> Self {
        Self {
            settings,
            beatmap: None,
            cursors: Vec::new(),
            schedulers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &DanceSettings {
        &self.settings
    }

    /// Record the object source for the next `init_cursors`
    pub fn set_beatmap(&mut self, beatmap: Rc<dyn ObjectSource>) {
        self.beatmap = Some(beatmap);
    }

    /// Build cursors and schedulers from the current beatmap
    pub fn init_cursors(&mut self) -> Result<()> {
        let beatmap = self.beatmap.as_ref().ok_or(DanceError::BeatmapNotSet)?;
        self.settings.validate()?;

        let n = self.settings.tag;
        let objects = beatmap.objects_copy();
        let object_count = objects.len();

        let options = DistributorOptions {
            cursors: n,
            spins_together: self.settings.spinners_together,
            dense_holds: self.settings.dense_preprocessing(),
            fragment_interval: self.settings.slider_fragment_interval,
        };
        let queues = distribute(objects, &options);

        let mut cursors = Vec::with_capacity(n);
        let mut schedulers = Vec::with_capacity(n);
        for (i, queue) in queues.into_iter().enumerate() {
            let mover_kind = MoverKind::resolve(self.settings.mover_name(i));
            let spin_kind = SpinKind::resolve(self.settings.spinner_name(i));
            log::debug!(
                "Cursor {}: {} objects, mover {}, spinner {}",
                i,
                queue.len(),
                mover_kind.as_str(),
                spin_kind.as_str()
            );

            let mut scheduler = Scheduler::new(Mover::new(mover_kind, self.settings.mover.clone()));
            scheduler.init(queue, spin_kind, self.settings.spinner.clone());

            let mut cursor = Cursor::new(self.settings.trail.clone());
            cursor.position = scheduler.position();
            cursor.last_position = cursor.position;

            cursors.push(cursor);
            schedulers.push(scheduler);
        }

        log::info!(
            "Initialized {} cursor(s) over {} objects (dense holds: {}, spins together: {})",
            n,
            object_count,
            options.dense_holds,
            options.spins_together
        );

        self.cursors = cursors;
        self.schedulers = schedulers;
        Ok(())
    }

    /// Advance every scheduler to `time`, then animate cursors by `delta`
    ///
    /// All schedulers see the same `time`. Schedulers go first so each cursor
    /// animates toward a fresh target.
    pub fn update(&mut self, time: f64, delta: f64) {
        for (scheduler, cursor) in self.schedulers.iter_mut().zip(self.cursors.iter_mut()) {
            scheduler.update(time, cursor);
        }
        for cursor in &mut self.cursors {
            cursor.update(delta);
        }
    }

    /// Live cursors for the renderer
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    pub fn schedulers(&self) -> &[Scheduler] {
        &self.schedulers
    }
}
