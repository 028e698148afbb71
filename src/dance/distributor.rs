//! Object distribution across cooperating cursors (tag play)
//!
//! Objects are dealt round robin by their position in the sequence. Spin
//! zones can instead go to every cursor so all of them spin together. With
//! dense preprocessing, holds are first broken into point fragments so the
//! round robin spreads a long hold over several cursors.
//!
//! Ties in start time keep their input order; the beatmap is expected to
//! deliver simultaneous objects in a stable order.

use std::rc::Rc;

use crate::beatmap::HitObject;

/// Options for [`distribute`]
#[derive(Debug, Clone, PartialEq)]
pub struct DistributorOptions {
    /// Number of cursors (N >= 1)
    pub cursors: usize,
    /// Copy spin zones into every queue
    pub spins_together: bool,
    /// Fragment holds before dealing (only applied when N > 1)
    pub dense_holds: bool,
    /// Milliseconds between hold fragments
    pub fragment_interval: f64,
}

impl Default for DistributorOptions {
    fn default() -> Self {
        Self {
            cursors: 1,
            spins_together: true,
            dense_holds: false,
            fragment_interval: 50.0,
        }
    }
}

/// Replace every hold by point fragments, keeping time order
///
/// Applying this twice gives the same result as applying it once, and the
/// first start and last end of the sequence are unchanged.
pub fn preprocess_dense(objects: Vec<Rc<HitObject>>, interval: f64) -> Vec<Rc<HitObject>> {
    let mut out = Vec::with_capacity(objects.len());
    let mut fragmented = 0usize;
    for obj in objects {
        if obj.is_hold() {
            fragmented += 1;
            out.extend(obj.fragment(interval).into_iter().map(Rc::new));
        } else {
            out.push(obj);
        }
    }
    // Stable: fragments of one hold never swap with each other or with ties
    out.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    if fragmented > 0 {
        log::debug!("Fragmented {} holds into {} objects", fragmented, out.len());
    }
    out
}

/// Split `objects` into one time-ordered queue per cursor
pub fn distribute(objects: Vec<Rc<HitObject>>, options: &DistributorOptions) -> Vec<Vec<Rc<HitObject>>> {
    let n = options.cursors.max(1);
    let objects = if options.dense_holds && n > 1 {
        preprocess_dense(objects, options.fragment_interval)
    } else {
        objects
    };

    let mut queues: Vec<Vec<Rc<HitObject>>> = vec![Vec::new(); n];
    for (i, obj) in objects.into_iter().enumerate() {
        if obj.is_spin_zone() && options.spins_together {
            for queue in &mut queues {
                queue.push(Rc::clone(&obj));
            }
        } else {
            queues[i % n].push(obj);
        }
    }
    queues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::HoldPath;
    use glam::Vec2;
    use proptest::prelude::*;

    fn rc(objs: Vec<HitObject>) -> Vec<Rc<HitObject>> {
        objs.into_iter().map(Rc::new).collect()
    }

    fn time_ordered(queue: &[Rc<HitObject>]) -> bool {
        queue.windows(2).all(|w| w[0].start_time <= w[1].start_time)
    }

    fn coverage(objs: &[Rc<HitObject>]) -> Option<(f64, f64)> {
        let first = objs.first()?.start_time;
        let last = objs.iter().map(|o| o.end_time).fold(f64::NEG_INFINITY, f64::max);
        Some((first, last))
    }

    /// Sorted-by-time object lists with a mix of kinds
    fn arb_objects() -> impl Strategy<Value = Vec<HitObject>> {
        prop::collection::vec((0u8..6, 10.0f64..400.0, 0.0f32..512.0, 0.0f32..384.0), 0..40).prop_map(
            |specs| {
                let mut time = 0.0;
                let mut objs = Vec::with_capacity(specs.len());
                for (id, (kind, gap, x, y)) in specs.into_iter().enumerate() {
                    let id = id as u32;
                    let pos = Vec2::new(x, y);
                    let obj = match kind {
                        0 => HitObject::spin_zone(id, time, time + gap * 2.0, pos),
                        1 | 2 => HitObject::hold(
                            id,
                            time,
                            time + gap,
                            HoldPath::new(vec![pos, pos + Vec2::new(80.0, 10.0)], 1 + kind as u32 % 2),
                        ),
                        _ => HitObject::point(id, time, pos),
                    };
                    time = obj.end_time + gap;
                    objs.push(obj);
                }
                objs
            },
        )
    }

    #[test]
    fn test_single_cursor_is_identity() {
        let objs = rc(vec![
            HitObject::point(0, 0.0, Vec2::ZERO),
            HitObject::spin_zone(1, 100.0, 500.0, Vec2::ONE),
            HitObject::hold(2, 600.0, 900.0, HoldPath::new(vec![Vec2::ZERO, Vec2::X * 100.0], 1)),
        ]);
        let queues = distribute(
            objs.clone(),
            &DistributorOptions {
                dense_holds: true,
                ..Default::default()
            },
        );
        assert_eq!(queues.len(), 1);
        assert_eq!(queues[0], objs);
    }

    #[test]
    fn test_spin_zone_goes_to_every_queue() {
        let objs = rc(vec![
            HitObject::point(0, 0.0, Vec2::ZERO),
            HitObject::spin_zone(1, 100.0, 500.0, Vec2::new(256.0, 192.0)),
            HitObject::point(2, 600.0, Vec2::new(200.0, 200.0)),
        ]);
        let options = DistributorOptions {
            cursors: 2,
            ..Default::default()
        };
        let queues = distribute(objs.clone(), &options);
        assert!(queues.iter().all(|q| q.iter().any(|o| o.is_spin_zone())));
        let point_counts: Vec<usize> = objs
            .iter()
            .filter(|o| !o.is_spin_zone())
            .map(|p| queues.iter().filter(|q| q.iter().any(|o| Rc::ptr_eq(o, p))).count())
            .collect();
        assert_eq!(point_counts, vec![1, 1]);
        // Round robin by sequence position: object 0 -> queue 0, object 2 -> queue 0
        assert_eq!(queues[0].len(), 3);
        assert_eq!(queues[1].len(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let objs = rc(vec![
            HitObject::point(0, 100.0, Vec2::ZERO),
            HitObject::point(1, 100.0, Vec2::ONE),
            HitObject::hold(2, 100.0, 300.0, HoldPath::new(vec![Vec2::ZERO, Vec2::X * 50.0], 1)),
            HitObject::point(3, 100.0, Vec2::Y),
        ]);
        let dense = preprocess_dense(objs, 100.0);
        let ids: Vec<u32> = dense.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 2, 2]);
    }

    proptest! {
        #[test]
        fn prop_queues_partition_input(objs in arb_objects(), n in 1usize..6, together in any::<bool>()) {
            let objs = rc(objs);
            let options = DistributorOptions { cursors: n, spins_together: together, ..Default::default() };
            let queues = distribute(objs.clone(), &options);
            prop_assert_eq!(queues.len(), n);

            for queue in &queues {
                prop_assert!(time_ordered(queue));
            }
            for obj in &objs {
                let holders = queues.iter().filter(|q| q.iter().any(|o| Rc::ptr_eq(o, obj))).count();
                let expected = if obj.is_spin_zone() && together { n } else { 1 };
                prop_assert_eq!(holders, expected);
            }
            let total: usize = queues.iter().map(Vec::len).sum();
            let spins = objs.iter().filter(|o| o.is_spin_zone()).count();
            let expected_total = if together { objs.len() + spins * (n - 1) } else { objs.len() };
            prop_assert_eq!(total, expected_total);
        }

        #[test]
        fn prop_dense_is_idempotent_and_keeps_coverage(objs in arb_objects(), interval in 5.0f64..200.0) {
            let objs = rc(objs);
            let once = preprocess_dense(objs.clone(), interval);
            let twice = preprocess_dense(once.clone(), interval);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.iter().all(|o| !o.is_hold()));
            prop_assert!(time_ordered(&once));
            prop_assert_eq!(coverage(&once), coverage(&objs));
        }

        #[test]
        fn prop_dense_distribution_keeps_every_fragment(objs in arb_objects(), n in 2usize..5) {
            let objs = rc(objs);
            let options = DistributorOptions { cursors: n, dense_holds: true, spins_together: false, ..Default::default() };
            let dense = preprocess_dense(objs.clone(), options.fragment_interval);
            let queues = distribute(objs, &options);
            let total: usize = queues.iter().map(Vec::len).sum();
            prop_assert_eq!(total, dense.len());
            for queue in &queues {
                prop_assert!(time_ordered(queue));
                prop_assert!(queue.iter().all(|o| !o.is_hold()));
            }
        }
    }
}
