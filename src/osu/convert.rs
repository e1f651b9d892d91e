use crate::Beatmap;

use super::{
    object::{OsuObject, OsuObjectKind},
    scaling_factor::ScalingFactor,
    STACK_DISTANCE,
};

/// Turn every hit object of the map into an [`OsuObject`], stacked and
/// with slider cursor travel computed.
///
/// Stacking considers the whole map so that a prefix of the result matches
/// what the game shows for a partial play.
pub(crate) fn convert_objects(
    map: &Beatmap,
    scaling_factor: &ScalingFactor,
    hr: bool,
    time_preempt: f64,
) -> Vec<OsuObject> {
    let mut objects: Vec<_> = map
        .hit_objects
        .iter()
        .map(|h| OsuObject::new(h, map, hr))
        .collect();

    let stack_threshold = time_preempt * f64::from(map.stack_leniency);

    if map.version >= 6 {
        stacking(&mut objects, stack_threshold);
    } else {
        old_stacking(&mut objects, stack_threshold);
    }

    for h in objects.iter_mut() {
        h.finalize(scaling_factor);
    }

    objects
}

fn stacking(objects: &mut [OsuObject], stack_threshold: f64) {
    let Some(end_idx) = objects.len().checked_sub(1) else {
        return;
    };

    let mut extended_start_idx = 0;

    for i in (1..=end_idx).rev() {
        // * We should check every note which has not yet got a stack.
        // * Consider the case we have two interwound stacks and this will make sense.
        // *   o <-1      o <-2
        // *    o <-3      o <-4
        // * We first process starting from 4 and handle 2,
        // * then we come backwards on the i loop iteration until we reach 3 and handle 1.
        // * 2 and 1 will be ignored in the i loop because they already have a stack value.
        if objects[i].stack_height != 0 || objects[i].is_spinner() {
            continue;
        }

        let mut base_idx = i;

        if objects[i].is_circle() {
            // * If this object is a hitcircle, then we enter this "special" case.
            // * It either ends with a stack of hitcircles only,
            // * or a stack of hitcircles that are underneath a slider.
            for n in (0..i).rev() {
                if objects[n].is_spinner() {
                    continue;
                }

                // * We are no longer within stacking range of the previous object.
                if objects[base_idx].start_time - objects[n].end_time() > stack_threshold {
                    break;
                }

                // * HitObjects before the specified update range haven't been reset yet
                if n < extended_start_idx {
                    objects[n].stack_height = 0;
                    extended_start_idx = n;
                }

                // * This is a special case where hticircles are moved DOWN and RIGHT (negative stacking)
                // * if they are under the *last* slider in a stacked pattern.
                // *    o==o <- slider is at original location
                // *        o <- hitCircle has stack of -1
                // *         o <- hitCircle has stack of -2
                let slider_end = objects[n].end_pos();

                if objects[n].is_slider()
                    && slider_end.distance(objects[base_idx].pos) < STACK_DISTANCE
                {
                    let offset = objects[base_idx].stack_height - objects[n].stack_height + 1;

                    // * For each object which was declared under this slider, we will offset
                    // * it to appear *below* the slider end (rather than above).
                    for obj in objects[n + 1..=i].iter_mut() {
                        if slider_end.distance(obj.pos) < STACK_DISTANCE {
                            obj.stack_height -= offset;
                        }
                    }

                    // * We have hit a slider. We should restart calculation using this as the new base.
                    // * Breaking here will mean that the slider still has StackCount of 0,
                    // * so will be handled in the i-outer-loop.
                    break;
                }

                if objects[n].pos.distance(objects[base_idx].pos) < STACK_DISTANCE {
                    // * Keep processing as if there are no sliders.
                    // * If we come across a slider, this gets cancelled out.
                    objects[n].stack_height = objects[base_idx].stack_height + 1;
                    base_idx = n;
                }
            }
        } else if objects[i].is_slider() {
            // * We have hit the first slider in a possible stack.
            // * From this point on, we ALWAYS stack positive regardless.
            for n in (0..i).rev() {
                if objects[n].is_spinner() {
                    continue;
                }

                if objects[base_idx].start_time - objects[n].start_time > stack_threshold {
                    break;
                }

                if objects[n].end_pos().distance(objects[base_idx].pos) < STACK_DISTANCE {
                    objects[n].stack_height = objects[base_idx].stack_height + 1;
                    base_idx = n;
                }
            }
        }
    }
}

/// Stacking as done for maps before version 6.
fn old_stacking(objects: &mut [OsuObject], stack_threshold: f64) {
    for i in 0..objects.len() {
        if objects[i].stack_height != 0 && !objects[i].is_slider() {
            continue;
        }

        let mut start_time = objects[i].end_time();
        let pos = objects[i].pos;

        // Sliders compare against the end of their path regardless of repeats
        let path_end = match &objects[i].kind {
            OsuObjectKind::Slider(slider) => slider.path_end_pos,
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => pos,
        };

        let mut slider_stack = 0;

        for j in i + 1..objects.len() {
            if objects[j].start_time - stack_threshold > start_time {
                break;
            }

            // * Note the use of `StartTime` in the code below doesn't match stable's use of `EndTime`.
            // * This is because in the stable implementation, `UpdateCalculations` is not called on the inner-loop hitobject (j)
            // * and therefore it does not have a correct `EndTime`, but instead the default of `EndTime = StartTime`.
            if objects[j].pos.distance(pos) < STACK_DISTANCE {
                objects[i].stack_height += 1;
                start_time = objects[j].start_time;
            } else if objects[j].pos.distance(path_end) < STACK_DISTANCE {
                slider_stack += 1;
                objects[j].stack_height -= slider_stack;
                start_time = objects[j].start_time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, HitObjectKind, TimingPoint};
    use crate::Pos2;

    fn circle(x: f32, y: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos2::new(x, y),
            start_time,
            kind: HitObjectKind::Circle,
            sound: 0,
        }
    }

    fn map(version: u32, hit_objects: Vec<HitObject>) -> Beatmap {
        Beatmap {
            version,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 500.0,
            }],
            ..Default::default()
        }
    }

    fn stack_heights(map: &Beatmap) -> Vec<i32> {
        convert_objects(map, &ScalingFactor::new(4.0), false, 1200.0)
            .iter()
            .map(|h| h.stack_height)
            .collect()
    }

    #[test]
    fn circles_on_top_of_each_other_stack_up() {
        let map = map(
            14,
            vec![
                circle(100.0, 100.0, 1000.0),
                circle(100.0, 100.0, 1100.0),
                circle(100.0, 100.0, 1200.0),
            ],
        );

        assert_eq!(stack_heights(&map), [2, 1, 0]);
    }

    #[test]
    fn distant_objects_do_not_stack() {
        let map = map(
            14,
            vec![circle(100.0, 100.0, 1000.0), circle(100.0, 100.0, 5000.0)],
        );

        assert_eq!(stack_heights(&map), [0, 0]);
    }

    #[test]
    fn old_versions_stack_forward() {
        let map = map(
            5,
            vec![circle(100.0, 100.0, 1000.0), circle(101.0, 100.0, 1100.0)],
        );

        assert_eq!(stack_heights(&map), [1, 0]);
    }

    #[test]
    fn stacked_objects_are_offset() {
        let map = map(
            14,
            vec![circle(100.0, 100.0, 1000.0), circle(100.0, 100.0, 1100.0)],
        );

        let objects = convert_objects(&map, &ScalingFactor::new(4.0), false, 1200.0);

        assert!(objects[0].stacked_pos().x < 100.0);
        assert!((objects[1].stacked_pos().x - 100.0).abs() < f32::EPSILON);
    }
}
