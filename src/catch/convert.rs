use crate::{
    parse::{HitObject, HitObjectKind},
    Beatmap,
};

use super::{
    catcher::{self, ALLOWED_CATCH_RANGE, BASE_SPEED},
    juice_stream::{JuiceStream, NestedJuiceKind},
    palpable::{banana_count, PalpableObject},
    random::Random,
    PLAYFIELD_WIDTH,
};

const RNG_SEED: i32 = 1337;

/// Fruits, droplets, and tiny droplets of the first `take` combo objects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ObjectCount {
    take: usize,
    pub(crate) fruits: u32,
    pub(crate) droplets: u32,
    pub(crate) tiny_droplets: u32,
}

impl ObjectCount {
    pub(crate) const fn new(take: usize) -> Self {
        Self {
            take,
            fruits: 0,
            droplets: 0,
            tiny_droplets: 0,
        }
    }

    pub(crate) fn record_fruit(&mut self) {
        if self.take > 0 {
            self.take -= 1;
            self.fruits += 1;
        }
    }

    pub(crate) fn record_droplet(&mut self) {
        if self.take > 0 {
            self.take -= 1;
            self.droplets += 1;
        }
    }

    pub(crate) fn record_tiny_droplets(&mut self, n: u32) {
        if self.take > 0 {
            self.tiny_droplets += n;
        }
    }
}

/// Convert the hit objects into time-ordered fruits and droplets.
///
/// Banana showers and tiny droplets are not palpable but still advance the
/// generator that offsets fruits under Hard Rock.
pub(crate) fn convert_objects(
    map: &Beatmap,
    count: &mut ObjectCount,
    hr_offsets: bool,
    cs: f32,
) -> Vec<PalpableObject> {
    let mut palpable_objects = Vec::with_capacity(map.hit_objects.len() * 2);

    let mut offsets = HrOffsets {
        rng: Random::new(RNG_SEED),
        last_pos: None,
        last_start_time: 0.0,
        enabled: hr_offsets,
    };

    for h in map.hit_objects.iter() {
        convert_object(h, map, count, &mut offsets, &mut palpable_objects);
    }

    palpable_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    initialize_hyper_dash(cs, &mut palpable_objects);

    palpable_objects
}

fn convert_object(
    h: &HitObject,
    map: &Beatmap,
    count: &mut ObjectCount,
    offsets: &mut HrOffsets,
    palpable_objects: &mut Vec<PalpableObject>,
) {
    match h.kind {
        HitObjectKind::Circle => {
            count.record_fruit();

            let x_offset = offsets.fruit(h.pos.x, h.start_time);
            palpable_objects.push(PalpableObject::new(h.pos.x, x_offset, h.start_time));
        }
        HitObjectKind::Slider {
            pixel_len,
            repeats,
            ref curve_points,
            path_type,
        } => {
            let stream = JuiceStream::new(
                h.pos,
                h.start_time,
                pixel_len,
                repeats,
                curve_points,
                path_type,
                map,
                count,
            );

            offsets.juice_stream(&stream, h.start_time);

            let nested = stream
                .nested_objects
                .iter()
                .filter(|nested| nested.kind != NestedJuiceKind::TinyDroplet)
                .map(|nested| PalpableObject::new(nested.x, 0.0, nested.start_time));

            palpable_objects.extend(nested);
        }
        HitObjectKind::Spinner { end_time } | HitObjectKind::Hold { end_time } => {
            offsets.banana_shower(banana_count(h.start_time, end_time));
        }
    }
}

struct HrOffsets {
    rng: Random,
    last_pos: Option<f32>,
    last_start_time: f64,
    enabled: bool,
}

impl HrOffsets {
    /// Returns the x-offset of a fruit.
    fn fruit(&mut self, x: f32, start_time: f64) -> f32 {
        if !self.enabled {
            return 0.0;
        }

        let mut offset_pos = x;

        let last_pos = match self.last_pos {
            Some(pos) if pos.abs() >= f32::EPSILON => pos,
            Some(_) | None => {
                self.last_pos = Some(offset_pos);
                self.last_start_time = start_time;

                return 0.0;
            }
        };

        let pos_diff = offset_pos - last_pos;
        let time_diff = (start_time - self.last_start_time) as i32;

        if time_diff > 1000 {
            self.last_pos = Some(offset_pos);
            self.last_start_time = start_time;

            return 0.0;
        }

        if pos_diff.abs() < f32::EPSILON {
            self.apply_random_offset(&mut offset_pos, f64::from(time_diff) / 4.0);

            return offset_pos - x;
        }

        if pos_diff.abs() < (time_diff / 3) as f32 {
            apply_offset(&mut offset_pos, pos_diff);
        }

        self.last_pos = Some(offset_pos);
        self.last_start_time = start_time;

        offset_pos - x
    }

    fn juice_stream(&mut self, stream: &JuiceStream, start_time: f64) {
        self.last_pos = Some(stream.path_end_x);
        self.last_start_time = start_time;

        let n_droplets = stream
            .nested_objects
            .iter()
            .filter(|nested| nested.kind != NestedJuiceKind::Fruit)
            .count();

        self.rng.skip(n_droplets);
    }

    fn banana_shower(&mut self, n_bananas: usize) {
        // * Each banana draws a double and three integers.
        self.rng.skip(4 * n_bananas);
    }

    fn apply_random_offset(&mut self, pos: &mut f32, max_offset: f64) {
        let right = self.rng.next_bool();
        let rand = (self.rng.next_double_range(0.0, max_offset.max(0.0)) as f32).min(20.0);

        if right {
            if *pos + rand <= PLAYFIELD_WIDTH {
                *pos += rand;
            } else {
                *pos -= rand;
            }
        } else if *pos - rand >= 0.0 {
            *pos -= rand;
        } else {
            *pos += rand;
        }
    }
}

fn apply_offset(pos: &mut f32, amount: f32) {
    if amount > 0.0 {
        if *pos + amount < PLAYFIELD_WIDTH {
            *pos += amount;
        }
    } else if *pos + amount > 0.0 {
        *pos += amount;
    }
}

fn initialize_hyper_dash(cs: f32, palpable_objects: &mut [PalpableObject]) {
    let half_catcher_width =
        f64::from(catcher::catch_width(cs) / 2.0) / f64::from(ALLOWED_CATCH_RANGE);

    let mut last_dir = 0;
    let mut last_excess = half_catcher_width;

    for i in 0..palpable_objects.len().saturating_sub(1) {
        let next = &palpable_objects[i + 1];
        let curr = &palpable_objects[i];

        let this_dir = if next.effective_x() > curr.effective_x() {
            1
        } else {
            -1
        };

        // * Int truncation added to match osu!stable.
        let time_to_next = f64::from(
            (next.start_time as i32 - curr.start_time as i32) as f32 - 1000.0 / 60.0 / 4.0,
        );

        let dist_to_next = f64::from((next.effective_x() - curr.effective_x()).abs())
            - if last_dir == this_dir {
                last_excess
            } else {
                half_catcher_width
            };

        let dist_to_hyper = (time_to_next * BASE_SPEED - dist_to_next) as f32;

        let curr = &mut palpable_objects[i];

        if dist_to_hyper < 0.0 {
            curr.hyper_dash = true;
            last_excess = half_catcher_width;
        } else {
            curr.dist_to_hyper_dash = dist_to_hyper;
            last_excess = f64::from(dist_to_hyper).clamp(0.0, half_catcher_width);
        }

        last_dir = this_dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse::TimingPoint, Pos2};

    fn fruit(x: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos2::new(x, 192.0),
            start_time,
            kind: HitObjectKind::Circle,
            sound: 0,
        }
    }

    fn map(hit_objects: Vec<HitObject>) -> Beatmap {
        Beatmap {
            slider_mult: 1.0,
            tick_rate: 1.0,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 500.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn take_limits_counts() {
        let map = map((0..10).map(|i| fruit(256.0, f64::from(i) * 300.0)).collect());
        let mut count = ObjectCount::new(4);

        let objects = convert_objects(&map, &mut count, false, 5.0);

        assert_eq!(objects.len(), 10);
        assert_eq!(count.fruits, 4);
        assert_eq!(count.droplets, 0);
    }

    #[test]
    fn far_jump_is_hyper_dash() {
        let map = map(vec![fruit(0.0, 1000.0), fruit(512.0, 1100.0)]);
        let mut count = ObjectCount::new(usize::MAX);

        let objects = convert_objects(&map, &mut count, false, 5.0);

        assert!(objects[0].hyper_dash);
        assert!(!objects[1].hyper_dash);
    }

    #[test]
    fn slow_jump_is_no_hyper_dash() {
        let map = map(vec![fruit(100.0, 1000.0), fruit(200.0, 2000.0)]);
        let mut count = ObjectCount::new(usize::MAX);

        let objects = convert_objects(&map, &mut count, false, 5.0);

        assert!(!objects[0].hyper_dash);
        assert!(objects[0].dist_to_hyper_dash > 0.0);
    }

    #[test]
    fn hard_rock_offsets_stacked_fruits() {
        let map = map((0..8).map(|i| fruit(256.0, 1000.0 + f64::from(i) * 200.0)).collect());

        let mut count = ObjectCount::new(usize::MAX);
        let plain = convert_objects(&map, &mut count, false, 5.0);

        let mut count = ObjectCount::new(usize::MAX);
        let hr = convert_objects(&map, &mut count, true, 5.0);

        assert!(plain.iter().all(|h| h.x_offset.abs() < f32::EPSILON));
        assert!(hr.iter().skip(1).any(|h| h.x_offset.abs() > 0.0));
        assert!(hr.iter().all(|h| (0.0..=PLAYFIELD_WIDTH).contains(&h.effective_x())));
    }

    #[test]
    fn showers_are_not_palpable() {
        let mut hit_objects = vec![fruit(256.0, 500.0)];

        hit_objects.push(HitObject {
            pos: Pos2::new(256.0, 192.0),
            start_time: 1000.0,
            kind: HitObjectKind::Spinner { end_time: 2000.0 },
            sound: 0,
        });

        let map = map(hit_objects);
        let mut count = ObjectCount::new(usize::MAX);

        let objects = convert_objects(&map, &mut count, false, 5.0);

        assert_eq!(objects.len(), 1);
        assert_eq!(count.fruits, 1);
    }
}
