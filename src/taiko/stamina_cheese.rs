use crate::limited_queue::LimitedQueue;

use super::difficulty_object::{HitType, TaikoDifficultyObject};

const ROLL_MIN_REPETITIONS: usize = 12;
const TL_MIN_REPETITIONS: isize = 16;

/// Flag patterns that can be played with one hand per colour, i.e. rolls
/// and alternating "TL taps", so that stamina doesn't reward them.
pub(crate) fn mark_stamina_cheese(diff_objects: &mut [TaikoDifficultyObject<'_>]) {
    let hit_types: Vec<_> = diff_objects.iter().map(|h| h.hit_type).collect();
    let mut cheese = vec![false; hit_types.len()];

    find_rolls::<3, 6>(&hit_types, &mut cheese);
    find_rolls::<4, 8>(&hit_types, &mut cheese);

    find_tl_tap(&hit_types, &mut cheese, 0, HitType::Rim);
    find_tl_tap(&hit_types, &mut cheese, 1, HitType::Rim);
    find_tl_tap(&hit_types, &mut cheese, 0, HitType::Centre);
    find_tl_tap(&hit_types, &mut cheese, 1, HitType::Centre);

    for (h, is_cheese) in diff_objects.iter_mut().zip(cheese) {
        h.stamina_cheese = is_cheese;
    }
}

fn find_rolls<const PATTERN_LEN: usize, const HISTORY_LEN: usize>(
    hit_types: &[Option<HitType>],
    cheese: &mut [bool],
) {
    let mut history = LimitedQueue::<Option<HitType>, HISTORY_LEN>::new();

    // Index of the object right *before* the suspected repeat's start
    let mut idx_before_last_repeat: isize = -1;
    let mut last_mark_end = 0;

    for (i, &hit_type) in hit_types.iter().enumerate() {
        history.push(hit_type);

        if !history.is_full() {
            continue;
        }

        if !contains_pattern_repeat::<PATTERN_LEN, HISTORY_LEN>(&history) {
            // * we're setting this up for the next iteration, hence the +1.
            idx_before_last_repeat = (i + 1 - history.len()) as isize;

            continue;
        }

        let repeated_len = (i as isize - idx_before_last_repeat) as usize;

        if repeated_len < ROLL_MIN_REPETITIONS {
            continue;
        }

        mark_as_cheese(cheese, last_mark_end.max(i + 1 - repeated_len), i);
        last_mark_end = i;
    }
}

fn contains_pattern_repeat<const PATTERN_LEN: usize, const HISTORY_LEN: usize>(
    history: &LimitedQueue<Option<HitType>, HISTORY_LEN>,
) -> bool {
    (0..PATTERN_LEN).all(|j| history[j] == history[j + PATTERN_LEN])
}

fn find_tl_tap(
    hit_types: &[Option<HitType>],
    cheese: &mut [bool],
    parity: usize,
    hit_type: HitType,
) {
    let mut tl_len: isize = -2;
    let mut last_mark_end = 0;

    for (i, curr) in hit_types.iter().enumerate().skip(parity).step_by(2) {
        if *curr == Some(hit_type) {
            tl_len += 2;
        } else {
            tl_len = -2;
        }

        if tl_len < TL_MIN_REPETITIONS {
            continue;
        }

        let start = (i as isize + 1 - tl_len).max(last_mark_end as isize) as usize;
        mark_as_cheese(cheese, start, i);
        last_mark_end = i;
    }
}

#[inline]
fn mark_as_cheese(cheese: &mut [bool], start: usize, end: usize) {
    for is_cheese in cheese[start..=end].iter_mut() {
        *is_cheese = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(hit_types: &[Option<HitType>]) -> Vec<bool> {
        let mut cheese = vec![false; hit_types.len()];

        find_rolls::<3, 6>(hit_types, &mut cheese);
        find_rolls::<4, 8>(hit_types, &mut cheese);
        find_tl_tap(hit_types, &mut cheese, 0, HitType::Rim);
        find_tl_tap(hit_types, &mut cheese, 1, HitType::Rim);
        find_tl_tap(hit_types, &mut cheese, 0, HitType::Centre);
        find_tl_tap(hit_types, &mut cheese, 1, HitType::Centre);

        cheese
    }

    #[test]
    fn long_roll_is_cheese() {
        // ddk repeated
        let hit_types: Vec<_> = (0..30)
            .map(|i| {
                if i % 3 == 2 {
                    Some(HitType::Rim)
                } else {
                    Some(HitType::Centre)
                }
            })
            .collect();

        let cheese = detect(&hit_types);

        assert!(cheese[20..].iter().all(|&b| b));
    }

    #[test]
    fn short_pattern_is_not_cheese() {
        let hit_types = [
            Some(HitType::Centre),
            Some(HitType::Rim),
            Some(HitType::Centre),
            Some(HitType::Centre),
            Some(HitType::Rim),
        ];

        assert!(detect(&hit_types).iter().all(|&b| !b));
    }

    #[test]
    fn mono_colour_stream_is_tl_tap() {
        let hit_types = vec![Some(HitType::Centre); 40];

        let cheese = detect(&hit_types);

        assert!(cheese[20..].iter().all(|&b| b));
    }
}
