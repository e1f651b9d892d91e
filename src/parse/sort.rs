use std::cmp::Ordering;

const QUICK_SORT_DEPTH_THRESHOLD: usize = 32;

/// Unstable introsort as done by the game client for osu!mania charts.
///
/// Hit objects sharing a start time may end up in a different order than a
/// stable sort would put them which matters for the strain of each column.
pub(crate) fn legacy_sort<T: PartialOrd + Clone>(keys: &mut [T]) {
    if keys.len() < 2 {
        return;
    }

    intro_sort(keys, 0, keys.len() - 1, QUICK_SORT_DEPTH_THRESHOLD);
}

fn intro_sort<T: PartialOrd + Clone>(
    keys: &mut [T],
    mut lo: usize,
    mut hi: usize,
    mut depth: usize,
) {
    loop {
        if depth == 0 {
            heap_sort(keys, lo, hi);

            return;
        }

        let mut i = lo;
        let mut j = hi;
        let mid = i + ((j - i) >> 1);

        swap_if_greater(keys, i, mid);
        swap_if_greater(keys, i, j);
        swap_if_greater(keys, mid, j);

        let pivot = keys[mid].clone();

        loop {
            while keys[i] < pivot {
                i += 1;
            }

            while pivot < keys[j] {
                j -= 1;
            }

            match i.cmp(&j) {
                Ordering::Less => keys.swap(i, j),
                Ordering::Equal => {}
                Ordering::Greater => break,
            }

            i += 1;
            j = j.saturating_sub(1);

            if i > j {
                break;
            }
        }

        depth -= 1;

        if j.saturating_sub(lo) <= hi - i {
            if lo < j {
                intro_sort(keys, lo, j, depth);
            }

            lo = i;
        } else {
            if i < hi {
                intro_sort(keys, i, hi, depth);
            }

            hi = j;
        }

        if lo >= hi {
            break;
        }
    }
}

#[inline]
fn swap_if_greater<T: PartialOrd>(keys: &mut [T], a: usize, b: usize) {
    if keys[a] > keys[b] {
        keys.swap(a, b);
    }
}

fn heap_sort<T: PartialOrd>(keys: &mut [T], lo: usize, hi: usize) {
    let n = hi - lo + 1;

    for i in (1..=n / 2).rev() {
        sift_down(keys, i, n, lo);
    }

    for i in (2..=n).rev() {
        keys.swap(lo, lo + i - 1);
        sift_down(keys, 1, i - 1, lo);
    }
}

fn sift_down<T: PartialOrd>(keys: &mut [T], mut i: usize, n: usize, lo: usize) {
    while i <= n / 2 {
        let mut child = 2 * i;

        if child < n && keys[lo + child - 1] < keys[lo + child] {
            child += 1;
        }

        if keys[lo + i - 1] >= keys[lo + child - 1] {
            break;
        }

        keys.swap(lo + i - 1, lo + child - 1);
        i = child;
    }
}

#[cfg(test)]
mod tests {
    use super::legacy_sort;

    #[test]
    fn sorts_numbers() {
        let mut values = vec![5.0, 1.0, 4.0, 1.0, 3.0, 9.0, 2.0, 6.0];
        legacy_sort(&mut values);

        assert_eq!(values, vec![1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 9.0]);
    }

    #[test]
    fn sorts_long_input() {
        let mut values: Vec<f64> = (0..500).map(|i| f64::from((i * 7919) % 503)).collect();
        legacy_sort(&mut values);

        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}
