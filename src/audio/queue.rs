//! Next/previous/shuffle index selection over the catalog order.
//!
//! `current` is `None` when the playing track is not part of the catalog; it
//! then sits before the first entry.

use rand::Rng;

pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) => (i + 1) % len,
        None => 0,
    })
}

pub fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) => (i % len + len - 1) % len,
        None => len - 1,
    })
}

/// Uniform pick that never lands on `current` when there is another choice.
pub fn shuffle_index<R: Rng>(
    current: Option<usize>,
    len: usize,
    rng: &mut R,
) -> Option<usize> {
    match (current, len) {
        (_, 0) => None,
        (_, 1) => Some(0),
        (Some(i), _) if i < len => {
            let pick = rng.random_range(0..len - 1);
            Some(if pick >= i { pick + 1 } else { pick })
        }
        _ => Some(rng.random_range(0..len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_around() {
        let visited: Vec<_> = (0..5)
            .scan(Some(1), |cur, _| {
                *cur = next_index(*cur, 3);
                *cur
            })
            .collect();
        assert_eq!(visited, vec![2, 0, 1, 2, 0]);
    }

    #[test]
    fn previous_wraps_around() {
        assert_eq!(previous_index(Some(0), 4), Some(3));
        assert_eq!(previous_index(Some(2), 4), Some(1));
    }

    #[test]
    fn outside_catalog_counts_as_before_first() {
        assert_eq!(next_index(None, 4), Some(0));
        assert_eq!(previous_index(None, 4), Some(3));
    }

    #[test]
    fn empty_catalog_has_no_target() {
        assert_eq!(next_index(Some(0), 0), None);
        assert_eq!(previous_index(None, 0), None);
        assert_eq!(shuffle_index(None, 0, &mut rand::rng()), None);
    }

    #[test]
    fn shuffle_never_repeats_current() {
        let mut rng = rand::rng();
        for current in 0..4 {
            for _ in 0..200 {
                let pick = shuffle_index(Some(current), 4, &mut rng).unwrap();
                assert_ne!(pick, current);
                assert!(pick < 4);
            }
        }
    }

    #[test]
    fn shuffle_single_track_returns_it() {
        assert_eq!(shuffle_index(Some(0), 1, &mut rand::rng()), Some(0));
    }

    #[test]
    fn shuffle_reaches_every_other_index() {
        let mut rng = rand::rng();
        let mut seen = [false; 3];
        for _ in 0..500 {
            seen[shuffle_index(Some(1), 3, &mut rng).unwrap()] = true;
        }
        assert_eq!(seen, [true, false, true]);
    }
}
