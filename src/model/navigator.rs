//! Playlist navigation: which catalog index comes next or before.
//!
//! Pure functions over the catalog length; they never look at songs.

use rand::Rng;

/// Index to play after `current`.
///
/// Shuffle picks uniformly over the whole catalog and may pick `current`
/// again. Returns `None` for an empty catalog.
pub fn next_index<R: Rng + ?Sized>(len: usize, current: usize, shuffle: bool, rng: &mut R) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if shuffle {
        Some(rng.gen_range(0..len))
    } else {
        Some((current + 1) % len)
    }
}

/// Index to play before `current`. Always sequential, shuffle is ignored.
pub fn previous_index(len: usize, current: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((current % len + len - 1) % len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sequential_next_cycles_through_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut index = 2;
        let mut visited = Vec::new();
        for _ in 0..7 {
            index = next_index(5, index, false, &mut rng).unwrap();
            visited.push(index);
        }
        assert_eq!(visited, vec![3, 4, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn previous_wraps_to_last() {
        for len in 1..6 {
            for i in 0..len {
                assert_eq!(previous_index(len, i), Some((i + len - 1) % len));
            }
        }
        assert_eq!(previous_index(3, 0), Some(2));
    }

    #[test]
    fn shuffle_stays_in_range_and_can_repeat() {
        let mut rng = StdRng::seed_from_u64(42);
        let picks: Vec<usize> = (0..200)
            .map(|_| next_index(3, 1, true, &mut rng).unwrap())
            .collect();
        assert!(picks.iter().all(|&i| i < 3));
        // uniform over [0, 3): the current index is not excluded
        assert!(picks.contains(&1));
        assert!(picks.contains(&0));
        assert!(picks.contains(&2));
    }

    #[test]
    fn single_song_catalog_stays_put() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(next_index(1, 0, false, &mut rng), Some(0));
        assert_eq!(next_index(1, 0, true, &mut rng), Some(0));
        assert_eq!(previous_index(1, 0), Some(0));
    }

    #[test]
    fn empty_catalog_has_no_neighbours() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(next_index(0, 0, false, &mut rng), None);
        assert_eq!(next_index(0, 0, true, &mut rng), None);
        assert_eq!(previous_index(0, 0), None);
    }
}
