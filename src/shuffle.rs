use rand::{Rng, SeedableRng, rngs::StdRng};

/// Returns a shuffled copy of `items` using the Fisher-Yates algorithm.
///
/// Walks the indices from `len - 1` down to `1`, drawing `u` uniformly from `[0, 1)` and
/// swapping position `i` with `floor(u * (i + 1))`. The input slice is left untouched.
///
/// # Arguments
/// * `items` - The elements to permute.
/// * `rng` - The source of the uniform draws.
///
/// # Returns
/// A new vector holding a permutation of `items`.
pub fn fisher_yates<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut shuffled = items.to_vec();
    fisher_yates_in_place(&mut shuffled, rng);
    shuffled
}

/// Permutes `items` in place, drawing exactly like [`fisher_yates`].
pub fn fisher_yates_in_place<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let u: f64 = rng.random();
        // `u < 1` so this is at most `i`, the `min` only guards float rounding.
        let j = ((u * (i + 1) as f64).floor() as usize).min(i);
        items.swap(i, j);
    }
}

/// A Fisher-Yates shuffler owning a single random number generator.
///
/// Every stage of a pipeline run shares one `Shuffler`, so a seeded run consumes the same
/// sequence of draws each time and produces the same permutations.
#[derive(Debug, Clone)]
pub struct Shuffler<R: Rng = StdRng> {
    rng: R,
}

impl Shuffler<StdRng> {
    /// Creates a new `Shuffler`.
    ///
    /// # Arguments
    /// * `seed` - `Some` for a reproducible generator (any value, including `0`), `None` for
    ///   one seeded from the operating system's entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self { rng }
    }

    /// Creates a reproducible `Shuffler` from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl<R: Rng> Shuffler<R> {
    /// Wraps an existing random number generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns a shuffled copy of `items`, see [`fisher_yates`].
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        fisher_yates(items, &mut self.rng)
    }

    /// Shuffles an owned vector without copying its elements.
    pub fn shuffle_vec<T>(&mut self, mut items: Vec<T>) -> Vec<T> {
        fisher_yates_in_place(&mut items, &mut self.rng);
        items
    }
}

impl Default for Shuffler<StdRng> {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    /// A generator whose every draw is zero.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let items: Vec<u32> = (0..50).collect();
        let mut shuffler = Shuffler::new(None);

        let shuffled = shuffler.shuffle(&items);

        assert_eq!(shuffled.len(), items.len());
        assert_eq!(sorted(shuffled), items);
    }

    #[test]
    fn shuffle_leaves_input_untouched() {
        let items = vec![1, 2, 3, 4, 5];
        let mut shuffler = Shuffler::seeded(7);

        let _ = shuffler.shuffle(&items);

        assert_eq!(items, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn same_seed_same_permutation() {
        let items: Vec<u32> = (0..32).collect();

        let a = Shuffler::seeded(42).shuffle(&items);
        let b = Shuffler::seeded(42).shuffle(&items);

        assert_eq!(a, b);
    }

    #[test]
    fn zero_is_a_valid_seed() {
        let items: Vec<u32> = (0..32).collect();

        let a = Shuffler::new(Some(0)).shuffle(&items);
        let b = Shuffler::new(Some(0)).shuffle(&items);

        assert_eq!(a, b);
    }

    #[test]
    fn shared_shuffler_advances_between_calls() {
        let items: Vec<u32> = (0..32).collect();
        let mut shuffler = Shuffler::seeded(3);

        let first = shuffler.shuffle(&items);
        let second = shuffler.shuffle(&items);

        let mut replay = Shuffler::seeded(3);
        assert_eq!(replay.shuffle(&items), first);
        assert_eq!(replay.shuffle(&items), second);
    }

    #[test]
    fn empty_and_single_element_are_copied() {
        let mut shuffler = Shuffler::seeded(1);

        let empty: Vec<u32> = Vec::new();
        assert!(shuffler.shuffle(&empty).is_empty());
        assert_eq!(shuffler.shuffle(&[9]), [9]);
    }

    #[test]
    fn zero_draws_rotate_left() {
        // An all-zero generator always picks index 0, so each step swaps the tail with the head.
        let shuffled = fisher_yates(&[1, 2, 3, 4], &mut ZeroRng);

        assert_eq!(shuffled, [2, 3, 4, 1]);
    }

    #[test]
    fn owned_and_borrowed_shuffles_draw_alike() {
        let items: Vec<u32> = (0..16).collect();

        let borrowed = Shuffler::seeded(11).shuffle(&items);
        let owned = Shuffler::seeded(11).shuffle_vec(items);

        assert_eq!(borrowed, owned);
    }
}
