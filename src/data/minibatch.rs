use log::trace;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::dataset::DatasetEntry;

/// Seeded sampler handing out windows of `size` positions over a shuffled
/// permutation of the dataset.
///
/// The first call to [`generate`](Self::generate) exposes the window at the
/// start of the initial permutation. Later calls advance by `size`; when the
/// next window would run past the end, the permutation is reshuffled and the
/// cursor returns to 0. Windows never overlap between reshuffles, and if
/// `size` does not divide the dataset length the last `len % size` positions
/// of a permutation are skipped for that pass.
#[derive(Debug, Clone)]
pub struct MinibatchGenerator<'a> {
    dataset: &'a [DatasetEntry],
    size: usize,
    indexes: Vec<usize>,
    rng: ChaCha8Rng,
    offset: usize,
    started: bool,
}

impl<'a> MinibatchGenerator<'a> {
    /// Panics unless `1 <= size <= dataset.len()`.
    pub fn new(dataset: &'a [DatasetEntry], size: usize, seed: u64) -> MinibatchGenerator<'a> {
        assert!(size > 0, "minibatch size must be at least 1");
        assert!(
            size <= dataset.len(),
            "minibatch size {} exceeds dataset length {}",
            size,
            dataset.len()
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut indexes: Vec<usize> = (0..dataset.len()).collect();
        indexes.shuffle(&mut rng);

        MinibatchGenerator {
            dataset,
            size,
            indexes,
            rng,
            offset: 0,
            started: false,
        }
    }

    /// Moves to the next window.
    pub fn generate(&mut self) {
        if !self.started {
            self.started = true;
            return;
        }

        let next = self.offset + self.size;
        if next + self.size > self.dataset.len() {
            trace!("minibatch cursor wrapped, reshuffling {} indexes", self.indexes.len());
            self.offset = 0;
            self.indexes.shuffle(&mut self.rng);
        } else {
            self.offset = next;
        }
    }

    /// The `idx`-th entry of the current window.
    pub fn get(&self, idx: usize) -> &'a DatasetEntry {
        assert!(idx < self.size, "index {} outside a minibatch of {}", idx, self.size);
        &self.dataset[self.indexes[self.offset + idx]]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Dataset positions in the current window.
    pub fn window(&self) -> &[usize] {
        &self.indexes[self.offset..self.offset + self.size]
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a DatasetEntry> + '_ {
        let dataset = self.dataset;
        self.window().iter().map(move |&i| &dataset[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dataset(n: usize) -> Vec<DatasetEntry> {
        (0..n)
            .map(|i| DatasetEntry::new(vec![i as f64], vec![0.0]))
            .collect()
    }

    #[test]
    fn first_window_starts_at_zero() {
        let ds = dataset(6);
        let mut gen = MinibatchGenerator::new(&ds, 2, 1);
        let initial: Vec<usize> = gen.indexes[..2].to_vec();
        gen.generate();
        assert_eq!(gen.window(), initial.as_slice());
    }

    #[test]
    fn each_pass_visits_every_index_once() {
        let ds = dataset(12);
        let mut gen = MinibatchGenerator::new(&ds, 3, 42);
        for _pass in 0..5 {
            let mut seen = HashSet::new();
            for _ in 0..4 {
                gen.generate();
                for &i in gen.window() {
                    assert!(seen.insert(i), "index {i} visited twice in one pass");
                }
            }
            assert_eq!(seen.len(), 12);
        }
    }

    #[test]
    fn remainder_is_skipped_then_reshuffled() {
        let ds = dataset(5);
        let mut gen = MinibatchGenerator::new(&ds, 2, 9);
        gen.generate();
        assert_eq!(gen.offset, 0);
        gen.generate();
        assert_eq!(gen.offset, 2);
        gen.generate();
        assert_eq!(gen.offset, 0);
        assert_eq!(gen.window().len(), 2);
    }

    #[test]
    fn full_size_window_covers_dataset() {
        let ds = dataset(4);
        let mut gen = MinibatchGenerator::new(&ds, 4, 0);
        for _ in 0..3 {
            gen.generate();
            let mut seen: Vec<usize> = gen.window().to_vec();
            seen.sort();
            assert_eq!(seen, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn same_seed_same_schedule() {
        let ds = dataset(10);
        let mut a = MinibatchGenerator::new(&ds, 3, 5);
        let mut b = MinibatchGenerator::new(&ds, 3, 5);
        for _ in 0..20 {
            a.generate();
            b.generate();
            assert_eq!(a.window(), b.window());
        }
    }

    #[test]
    fn get_reads_through_permutation() {
        let ds = dataset(4);
        let mut gen = MinibatchGenerator::new(&ds, 2, 3);
        gen.generate();
        let expected = gen.window()[1] as f64;
        assert_eq!(gen.get(1).input[0], expected);
        assert_eq!(gen.iter().count(), 2);
    }

    #[test]
    #[should_panic(expected = "exceeds dataset length")]
    fn oversized_minibatch_is_fatal() {
        let ds = dataset(2);
        MinibatchGenerator::new(&ds, 3, 0);
    }
}
