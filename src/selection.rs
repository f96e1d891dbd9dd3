use crate::genome::Genome;
use parking_lot::Mutex;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How parents are weighted when sampling the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sampling {
    /// Weight by score shifted so the worst entry weighs 1.
    #[default]
    ScoreWeighted,
    /// Weight by position in the sorted table, worst = 1.
    RankWeighted,
}

/// Bounded pool of dead agents' genomes, sorted ascending by fitness.
#[derive(Debug, Clone)]
pub struct SelectionTable {
    capacity: usize,
    entries: Vec<(f64, Genome)>,
    total_score: f64,
    sampling: Sampling,
}

impl SelectionTable {
    pub fn new(capacity: usize, sampling: Sampling) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::with_capacity(capacity + 1),
            total_score: 0.0,
            sampling,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// Entries from worst to best.
    pub fn entries(&self) -> &[(f64, Genome)] {
        &self.entries
    }

    /// Records a genome with its fitness. Returns false when the entry did
    /// not make it into the table (it ranked below a full table).
    pub fn try_add(&mut self, score: f64, genome: Genome) -> bool {
        if score.is_nan() {
            log::warn!("rejecting genome with NaN fitness");
            return false;
        }
        let previous_best = self.best_score();
        let pos = self.entries.partition_point(|(s, _)| *s <= score);
        self.entries.insert(pos, (score, genome));
        self.total_score += score;

        if self.entries.len() > self.capacity {
            let (evicted, _) = self.entries.remove(0);
            self.total_score -= evicted;
            if pos == 0 {
                return false;
            }
        }
        if previous_best.is_none_or(|best| score > best) {
            log::info!("new best fitness {score:.3}");
        }
        true
    }

    pub fn get_best(&self) -> Option<(f64, &Genome)> {
        self.entries.last().map(|(s, g)| (*s, g))
    }

    pub fn get_worst(&self) -> Option<(f64, &Genome)> {
        self.entries.first().map(|(s, g)| (*s, g))
    }

    pub fn best_score(&self) -> Option<f64> {
        self.entries.last().map(|(s, _)| *s)
    }

    pub fn mean(&self) -> Option<f64> {
        (!self.entries.is_empty()).then(|| self.total_score / self.entries.len() as f64)
    }

    pub fn median(&self) -> Option<f64> {
        let n = self.entries.len();
        match n {
            0 => None,
            _ if n % 2 == 1 => Some(self.entries[n / 2].0),
            _ => Some((self.entries[n / 2 - 1].0 + self.entries[n / 2].0) / 2.0),
        }
    }

    fn weights(&self, ignore: Option<usize>) -> Vec<f64> {
        let min = self.entries.first().map_or(0.0, |(s, _)| *s);
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (score, _))| {
                if Some(i) == ignore {
                    0.0
                } else {
                    match self.sampling {
                        Sampling::ScoreWeighted => score - min + 1.0,
                        Sampling::RankWeighted => (i + 1) as f64,
                    }
                }
            })
            .collect()
    }

    /// Samples one entry with probability proportional to its weight,
    /// never returning `ignore`.
    pub fn peek_probabilistic<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ignore: Option<usize>,
    ) -> Option<(&Genome, usize)> {
        let dist = WeightedIndex::new(self.weights(ignore)).ok()?;
        let idx = dist.sample(rng);
        Some((&self.entries[idx].1, idx))
    }

    /// Children for the next generation: two from a sexual pairing of
    /// distinct parents, or one mutated copy of a single parent.
    pub fn breed<R: Rng + ?Sized>(&self, sexual: bool, rng: &mut R) -> Vec<Genome> {
        let Some((first, first_idx)) = self.peek_probabilistic(rng, None) else {
            return Vec::new();
        };
        if sexual && self.entries.len() >= 2 {
            if let Some((second, _)) = self.peek_probabilistic(rng, Some(first_idx)) {
                let (a, b) = first.reproduce(second, rng);
                return vec![a, b];
            }
        }
        let mut child = first.descendant(rng);
        child.mutate(rng);
        vec![child]
    }
}

/// Selection table shared by every agent of a population. Each call takes
/// the lock once, so concurrent agents never interleave inside a method.
#[derive(Debug, Clone)]
pub struct SharedSelectionTable {
    inner: Arc<Mutex<SelectionTable>>,
}

impl SharedSelectionTable {
    pub fn new(table: SelectionTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    pub fn try_add(&self, score: f64, genome: Genome) -> bool {
        self.inner.lock().try_add(score, genome)
    }

    pub fn count(&self) -> usize {
        self.inner.lock().count()
    }

    pub fn total_score(&self) -> f64 {
        self.inner.lock().total_score()
    }

    pub fn best(&self) -> Option<(f64, Genome)> {
        self.inner.lock().get_best().map(|(s, g)| (s, g.clone()))
    }

    pub fn mean(&self) -> Option<f64> {
        self.inner.lock().mean()
    }

    pub fn median(&self) -> Option<f64> {
        self.inner.lock().median()
    }

    pub fn breed<R: Rng + ?Sized>(&self, sexual: bool, rng: &mut R) -> Vec<Genome> {
        self.inner.lock().breed(sexual, rng)
    }

    /// Runs `f` with exclusive access to the table.
    pub fn with<T>(&self, f: impl FnOnce(&mut SelectionTable) -> T) -> T {
        f(&mut self.inner.lock())
    }
}
