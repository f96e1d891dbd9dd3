use crate::sentence::{Budget, Sentence};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Item that a [`Buffer`] can hold: one slot per key, ordered by budget.
pub trait Memorable {
    fn key(&self) -> &str;
    fn budget(&self) -> Budget;
    /// Folds a newer item with the same key into this one.
    fn merge(&mut self, incoming: Self, policy: &MergePolicy);
}

/// Parameters for folding duplicates together.
#[derive(Debug, Clone, Copy)]
pub struct MergePolicy {
    /// Evidential horizon used by revision.
    pub k: f64,
    pub evidential_base_length: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            k: 1.0,
            evidential_base_length: 20,
        }
    }
}

impl Memorable for Sentence {
    fn key(&self) -> &str {
        self.statement.as_str()
    }

    fn budget(&self) -> Budget {
        Sentence::budget(self)
    }

    fn merge(&mut self, incoming: Sentence, policy: &MergePolicy) {
        if self.punctuation != incoming.punctuation {
            if incoming.evidence.confidence >= self.evidence.confidence {
                *self = incoming;
            }
            return;
        }
        if self.stamp.overlaps(&incoming.stamp) {
            // Revising would count shared evidence twice.
            if incoming.evidence.confidence > self.evidence.confidence {
                *self = incoming;
            }
            return;
        }
        let base = incoming
            .stamp
            .merge_bases(&self.stamp, policy.evidential_base_length);
        self.evidence = self.evidence.revise(&incoming.evidence, policy.k);
        self.stamp.evidential_base = base;
        self.stamp.id = incoming.stamp.id;
        self.stamp.creation_time = self.stamp.creation_time.max(incoming.stamp.creation_time);
        self.stamp.occurrence_time = match (self.stamp.occurrence_time, incoming.stamp.occurrence_time) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (None, None) => None,
            (a, b) => a.or(b),
        };
    }
}

#[derive(Debug, Clone, Copy)]
struct PriorityKey {
    priority: f64,
    seq: u64,
}

impl PartialEq for PriorityKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriorityKey {}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    item: T,
    budget: Budget,
    order: PriorityKey,
}

/// Bounded container ranked by descending priority, one slot per key.
///
/// Lookup by key is a hash map; ordering is a B-tree on (priority, arrival),
/// so `take`, `peek` and eviction are logarithmic. Ties in priority go to the
/// most recent arrival.
#[derive(Debug, Clone)]
pub struct Buffer<T: Memorable> {
    capacity: usize,
    slots: HashMap<String, Slot<T>>,
    order: BTreeMap<PriorityKey, String>,
    seq: u64,
    policy: MergePolicy,
}

impl<T: Memorable> Buffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, MergePolicy::default())
    }

    pub fn with_policy(capacity: usize, policy: MergePolicy) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: HashMap::new(),
            order: BTreeMap::new(),
            seq: 0,
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: MergePolicy) {
        self.policy = policy;
    }

    fn next_order(&mut self, priority: f64) -> PriorityKey {
        self.seq += 1;
        PriorityKey {
            priority,
            seq: self.seq,
        }
    }

    /// Inserts `item`, or revises the existing item with the same key.
    ///
    /// Returns the item evicted to stay within capacity, which may be the
    /// one just inserted if it ranks lowest.
    pub fn put_new(&mut self, item: T) -> Option<T> {
        let key = item.key().to_string();
        if let Some(mut slot) = self.slots.remove(&key) {
            self.order.remove(&slot.order);
            slot.item.merge(item, &self.policy);
            slot.budget = slot.item.budget();
            slot.order = self.next_order(slot.budget.priority);
            self.order.insert(slot.order, key.clone());
            self.slots.insert(key, slot);
            return None;
        }

        let budget = item.budget();
        let order = self.next_order(budget.priority);
        self.order.insert(order, key.clone());
        self.slots.insert(key, Slot { item, budget, order });

        if self.slots.len() > self.capacity {
            let evicted = self.take_lowest();
            if let Some(evicted) = &evicted {
                log::debug!("buffer full, evicted {}", evicted.key());
            }
            return evicted;
        }
        None
    }

    /// Removes and returns the highest-priority item.
    pub fn take(&mut self) -> Option<T> {
        let (_, key) = self.order.pop_last()?;
        self.slots.remove(&key).map(|slot| slot.item)
    }

    pub fn take_lowest(&mut self) -> Option<T> {
        let (_, key) = self.order.pop_first()?;
        self.slots.remove(&key).map(|slot| slot.item)
    }

    pub fn take_key(&mut self, key: &str) -> Option<T> {
        let slot = self.slots.remove(key)?;
        self.order.remove(&slot.order);
        Some(slot.item)
    }

    /// Highest-priority item, or the item stored under `key`.
    pub fn peek(&self, key: Option<&str>) -> Option<&T> {
        match key {
            Some(key) => self.slots.get(key).map(|slot| &slot.item),
            None => {
                let (_, key) = self.order.last_key_value()?;
                self.slots.get(key).map(|slot| &slot.item)
            }
        }
    }

    pub fn budget_of(&self, key: &str) -> Option<Budget> {
        self.slots.get(key).map(|slot| slot.budget)
    }

    /// Items from highest to lowest priority.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order
            .values()
            .rev()
            .filter_map(|key| self.slots.get(key).map(|slot| &slot.item))
    }

    /// Decays every priority by the forgetting `rate`.
    pub fn forget(&mut self, rate: f64) {
        let keys: Vec<String> = self.order.values().cloned().collect();
        self.order.clear();
        for key in keys {
            let order = {
                self.seq += 1;
                self.seq
            };
            if let Some(slot) = self.slots.get_mut(&key) {
                slot.budget.decay(rate);
                slot.order = PriorityKey {
                    priority: slot.budget.priority,
                    seq: order,
                };
                self.order.insert(slot.order, key);
            }
        }
    }

    /// Removes every item matching `predicate`, returning them.
    pub fn drain_where<F: FnMut(&T) -> bool>(&mut self, mut predicate: F) -> Vec<T> {
        let doomed: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| predicate(&slot.item))
            .map(|(key, _)| key.clone())
            .collect();
        doomed
            .into_iter()
            .filter_map(|key| self.take_key(&key))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }
}
