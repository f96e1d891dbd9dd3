use crate::buffer::Buffer;
use crate::contingency::Contingency;
use crate::evidence::EvidentialValue;
use crate::sentence::{Sentence, Stamp, StampSource};
use crate::term::{Connector, Copula, Term, TermArena};
use std::collections::HashMap;

/// Everything the temporal module needs from its owning reasoner while
/// deriving: where terms are interned, where results go, and the clock.
pub struct InductionContext<'a> {
    pub arena: &'a TermArena,
    pub global: &'a mut Buffer<Sentence>,
    pub stamps: &'a mut StampSource,
    pub now: i64,
    pub evidential_base_length: usize,
}

impl InductionContext<'_> {
    fn derived_stamp(&mut self, parents: &[&Stamp], occurrence_time: Option<i64>) -> Stamp {
        let mut stamp = self.stamps.stamp(self.now, occurrence_time);
        let mut base: Vec<u64> = Vec::new();
        for parent in parents {
            let merged = Stamp {
                evidential_base: base,
                ..stamp.clone()
            };
            base = merged.merge_bases(parent, self.evidential_base_length);
        }
        stamp.evidential_base = base;
        stamp
    }
}

/// `(&/,A,B)` holding at A's time, with the gap between them as interval.
pub fn temporal_intersection(ctx: &mut InductionContext<'_>, a: &Sentence, b: &Sentence) -> Sentence {
    let (ta, tb) = (
        a.occurrence_time().unwrap_or(ctx.now),
        b.occurrence_time().unwrap_or(ctx.now),
    );
    let statement = ctx.arena.compound_with_intervals(
        Connector::SequentialConjunction,
        vec![a.statement.clone(), b.statement.clone()],
        vec![tb - ta],
    );
    let stamp = ctx.derived_stamp(&[&a.stamp, &b.stamp], Some(ta));
    Sentence::judgment(statement, a.evidence.intersection(&b.evidence), stamp)
}

/// Eternal `(conj =/> C)` learned from `conj` being followed by `c`.
pub fn temporal_induction(
    ctx: &mut InductionContext<'_>,
    conjunction: &Sentence,
    c: &Sentence,
    k: f64,
) -> Sentence {
    let gap = c.occurrence_time().unwrap_or(ctx.now) - conjunction.occurrence_time().unwrap_or(ctx.now);
    let statement = ctx.arena.statement_with_interval(
        conjunction.statement.clone(),
        c.statement.clone(),
        Copula::PredictiveImplication,
        gap,
    );
    let stamp = ctx.derived_stamp(&[&conjunction.stamp, &c.stamp], None);
    Sentence::judgment(statement, conjunction.evidence.induction(&c.evidence, k), stamp)
}

/// Rewrites a concrete `((&/,(s --> d),((*,{SELF},d) --> v)) =/> P)` into its
/// direction-variable form. `None` when the directions differ or the
/// implication has another shape.
pub fn generalize(
    ctx: &mut InductionContext<'_>,
    implication: &Sentence,
    confidence: f64,
) -> Option<Sentence> {
    let general = Contingency::decompose(&implication.statement)
        .ok()?
        .generalize(ctx.arena)?;
    let statement = general.to_term(ctx.arena);
    let stamp = ctx.derived_stamp(&[&implication.stamp], None);
    Some(Sentence::judgment(
        statement,
        EvidentialValue::new(1.0, confidence),
        stamp,
    ))
}

/// A consequence expected to be observed within `remaining` cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Anticipation {
    pub term: Term,
    pub remaining: usize,
}

/// Sliding window over recent events that induces predictive implications
/// and tracks anticipated consequences.
#[derive(Debug, Clone)]
pub struct TemporalModule {
    capacity: usize,
    chain: Vec<Sentence>,
    anticipations: Vec<Anticipation>,
    counts: HashMap<Term, usize>,
    anticipation_window: usize,
    k: f64,
    generalization_confidence: Option<f64>,
}

impl TemporalModule {
    /// `generalization_confidence` of `None` disables generalization.
    pub fn new(
        capacity: usize,
        anticipation_window: usize,
        k: f64,
        generalization_confidence: Option<f64>,
    ) -> Self {
        Self {
            capacity: capacity.max(1),
            chain: Vec::with_capacity(capacity + 1),
            anticipations: Vec::new(),
            counts: HashMap::new(),
            anticipation_window,
            k,
            generalization_confidence,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Events oldest first.
    pub fn chain(&self) -> &[Sentence] {
        &self.chain
    }

    /// Inserts an event in occurrence order and, once three or more events
    /// are held, derives implications into the global buffer. Returns the
    /// oldest event if capacity was exceeded.
    pub fn put_new(&mut self, event: Sentence, ctx: &mut InductionContext<'_>) -> Option<Sentence> {
        let t = event.occurrence_time().unwrap_or(ctx.now);
        let pos = self
            .chain
            .partition_point(|e| e.occurrence_time().unwrap_or(ctx.now) <= t);
        self.chain.insert(pos, event);

        let evicted = (self.chain.len() > self.capacity).then(|| self.chain.remove(0));

        if self.chain.len() >= 3 {
            self.temporal_chaining(ctx);
        }
        evicted
    }

    /// For every A before B before C where only B is an operation and no two
    /// share evidence, derives `((&/,A,B) =/> C)` with unit evidence, plus its
    /// generalization. A and C may name the same statement.
    pub fn temporal_chaining(&self, ctx: &mut InductionContext<'_>) -> Vec<Sentence> {
        let n = self.chain.len();
        let unit = EvidentialValue::new(1.0, EvidentialValue::unit_confidence(self.k));
        let mut derived = Vec::new();

        for i in 0..n.saturating_sub(2) {
            let a = &self.chain[i];
            if a.statement.is_operation() || !a.statement.is_statement() {
                continue;
            }
            for j in i + 1..n - 1 {
                let b = &self.chain[j];
                if !b.statement.is_operation() {
                    continue;
                }
                for k in j + 1..n {
                    let c = &self.chain[k];
                    if c.statement.is_operation() || !c.statement.is_statement() {
                        continue;
                    }
                    if a.stamp.overlaps(&b.stamp) || a.stamp.overlaps(&c.stamp) || b.stamp.overlaps(&c.stamp) {
                        continue;
                    }

                    let conjunction = temporal_intersection(ctx, a, b);
                    let mut implication = temporal_induction(ctx, &conjunction, c, self.k);
                    implication.evidence = unit;
                    log::debug!("induced {}", implication.statement);

                    if let Some(confidence) = self.generalization_confidence {
                        if let Some(general) = generalize(ctx, &implication, confidence) {
                            log::debug!("generalized to {}", general.statement);
                            ctx.global.put_new(general.clone());
                            derived.push(general);
                        }
                    }
                    ctx.global.put_new(implication.clone());
                    derived.push(implication);
                }
            }
        }
        derived
    }

    /// Expects `term` to be observed within the anticipation window.
    pub fn anticipate(&mut self, term: Term) {
        *self.counts.entry(term.clone()).or_insert(0) += 1;
        self.anticipations.push(Anticipation {
            term,
            remaining: self.anticipation_window,
        });
    }

    /// Counts every anticipation down one cycle. Expired ones become
    /// zero-frequency events in the global buffer; their terms are returned.
    pub fn update_anticipations(&mut self, ctx: &mut InductionContext<'_>) -> Vec<Term> {
        let unit = EvidentialValue::unit_confidence(self.k);
        let mut disappointed = Vec::new();
        let mut i = self.anticipations.len();
        while i > 0 {
            i -= 1;
            let anticipation = &mut self.anticipations[i];
            anticipation.remaining = anticipation.remaining.saturating_sub(1);
            if anticipation.remaining > 0 {
                continue;
            }
            let expired = self.anticipations.remove(i);
            if let Some(count) = self.counts.get_mut(&expired.term) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&expired.term);
                }
            }
            log::debug!("disappointed by {}", expired.term);
            let stamp = ctx.stamps.stamp(ctx.now, Some(ctx.now));
            ctx.global.put_new(Sentence::judgment(
                expired.term.clone(),
                EvidentialValue::new(0.0, unit),
                stamp,
            ));
            disappointed.push(expired.term);
        }
        disappointed
    }

    pub fn does_anticipate(&self, term: &Term) -> bool {
        self.counts.contains_key(term)
    }

    pub fn anticipation_count(&self, term: &Term) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn anticipations(&self) -> &[Anticipation] {
        &self.anticipations
    }

    /// Cancels every pending anticipation of `term`.
    pub fn remove_anticipations(&mut self, term: &Term) {
        self.anticipations.retain(|a| &a.term != term);
        self.counts.remove(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        arena: TermArena,
        global: Buffer<Sentence>,
        stamps: StampSource,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                arena: TermArena::new(),
                global: Buffer::new(100),
                stamps: StampSource::new(),
            }
        }

        fn ctx(&mut self, now: i64) -> InductionContext<'_> {
            InductionContext {
                arena: &self.arena,
                global: &mut self.global,
                stamps: &mut self.stamps,
                now,
                evidential_base_length: 20,
            }
        }

        fn event(&mut self, text: &str, t: i64) -> Sentence {
            Sentence::judgment(
                self.arena.parse(text).unwrap(),
                EvidentialValue::new(1.0, 0.9),
                self.stamps.stamp(t, Some(t)),
            )
        }
    }

    fn times(module: &TemporalModule) -> Vec<i64> {
        module.chain().iter().filter_map(Sentence::occurrence_time).collect()
    }

    #[test]
    fn chain_stays_time_ordered_and_bounded() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(4, 5, 1.0, None);
        for (i, t) in [5, 1, 9, 3, 7, 2, 8].into_iter().enumerate() {
            let event = fx.event(&format!("(e{i} --> here)"), t);
            let remaining_before = times(&module);
            let evicted = module.put_new(event, &mut fx.ctx(10));
            assert!(module.len() <= 4);
            let now = times(&module);
            assert!(now.windows(2).all(|w| w[0] <= w[1]), "{now:?}");
            if let Some(evicted) = evicted {
                let et = evicted.occurrence_time().unwrap();
                assert!(now.iter().all(|t| *t >= et));
                assert!(remaining_before.len() == 4);
            }
        }
        assert_eq!(times(&module), vec![5, 7, 8, 9]);
    }

    #[test]
    fn induces_implication_around_an_operation() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(10, 5, 1.0, None);
        let a = fx.event("(grass --> p0x_p1y)", 1);
        let b = fx.event("((*,{SELF},p0x_p1y) --> eat)", 2);
        let c = fx.event("(ENERGY --> INCREASING)", 3);
        module.put_new(a, &mut fx.ctx(1));
        module.put_new(b, &mut fx.ctx(2));
        assert!(fx.global.is_empty());
        module.put_new(c, &mut fx.ctx(3));
        let key = "((&/,(grass --> p0x_p1y),((*,{SELF},p0x_p1y) --> eat)) =/> (ENERGY --> INCREASING))";
        let implication = fx.global.peek(Some(key)).expect("implication deposited");
        assert_eq!(implication.evidence.frequency, 1.0);
        assert_eq!(implication.evidence.confidence, 0.5);
        assert!(implication.is_eternal());
        assert_eq!(implication.statement.subject().unwrap().intervals(), &[1]);
        assert_eq!(fx.global.len(), 1);
    }

    #[test]
    fn no_induction_without_operation_in_the_middle() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(10, 5, 1.0, None);
        for (text, t) in [
            ("((*,{SELF},p0x_p1y) --> eat)", 1),
            ("(grass --> p0x_p1y)", 2),
            ("(ENERGY --> INCREASING)", 3),
        ] {
            let e = fx.event(text, t);
            module.put_new(e, &mut fx.ctx(t));
        }
        assert!(fx.global.is_empty());
    }

    #[test]
    fn generalization_adds_variable_rule_when_directions_match() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(10, 5, 1.0, Some(0.8));
        for (text, t) in [
            ("(grass --> p1x_p0y)", 1),
            ("((*,{SELF},p1x_p0y) --> move)", 2),
            ("(grass --> p0x_p0y)", 3),
        ] {
            let e = fx.event(text, t);
            module.put_new(e, &mut fx.ctx(t));
        }
        let general = fx
            .global
            .peek(Some("((&/,(grass --> #x),((*,{SELF},#x) --> move)) =/> (grass --> p0x_p0y))"))
            .expect("generalization deposited");
        assert_eq!(general.evidence.confidence, 0.8);
        assert_eq!(fx.global.len(), 2);
    }

    #[test]
    fn generalization_skipped_for_mismatched_directions() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(10, 5, 1.0, Some(0.8));
        for (text, t) in [
            ("(grass --> p1x_p0y)", 1),
            ("((*,{SELF},n1x_p0y) --> move)", 2),
            ("(grass --> p0x_p0y)", 3),
        ] {
            let e = fx.event(text, t);
            module.put_new(e, &mut fx.ctx(t));
        }
        assert_eq!(fx.global.len(), 1);
    }

    #[test]
    fn expired_anticipation_disappoints() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(10, 2, 1.0, None);
        let expected = fx.arena.parse("(ENERGY --> INCREASING)").unwrap();
        module.anticipate(expected.clone());
        module.anticipate(expected.clone());
        assert_eq!(module.anticipation_count(&expected), 2);

        assert!(module.update_anticipations(&mut fx.ctx(1)).is_empty());
        assert!(module.does_anticipate(&expected));
        let gone = module.update_anticipations(&mut fx.ctx(2));
        assert_eq!(gone.len(), 2);
        assert!(!module.does_anticipate(&expected));

        let disappointment = fx.global.peek(Some(expected.as_str())).unwrap();
        assert_eq!(disappointment.evidence.frequency, 0.0);
        assert_eq!(disappointment.occurrence_time(), Some(2));
    }

    #[test]
    fn confirmed_anticipation_is_cancelled() {
        let mut fx = Fixture::new();
        let mut module = TemporalModule::new(10, 1, 1.0, None);
        let expected = fx.arena.parse("(grass --> p0x_p0y)").unwrap();
        let other = fx.arena.parse("(water --> p0x_p0y)").unwrap();
        module.anticipate(expected.clone());
        module.anticipate(other.clone());
        module.remove_anticipations(&expected);
        assert!(!module.does_anticipate(&expected));
        let gone = module.update_anticipations(&mut fx.ctx(1));
        assert_eq!(gone, vec![other]);
        assert!(fx.global.peek(Some(expected.as_str())).is_none());
    }
}
