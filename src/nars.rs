use crate::buffer::{Buffer, MergePolicy};
use crate::config::NarsConfig;
use crate::contingency::Contingency;
use crate::error::Result;
use crate::evidence::EvidentialValue;
use crate::genome::{Genome, PersonalityParameters};
use crate::sentence::{Punctuation, Sentence, StampSource, parse_sentence};
use crate::temporal::{InductionContext, TemporalModule};
use crate::term::{Copula, Term, TermArena};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Events whose projected confidence falls below this are forgotten.
const MIN_PROJECTED_CONFIDENCE: f64 = 0.01;

/// One reasoning agent: memory, procedural knowledge, goals and the
/// temporal module, advanced one cycle at a time by its host.
pub struct Nars {
    arena: Arc<TermArena>,
    config: NarsConfig,
    personality: PersonalityParameters,
    use_learning: bool,
    current_cycle: i64,
    stamps: StampSource,
    global: Buffer<Sentence>,
    temporal: TemporalModule,
    /// Predictive implications keyed by their consequent.
    procedural: HashMap<Term, Buffer<Sentence>>,
    goals: Buffer<Sentence>,
    latest_events: HashMap<Term, Sentence>,
    activations: HashMap<Term, f64>,
    /// For each anticipated term, the implications that predicted it, oldest first.
    anticipated_by: HashMap<Term, VecDeque<Term>>,
}

impl Nars {
    /// Builds a reasoner whose personality, innate beliefs and goals come
    /// from `genome`.
    pub fn new(arena: Arc<TermArena>, config: NarsConfig, genome: &Genome) -> Self {
        let personality = *genome.personality();
        let policy = MergePolicy {
            k: personality.k(),
            evidential_base_length: personality.evidential_base_length(),
        };
        let temporal = TemporalModule::new(
            personality.event_buffer_capacity(),
            personality.anticipation_window(),
            personality.k(),
            config.generalization.then_some(config.generalization_confidence),
        );

        let mut nars = Self {
            arena,
            global: Buffer::with_policy(config.global_buffer_capacity, policy),
            goals: Buffer::with_policy(config.goal_buffer_capacity, policy),
            config,
            personality,
            use_learning: genome.pool().mode().use_learning(),
            current_cycle: 0,
            stamps: StampSource::new(),
            temporal,
            procedural: HashMap::new(),
            latest_events: HashMap::new(),
            activations: HashMap::new(),
            anticipated_by: HashMap::new(),
        };

        for belief in genome.beliefs() {
            let stamp = nars.stamps.stamp(0, None);
            nars.route(Sentence::judgment(belief.statement.clone(), belief.evidence, stamp));
        }
        for goal in genome.goals() {
            let stamp = nars.stamps.stamp(0, None);
            nars.goals
                .put_new(Sentence::goal(goal.statement.clone(), goal.evidence, stamp));
        }
        log::info!(
            "reasoner ready with {} implications and {} goals",
            nars.implications().count(),
            nars.goals.len()
        );
        nars
    }

    pub fn arena(&self) -> &Arc<TermArena> {
        &self.arena
    }

    pub fn config(&self) -> &NarsConfig {
        &self.config
    }

    pub fn personality(&self) -> &PersonalityParameters {
        &self.personality
    }

    pub fn current_cycle(&self) -> i64 {
        self.current_cycle
    }

    pub fn decision_threshold(&self) -> f64 {
        self.personality.decision_threshold()
    }

    pub fn global(&self) -> &Buffer<Sentence> {
        &self.global
    }

    pub fn goals(&self) -> &Buffer<Sentence> {
        &self.goals
    }

    pub fn temporal(&self) -> &TemporalModule {
        &self.temporal
    }

    pub fn procedural_table(&self, consequent: &Term) -> Option<&Buffer<Sentence>> {
        self.procedural.get(consequent)
    }

    /// Every stored predictive implication.
    pub fn implications(&self) -> impl Iterator<Item = &Sentence> + '_ {
        self.procedural.values().flat_map(Buffer::iter)
    }

    pub fn latest_event(&self, term: &Term) -> Option<&Sentence> {
        self.latest_events.get(term)
    }

    pub fn activations(&self) -> &HashMap<Term, f64> {
        &self.activations
    }

    /// Goals go straight to goal memory; judgments are queued for the next
    /// cycle. Returns whatever the receiving buffer evicted to make room.
    pub fn submit_input(&mut self, sentence: Sentence) -> Option<Sentence> {
        log::trace!("input {sentence}");
        if sentence.is_goal() {
            self.goals.put_new(sentence)
        } else {
            self.global.put_new(sentence)
        }
    }

    /// Reports `term` as observed now.
    pub fn sense(&mut self, term: Term, evidence: EvidentialValue) {
        let stamp = self.stamps.stamp(self.current_cycle, Some(self.current_cycle));
        self.submit_input(Sentence::judgment(term, evidence, stamp));
    }

    /// Parses and submits one Narsese sentence. Missing truth values fall
    /// back to the configured defaults.
    pub fn input_narsese(&mut self, text: &str) -> Result<()> {
        let parsed = parse_sentence(&self.arena, text)?;
        let now = self.current_cycle;
        let stamp = self.stamps.stamp(now, parsed.is_event.then_some(now));
        let sentence = match parsed.punctuation {
            Punctuation::Judgment => Sentence::judgment(
                parsed.statement,
                parsed.evidence.unwrap_or(self.config.default_judgment),
                stamp,
            ),
            Punctuation::Goal => Sentence::goal(
                parsed.statement,
                parsed.evidence.unwrap_or(self.config.default_goal),
                stamp,
            ),
        };
        self.submit_input(sentence);
        Ok(())
    }

    /// Records that `operation` was executed and anticipates every consequent
    /// an applicable implication predicts for it.
    pub fn report_operation(&mut self, operation: &Term) {
        self.sense(
            operation.clone(),
            EvidentialValue::new(1.0, self.config.sensation_confidence),
        );

        let mut expected = Vec::new();
        for implication in self.implications() {
            let Ok(rule) = Contingency::decompose(&implication.statement) else {
                continue;
            };
            let Some(bound) = self.bind_to_operation(&rule, operation) else {
                continue;
            };
            if self.antecedent_holds(&bound) {
                expected.push((bound.consequent, implication.statement.clone()));
            }
        }
        for (consequent, source) in expected {
            log::debug!("{operation} should bring about {consequent}");
            self.temporal.anticipate(consequent.clone());
            self.anticipated_by.entry(consequent).or_default().push_back(source);
        }
    }

    /// Advances the reasoner by one cycle.
    pub fn run_cycle(&mut self) {
        let mut incoming = Vec::with_capacity(self.global.len());
        while let Some(sentence) = self.global.take() {
            incoming.push(sentence);
        }
        for sentence in incoming {
            self.route(sentence);
        }

        // Ticks after routing so this cycle's input can still confirm.
        let disappointed = {
            let mut ctx = InductionContext {
                arena: &self.arena,
                global: &mut self.global,
                stamps: &mut self.stamps,
                now: self.current_cycle,
                evidential_base_length: self.personality.evidential_base_length(),
            };
            self.temporal.update_anticipations(&mut ctx)
        };
        for term in disappointed {
            self.weaken_source(&term);
        }

        self.forget();
        self.recompute_activations();
        self.current_cycle += 1;
    }

    /// Desire to execute `term`, 0.0 when no goal recommends it.
    pub fn goal_activation(&self, term: &Term) -> f64 {
        self.activations.get(term).copied().unwrap_or(0.0)
    }

    /// The most activated of `operations`, if it reaches the decision threshold.
    pub fn best_operation(&self, operations: &[Term]) -> Option<(Term, f64)> {
        let threshold = self.decision_threshold();
        operations
            .iter()
            .map(|op| (op, self.goal_activation(op)))
            .filter(|(_, activation)| *activation >= threshold)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(op, activation)| (op.clone(), activation))
    }

    fn route(&mut self, sentence: Sentence) {
        if sentence.is_goal() {
            self.goals.put_new(sentence);
            return;
        }
        if sentence.is_eternal() {
            match (sentence.statement.copula(), sentence.statement.predicate()) {
                (Some(Copula::PredictiveImplication), Some(consequent)) => {
                    let consequent = consequent.clone();
                    self.store_implication(consequent, sentence);
                }
                _ => log::trace!("no rule consumes {}", sentence.statement),
            }
            return;
        }

        let statement = sentence.statement.clone();
        let positive = sentence.evidence.frequency > 0.5;
        if positive && self.temporal.does_anticipate(&statement) {
            log::debug!("anticipation of {statement} confirmed");
            self.temporal.remove_anticipations(&statement);
            self.anticipated_by.remove(&statement);
        }

        let newer = self
            .latest_events
            .get(&statement)
            .is_none_or(|known| known.occurrence_time() <= sentence.occurrence_time());
        if newer {
            self.latest_events.insert(statement, sentence.clone());
        }

        if self.use_learning && positive {
            let mut ctx = InductionContext {
                arena: &self.arena,
                global: &mut self.global,
                stamps: &mut self.stamps,
                now: self.current_cycle,
                evidential_base_length: self.personality.evidential_base_length(),
            };
            self.temporal.put_new(sentence, &mut ctx);
        }
    }

    fn store_implication(&mut self, consequent: Term, implication: Sentence) {
        let capacity = self.personality.table_capacity();
        let policy = *self.global.policy();
        let table = self
            .procedural
            .entry(consequent)
            .or_insert_with(|| Buffer::with_policy(capacity, policy));
        if let Some(evicted) = table.put_new(implication) {
            log::debug!("procedural table full, dropped {}", evicted.statement);
        }
    }

    /// Revises the oldest implication that predicted `term` with one piece
    /// of negative evidence.
    fn weaken_source(&mut self, term: &Term) {
        let Some(sources) = self.anticipated_by.get_mut(term) else {
            return;
        };
        let source = sources.pop_front();
        if sources.is_empty() {
            self.anticipated_by.remove(term);
        }
        let Some(source) = source else {
            return;
        };
        let Some(table) = self.procedural.get_mut(term) else {
            return;
        };
        if !table.contains(source.as_str()) {
            return;
        }
        let unit = EvidentialValue::unit_confidence(self.personality.k());
        let stamp = self.stamps.stamp(self.current_cycle, None);
        log::debug!("weakening {source}");
        table.put_new(Sentence::judgment(source, EvidentialValue::new(0.0, unit), stamp));
    }

    fn project(&self, sentence: &Sentence, horizon: f64) -> EvidentialValue {
        match sentence.occurrence_time() {
            Some(t) => sentence.evidence.project(self.current_cycle - t, horizon),
            None => sentence.evidence,
        }
    }

    fn forget(&mut self) {
        let now = self.current_cycle;
        let event_horizon = self.personality.time_projection_event();
        self.latest_events.retain(|_, event| {
            event.occurrence_time().is_none_or(|t| {
                event.evidence.project(now - t, event_horizon).confidence >= MIN_PROJECTED_CONFIDENCE
            })
        });

        let goal_horizon = self.personality.time_projection_goal();
        self.goals.drain_where(|goal| {
            goal.occurrence_time().is_some_and(|t| {
                goal.evidence.project(now - t, goal_horizon).confidence < MIN_PROJECTED_CONFIDENCE
            })
        });
        self.goals.forget(self.personality.forgetting_rate());
    }

    /// `rule` instantiated for `operation`, if it applies to it.
    fn bind_to_operation(&self, rule: &Contingency, operation: &Term) -> Option<Contingency> {
        if rule.is_variablized() {
            let argument = operation.subject()?.subterms().get(1)?;
            rule.concretize(&self.arena, argument)
                .ok()
                .filter(|bound| &bound.operation == operation)
        } else {
            (&rule.operation == operation).then(|| rule.clone())
        }
    }

    fn antecedent_holds(&self, rule: &Contingency) -> bool {
        let Some(antecedent) = &rule.antecedent else {
            return true;
        };
        self.latest_events.get(antecedent).is_some_and(|event| {
            self.project(event, self.personality.time_projection_event())
                .expectation()
                > 0.5
        })
    }

    /// Concrete operations `rule` can recommend right now, each with the
    /// projected evidence of the context it was bound against.
    fn bindings(&self, rule: &Contingency) -> Vec<(Term, Option<EvidentialValue>)> {
        let horizon = self.personality.time_projection_event();
        let Some(antecedent) = &rule.antecedent else {
            return if rule.operation.contains_variable() {
                Vec::new()
            } else {
                vec![(rule.operation.clone(), None)]
            };
        };

        if rule.is_variablized() {
            let (Some(subject), Some(copula)) = (antecedent.subject(), antecedent.copula()) else {
                return Vec::new();
            };
            return self
                .latest_events
                .values()
                .filter(|event| {
                    event.statement.copula() == Some(copula)
                        && event.statement.subject() == Some(subject)
                })
                .filter_map(|event| {
                    let place = event.statement.predicate().filter(|p| p.is_atomic())?;
                    let bound = rule.concretize(&self.arena, place).ok()?;
                    Some((bound.operation, Some(self.project(event, horizon))))
                })
                .collect();
        }

        match self.latest_events.get(antecedent) {
            Some(event) if rule.is_concrete() || !rule.operation.contains_variable() => {
                vec![(rule.operation.clone(), Some(self.project(event, horizon)))]
            }
            _ => Vec::new(),
        }
    }

    fn recompute_activations(&mut self) {
        let goal_horizon = self.personality.time_projection_goal();
        let mut updates = Vec::new();
        for goal in self.goals.iter() {
            let Some(table) = self.procedural.get(&goal.statement) else {
                continue;
            };
            let desire = self.project(goal, goal_horizon);
            for implication in table.iter() {
                let Ok(rule) = Contingency::decompose(&implication.statement) else {
                    continue;
                };
                let deduced = desire.deduction(&implication.evidence);
                for (operation, context) in self.bindings(&rule) {
                    let evidence = match context {
                        Some(context) => deduced.intersection(&context),
                        None => deduced,
                    };
                    updates.push((operation, evidence.expectation()));
                }
            }
        }

        self.activations.clear();
        for (operation, activation) in updates {
            let slot = self.activations.entry(operation).or_insert(0.0);
            *slot = slot.max(activation);
        }
    }
}
