use crate::config::EvolutionConfig;
use crate::contingency::{
    Contingency, DIRECTION_VARIABLE, with_operation_argument, with_predicate,
};
use crate::error::{NarsError, Result};
use crate::evidence::EvidentialValue;
use crate::mutation::{ParamRange, mutate_float, mutate_int};
use crate::sensorimotor::{Direction, SensorimotorVocabulary};
use crate::term::{Term, TermArena, VariableKind};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

const TRUTH_RANGE: ParamRange = ParamRange::new(0.0, 1.0);
const MIN_EVOLVED_CONFIDENCE: f64 = 0.0001;
const MAX_EVOLVED_CONFIDENCE: f64 = 0.9999;

/// Which parts of an agent are innate, which are evolved, and whether the
/// agent learns during its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EvolutionMode {
    NoContingencyFixedPersonalityLearning,
    NoContingencyRandomPersonalityLearning,
    EvolveContingenciesFixedPersonalityNoLearning,
    EvolveContingenciesRandomPersonalityNoLearning,
    EvolveContingenciesFixedPersonalityLearning,
    EvolveContingenciesRandomPersonalityLearning,
    EvolvePersonalityLearning,
    EvolvePersonalityAndContingenciesLearning,
    #[default]
    EvolvePersonalityAndContingenciesNoLearning,
}

impl EvolutionMode {
    pub const ALL: [EvolutionMode; 9] = [
        EvolutionMode::NoContingencyFixedPersonalityLearning,
        EvolutionMode::NoContingencyRandomPersonalityLearning,
        EvolutionMode::EvolveContingenciesFixedPersonalityNoLearning,
        EvolutionMode::EvolveContingenciesRandomPersonalityNoLearning,
        EvolutionMode::EvolveContingenciesFixedPersonalityLearning,
        EvolutionMode::EvolveContingenciesRandomPersonalityLearning,
        EvolutionMode::EvolvePersonalityLearning,
        EvolutionMode::EvolvePersonalityAndContingenciesLearning,
        EvolutionMode::EvolvePersonalityAndContingenciesNoLearning,
    ];

    /// Every individual draws a fresh random personality.
    pub fn random_personality(self) -> bool {
        matches!(
            self,
            EvolutionMode::NoContingencyRandomPersonalityLearning
                | EvolutionMode::EvolveContingenciesRandomPersonalityNoLearning
                | EvolutionMode::EvolveContingenciesRandomPersonalityLearning
        )
    }

    /// Agents run temporal induction during their lifetime.
    pub fn use_learning(self) -> bool {
        matches!(
            self,
            EvolutionMode::NoContingencyFixedPersonalityLearning
                | EvolutionMode::NoContingencyRandomPersonalityLearning
                | EvolutionMode::EvolveContingenciesFixedPersonalityLearning
                | EvolutionMode::EvolveContingenciesRandomPersonalityLearning
                | EvolutionMode::EvolvePersonalityLearning
                | EvolutionMode::EvolvePersonalityAndContingenciesLearning
        )
    }

    pub fn evolve_personality(self) -> bool {
        matches!(
            self,
            EvolutionMode::EvolvePersonalityLearning
                | EvolutionMode::EvolvePersonalityAndContingenciesLearning
                | EvolutionMode::EvolvePersonalityAndContingenciesNoLearning
        )
    }

    pub fn use_and_evolve_contingencies(self) -> bool {
        matches!(
            self,
            EvolutionMode::EvolveContingenciesFixedPersonalityNoLearning
                | EvolutionMode::EvolveContingenciesRandomPersonalityNoLearning
                | EvolutionMode::EvolveContingenciesFixedPersonalityLearning
                | EvolutionMode::EvolveContingenciesRandomPersonalityLearning
                | EvolutionMode::EvolvePersonalityAndContingenciesLearning
                | EvolutionMode::EvolvePersonalityAndContingenciesNoLearning
        )
    }
}

/// The nine evolvable hyperparameters of a reasoner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    /// Evidential horizon.
    K,
    /// Activation an operation needs before it is executed.
    DecisionThreshold,
    AnticipationWindow,
    ForgettingRate,
    EventBufferCapacity,
    TableCapacity,
    EvidentialBaseLength,
    TimeProjectionEvent,
    TimeProjectionGoal,
}

impl Personality {
    pub const COUNT: usize = 9;

    pub const ALL: [Personality; Personality::COUNT] = [
        Personality::K,
        Personality::DecisionThreshold,
        Personality::AnticipationWindow,
        Personality::ForgettingRate,
        Personality::EventBufferCapacity,
        Personality::TableCapacity,
        Personality::EvidentialBaseLength,
        Personality::TimeProjectionEvent,
        Personality::TimeProjectionGoal,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Personality::K => "k",
            Personality::DecisionThreshold => "T",
            Personality::AnticipationWindow => "anticipation_window",
            Personality::ForgettingRate => "forgetting_rate",
            Personality::EventBufferCapacity => "event_buffer_capacity",
            Personality::TableCapacity => "table_capacity",
            Personality::EvidentialBaseLength => "evidential_base_length",
            Personality::TimeProjectionEvent => "time_projection_event",
            Personality::TimeProjectionGoal => "time_projection_goal",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Personality::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| NarsError::UnknownParameter(name.to_string()))
    }

    pub fn range(self) -> ParamRange {
        match self {
            Personality::K => ParamRange::new(1.0, 10.0),
            Personality::DecisionThreshold => ParamRange::new(0.51, 1.0),
            Personality::AnticipationWindow => ParamRange::new(1.0, 30.0),
            Personality::ForgettingRate => ParamRange::new(1.0, 250.0),
            Personality::EventBufferCapacity => ParamRange::new(3.0, 20.0),
            Personality::TableCapacity => ParamRange::new(1.0, 20.0),
            Personality::EvidentialBaseLength => ParamRange::new(1.0, 50.0),
            Personality::TimeProjectionEvent => ParamRange::new(0.0000001, 10.0),
            Personality::TimeProjectionGoal => ParamRange::new(0.0000001, 10.0),
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Personality::AnticipationWindow
                | Personality::EventBufferCapacity
                | Personality::TableCapacity
                | Personality::EvidentialBaseLength
        )
    }

    pub fn default_value(self) -> f64 {
        match self {
            Personality::K => 1.0,
            Personality::DecisionThreshold => 0.51,
            Personality::AnticipationWindow => 5.0,
            Personality::ForgettingRate => 10.0,
            Personality::EventBufferCapacity => 10.0,
            Personality::TableCapacity => 5.0,
            Personality::EvidentialBaseLength => 20.0,
            Personality::TimeProjectionEvent => 10.0,
            Personality::TimeProjectionGoal => 1.0,
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of every [`Personality`] parameter, indexed by `Personality::index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityParameters {
    values: [f64; Personality::COUNT],
}

impl Default for PersonalityParameters {
    fn default() -> Self {
        Self {
            values: Personality::ALL.map(Personality::default_value),
        }
    }
}

impl PersonalityParameters {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut params = Self::default();
        for p in Personality::ALL {
            let range = p.range();
            let value = if p.is_integral() {
                rng.gen_range(range.min as i64..=range.max as i64) as f64
            } else {
                rng.gen_range(range.min..range.max)
            };
            params.set(p, value);
        }
        params
    }

    pub fn get(&self, p: Personality) -> f64 {
        self.values[p.index()]
    }

    /// Stores `value` clamped into the parameter's range, rounded for
    /// integral parameters.
    pub fn set(&mut self, p: Personality, value: f64) {
        let value = p.range().clamp(value);
        self.values[p.index()] = if p.is_integral() { value.round() } else { value };
    }

    pub fn iter(&self) -> impl Iterator<Item = (Personality, f64)> + '_ {
        Personality::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    pub fn k(&self) -> f64 {
        self.get(Personality::K)
    }

    pub fn decision_threshold(&self) -> f64 {
        self.get(Personality::DecisionThreshold)
    }

    pub fn anticipation_window(&self) -> usize {
        self.get(Personality::AnticipationWindow) as usize
    }

    pub fn forgetting_rate(&self) -> f64 {
        self.get(Personality::ForgettingRate)
    }

    pub fn event_buffer_capacity(&self) -> usize {
        self.get(Personality::EventBufferCapacity) as usize
    }

    pub fn table_capacity(&self) -> usize {
        self.get(Personality::TableCapacity) as usize
    }

    pub fn evidential_base_length(&self) -> usize {
        self.get(Personality::EvidentialBaseLength) as usize
    }

    pub fn time_projection_event(&self) -> f64 {
        self.get(Personality::TimeProjectionEvent)
    }

    pub fn time_projection_goal(&self) -> f64 {
        self.get(Personality::TimeProjectionGoal)
    }
}

/// A belief or goal carried by a genome.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolvableSentence {
    pub statement: Term,
    pub evidence: EvidentialValue,
}

impl EvolvableSentence {
    pub fn new(statement: Term, evidence: EvidentialValue) -> Self {
        Self {
            statement,
            evidence,
        }
    }
}

/// Shared context for one population: the term arena, the sensorimotor
/// vocabulary built in it, and the evolution settings.
pub struct GenePool {
    pub arena: Arc<TermArena>,
    pub vocabulary: SensorimotorVocabulary,
    pub config: EvolutionConfig,
}

impl GenePool {
    pub fn new(arena: Arc<TermArena>, config: EvolutionConfig) -> Arc<Self> {
        let vocabulary = SensorimotorVocabulary::new(&arena);
        Arc::new(Self {
            arena,
            vocabulary,
            config,
        })
    }

    pub fn mode(&self) -> EvolutionMode {
        self.config.mode
    }

    pub fn ideal_goals(&self) -> Vec<EvolvableSentence> {
        vec![EvolvableSentence::new(
            self.vocabulary.energy_increasing().clone(),
            EvidentialValue::new(1.0, 0.99),
        )]
    }

    fn dependent_variable(&self) -> Term {
        self.arena.variable(DIRECTION_VARIABLE, VariableKind::Dependent)
    }
}

/// Innate beliefs, goals and hyperparameters of one agent.
#[derive(Clone)]
pub struct Genome {
    pool: Arc<GenePool>,
    beliefs: Vec<EvolvableSentence>,
    belief_keys: HashSet<String>,
    goals: Vec<EvolvableSentence>,
    personality: PersonalityParameters,
}

impl fmt::Debug for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genome")
            .field("beliefs", &self.beliefs)
            .field("goals", &self.goals)
            .field("personality", &self.personality)
            .finish()
    }
}

#[derive(Clone, Copy)]
enum StructuralEdit {
    Add,
    Remove,
    Modify,
    ToggleVariable,
}

impl Genome {
    pub fn new<R: Rng + ?Sized>(
        pool: Arc<GenePool>,
        beliefs: Option<Vec<EvolvableSentence>>,
        goals: Option<Vec<EvolvableSentence>>,
        personality: Option<PersonalityParameters>,
        rng: &mut R,
    ) -> Self {
        let mode = pool.mode();
        let personality = match personality {
            _ if mode.random_personality() => PersonalityParameters::random(rng),
            Some(personality) => personality,
            None if mode.evolve_personality() => PersonalityParameters::random(rng),
            None => PersonalityParameters::default(),
        };
        let goals = goals.unwrap_or_else(|| pool.ideal_goals());
        let mut genome = Self {
            pool,
            beliefs: Vec::new(),
            belief_keys: HashSet::new(),
            goals,
            personality,
        };

        if mode.use_and_evolve_contingencies() {
            match beliefs {
                Some(beliefs) => {
                    for belief in beliefs {
                        genome.add_belief(belief);
                    }
                }
                None => {
                    let max = genome.pool.config.max_initial_beliefs;
                    let count = if max > 1 { rng.gen_range(1..max) } else { 0 };
                    for _ in 0..count {
                        genome.add_random_belief(rng);
                    }
                }
            }
        }
        genome
    }

    /// Genome with no beliefs, ideal goals and a personality drawn the way
    /// `new` would draw it.
    fn blank<R: Rng + ?Sized>(pool: &Arc<GenePool>, rng: &mut R) -> Self {
        Self::new(Arc::clone(pool), Some(Vec::new()), None, None, rng)
    }

    /// Copy of this genome to seed a child. Under random-personality modes
    /// the child still draws its own personality.
    pub fn descendant<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self::new(
            Arc::clone(&self.pool),
            Some(self.beliefs.clone()),
            Some(self.goals.clone()),
            Some(self.personality),
            rng,
        )
    }

    pub fn pool(&self) -> &Arc<GenePool> {
        &self.pool
    }

    pub fn beliefs(&self) -> &[EvolvableSentence] {
        &self.beliefs
    }

    pub fn goals(&self) -> &[EvolvableSentence] {
        &self.goals
    }

    pub fn personality(&self) -> &PersonalityParameters {
        &self.personality
    }

    pub fn personality_mut(&mut self) -> &mut PersonalityParameters {
        &mut self.personality
    }

    pub fn belief_keys(&self) -> &HashSet<String> {
        &self.belief_keys
    }

    pub fn contains_belief(&self, key: &str) -> bool {
        self.belief_keys.contains(key)
    }

    /// Adds `belief` unless a belief with the same statement exists.
    pub fn add_belief(&mut self, belief: EvolvableSentence) -> bool {
        let key = belief.statement.to_canonical_string();
        if self.belief_keys.contains(&key) {
            log::warn!("genome already contains {key}");
            return false;
        }
        self.belief_keys.insert(key);
        self.beliefs.push(belief);
        true
    }

    /// Adds a random `((&/,S,M) =/> P)` belief with f in [0.5, 1).
    pub fn add_random_belief<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let vocab = &self.pool.vocabulary;
        let energy_chance = self.pool.config.energy_term_chance;
        let contingency = Contingency::new(
            Some(vocab.random_sensory_term(rng, energy_chance)),
            vocab.random_motor_term(rng),
            vocab.random_sensory_term(rng, energy_chance),
        );
        let statement = contingency.to_term(&self.pool.arena);
        let confidence: f64 = rng.gen_range(0.0..1.0);
        let evidence = EvidentialValue::new(
            rng.gen_range(0.5..1.0),
            confidence.clamp(MIN_EVOLVED_CONFIDENCE, MAX_EVOLVED_CONFIDENCE),
        );
        self.add_belief(EvolvableSentence::new(statement, evidence))
    }

    pub fn remove_random_belief<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.beliefs.is_empty() {
            return false;
        }
        let removed = self.beliefs.remove(rng.gen_range(0..self.beliefs.len()));
        self.belief_keys.remove(removed.statement.as_str());
        true
    }

    /// Replaces the antecedent, the operation or the consequent of a random
    /// belief. A replacement on one side of the antecedent/operation pair
    /// takes the direction variable if the other side has it.
    pub fn modify_random_belief<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        if self.beliefs.is_empty() {
            return Ok(false);
        }
        let idx = rng.gen_range(0..self.beliefs.len());
        let current = Contingency::decompose(&self.beliefs[idx].statement)?;
        let arena = &self.pool.arena;
        let vocab = &self.pool.vocabulary;
        let energy_chance = self.pool.config.energy_term_chance;

        let mut next = current.clone();
        match rng.gen_range(0..3) {
            0 => {
                let mut antecedent = vocab.random_sensory_term(rng, energy_chance);
                if current.operation.contains_variable() {
                    antecedent = with_predicate(arena, &antecedent, self.pool.dependent_variable())?;
                }
                next.antecedent = Some(antecedent);
            }
            1 => {
                let mut operation = vocab.random_motor_term(rng);
                if current
                    .antecedent
                    .as_ref()
                    .is_some_and(Term::contains_variable)
                {
                    operation =
                        with_operation_argument(arena, &operation, self.pool.dependent_variable())?;
                }
                next.operation = operation;
            }
            _ => next.consequent = vocab.random_sensory_term(rng, energy_chance),
        }
        let statement = next.to_term(arena);
        Ok(self.replace_statement(idx, statement))
    }

    /// Flips a random belief between its concrete form and the form with
    /// the direction variable in both antecedent and operation.
    pub fn toggle_variable_random_belief<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        if self.beliefs.is_empty() {
            return Ok(false);
        }
        let idx = rng.gen_range(0..self.beliefs.len());
        let statement = &self.beliefs[idx].statement;
        let current = Contingency::decompose(statement)?;
        let arena = &self.pool.arena;
        let next = if current.is_variablized() {
            let direction = arena.atomic(Direction::random(rng).as_str());
            current.concretize(arena, &direction)?
        } else if current.is_concrete() {
            current.variablize(arena)?
        } else {
            return Err(NarsError::shape(
                statement,
                "antecedent and operation disagree on the direction variable",
            ));
        };
        let statement = next.to_term(arena);
        Ok(self.replace_statement(idx, statement))
    }

    /// Swaps the statement of belief `idx`, keeping the key set in step.
    /// Collisions with another belief leave the genome unchanged.
    fn replace_statement(&mut self, idx: usize, statement: Term) -> bool {
        let old_key = self.beliefs[idx].statement.to_canonical_string();
        let new_key = statement.to_canonical_string();
        if new_key == old_key {
            return false;
        }
        if self.belief_keys.contains(&new_key) {
            log::debug!("mutation of {old_key} collides with {new_key}");
            return false;
        }
        self.belief_keys.remove(&old_key);
        self.belief_keys.insert(new_key);
        self.beliefs[idx].statement = statement;
        true
    }

    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mode = self.pool.mode();
        if mode.use_and_evolve_contingencies() && rng.r#gen::<f64>() < self.pool.config.beliefs_chance {
            self.mutate_beliefs(rng);
        }
        if mode.evolve_personality() && rng.r#gen::<f64>() < self.pool.config.personality_chance {
            self.mutate_personality(rng);
        }
    }

    /// One structural edit (maybe), then truth-value drift on every belief.
    pub fn mutate_beliefs<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = self.pool.config.clone();
        if rng.r#gen::<f64>() < config.belief_content_chance {
            let mut edits = vec![
                (StructuralEdit::Add, config.odds.add),
                (StructuralEdit::Remove, config.odds.remove),
                (StructuralEdit::Modify, config.odds.modify),
            ];
            if config.allow_variables {
                edits.push((StructuralEdit::ToggleVariable, config.odds.toggle_variable));
            }
            if let Ok(dist) = WeightedIndex::new(edits.iter().map(|(_, w)| *w)) {
                let outcome = match edits[dist.sample(rng)].0 {
                    StructuralEdit::Add => Ok(self.add_random_belief(rng)),
                    StructuralEdit::Remove => Ok(self.remove_random_belief(rng)),
                    StructuralEdit::Modify => self.modify_random_belief(rng),
                    StructuralEdit::ToggleVariable => self.toggle_variable_random_belief(rng),
                };
                if let Err(e) = outcome {
                    log::warn!("structural mutation aborted: {e}");
                }
            }
        }

        if rng.r#gen::<f64>() < config.truth_values_chance {
            for belief in &mut self.beliefs {
                let f = mutate_float(rng, belief.evidence.frequency, TRUTH_RANGE, &config.truth_rates);
                let c = mutate_float(rng, belief.evidence.confidence, TRUTH_RANGE, &config.truth_rates);
                belief.evidence = EvidentialValue::new(
                    f,
                    c.clamp(MIN_EVOLVED_CONFIDENCE, MAX_EVOLVED_CONFIDENCE),
                );
            }
        }
    }

    pub fn mutate_personality<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let rates = self.pool.config.personality_rates;
        for p in Personality::ALL {
            let current = self.personality.get(p);
            let value = if p.is_integral() {
                mutate_int(rng, current as i64, p.range(), &rates) as f64
            } else {
                mutate_float(rng, current, p.range(), &rates)
            };
            self.personality.set(p, value);
        }
    }

    /// Two children by independent assortment: each belief slot and each
    /// personality parameter goes to one child or the other by coin flip.
    pub fn reproduce<R: Rng + ?Sized>(&self, other: &Genome, rng: &mut R) -> (Genome, Genome) {
        let mode = self.pool.mode();
        let mut first = Self::blank(&self.pool, rng);
        let mut second = Self::blank(&self.pool, rng);

        if mode.use_and_evolve_contingencies() {
            let longest = self.beliefs.len().max(other.beliefs.len());
            for i in 0..longest {
                let (to_first, to_second) = if rng.gen_bool(0.5) {
                    (self.beliefs.get(i), other.beliefs.get(i))
                } else {
                    (other.beliefs.get(i), self.beliefs.get(i))
                };
                if let Some(belief) = to_first {
                    first.add_belief(belief.clone());
                }
                if let Some(belief) = to_second {
                    second.add_belief(belief.clone());
                }
            }
        }

        if mode.evolve_personality() {
            for p in Personality::ALL {
                let (a, b) = if rng.gen_bool(0.5) {
                    (self.personality.get(p), other.personality.get(p))
                } else {
                    (other.personality.get(p), self.personality.get(p))
                };
                first.personality.set(p, a);
                second.personality.set(p, b);
            }
        }

        (first, second)
    }

    /// Number of belief statements held by exactly one of the two genomes.
    pub fn hamming_distance(&self, other: &Genome) -> f64 {
        self.belief_keys.symmetric_difference(&other.belief_keys).count() as f64
    }

    pub fn to_record(&self) -> GenomeRecord {
        let record = |s: &EvolvableSentence| SentenceRecord {
            statement: s.statement.to_canonical_string(),
            evidence: s.evidence,
        };
        GenomeRecord {
            beliefs: self.beliefs.iter().map(record).collect(),
            goals: self.goals.iter().map(record).collect(),
            personality: self.personality,
        }
    }

    /// Rebuilds a genome exactly as recorded, parsing statements into the
    /// pool's arena.
    pub fn from_record(pool: Arc<GenePool>, record: &GenomeRecord) -> Result<Self> {
        let parse = |s: &SentenceRecord| -> Result<EvolvableSentence> {
            Ok(EvolvableSentence::new(pool.arena.parse(&s.statement)?, s.evidence))
        };
        let beliefs = record.beliefs.iter().map(parse).collect::<Result<Vec<_>>>()?;
        let goals = record.goals.iter().map(parse).collect::<Result<Vec<_>>>()?;
        let mut genome = Self {
            pool: Arc::clone(&pool),
            beliefs: Vec::new(),
            belief_keys: HashSet::new(),
            goals,
            personality: record.personality,
        };
        for belief in beliefs {
            genome.add_belief(belief);
        }
        Ok(genome)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.to_record())?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(pool: Arc<GenePool>, path: P) -> Result<Self> {
        let file = File::open(path)?;
        let record: GenomeRecord = serde_json::from_reader(BufReader::new(file))?;
        Self::from_record(pool, &record)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub statement: String,
    pub evidence: EvidentialValue,
}

/// Serialized form of a [`Genome`], with statements as canonical strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub beliefs: Vec<SentenceRecord>,
    pub goals: Vec<SentenceRecord>,
    pub personality: PersonalityParameters,
}
