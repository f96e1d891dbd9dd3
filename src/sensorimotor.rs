use crate::term::{Connector, Copula, Term, TermArena};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Cell of the 3x3 neighbourhood around an agent, named by its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N1xN1y,
    P0xN1y,
    P1xN1y,
    N1xP0y,
    P0xP0y,
    P1xP0y,
    N1xP1y,
    P0xP1y,
    P1xP1y,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::N1xN1y,
        Direction::P0xN1y,
        Direction::P1xN1y,
        Direction::N1xP0y,
        Direction::P0xP0y,
        Direction::P1xP0y,
        Direction::N1xP1y,
        Direction::P0xP1y,
        Direction::P1xP1y,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::N1xN1y => "n1x_n1y",
            Direction::P0xN1y => "p0x_n1y",
            Direction::P1xN1y => "p1x_n1y",
            Direction::N1xP0y => "n1x_p0y",
            Direction::P0xP0y => "p0x_p0y",
            Direction::P1xP0y => "p1x_p0y",
            Direction::N1xP1y => "n1x_p1y",
            Direction::P0xP1y => "p0x_p1y",
            Direction::P1xP1y => "p1x_p1y",
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::N1xN1y => (-1, -1),
            Direction::P0xN1y => (0, -1),
            Direction::P1xN1y => (1, -1),
            Direction::N1xP0y => (-1, 0),
            Direction::P0xP0y => (0, 0),
            Direction::P1xP0y => (1, 0),
            Direction::N1xP1y => (-1, 1),
            Direction::P0xP1y => (0, 1),
            Direction::P1xP1y => (1, 1),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Direction::ALL.into_iter().find(|d| d.as_str() == name)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Grass,
    Berry,
    Water,
    Goat,
}

impl TileKind {
    pub const ALL: [TileKind; 5] = [
        TileKind::Empty,
        TileKind::Grass,
        TileKind::Berry,
        TileKind::Water,
        TileKind::Goat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Empty => "empty",
            TileKind::Grass => "grass",
            TileKind::Berry => "berry",
            TileKind::Water => "water",
            TileKind::Goat => "goat",
        }
    }

    /// Tile kinds an agent can perceive. Other agents are invisible.
    pub fn is_sensed(self) -> bool {
        !matches!(self, TileKind::Goat)
    }

    /// Tile kinds that seed random beliefs during evolution.
    pub fn seeds_beliefs(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Goat | TileKind::Water)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    Move,
    Eat,
}

impl Verb {
    pub const ALL: [Verb; 2] = [Verb::Move, Verb::Eat];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Move => "move",
            Verb::Eat => "eat",
        }
    }
}

/// Interned sensor and motor statements for one arena.
#[derive(Debug, Clone)]
pub struct SensorimotorVocabulary {
    operations: HashMap<(Verb, Direction), Term>,
    seen: HashMap<(TileKind, Direction), Term>,
    energy_increasing: Term,
    sensory_pool: Vec<Term>,
    motor_pool: Vec<Term>,
}

impl SensorimotorVocabulary {
    pub fn new(arena: &TermArena) -> Self {
        let me = arena.self_term();
        let mut operations = HashMap::new();
        let mut seen = HashMap::new();
        let mut sensory_pool = Vec::new();
        let mut motor_pool = Vec::new();

        for direction in Direction::ALL {
            let place = arena.atomic(direction.as_str());
            for verb in Verb::ALL {
                let product = arena.compound(Connector::Product, vec![me.clone(), place.clone()]);
                let op = arena.statement(product, arena.atomic(verb.as_str()), Copula::Inheritance);
                motor_pool.push(op.clone());
                operations.insert((verb, direction), op);
            }
            for kind in TileKind::ALL {
                let term = arena.statement(arena.atomic(kind.as_str()), place.clone(), Copula::Inheritance);
                if kind.seeds_beliefs() {
                    sensory_pool.push(term.clone());
                }
                seen.insert((kind, direction), term);
            }
        }

        let energy_increasing = arena.statement(
            arena.atomic("ENERGY"),
            arena.atomic("INCREASING"),
            Copula::Inheritance,
        );
        sensory_pool.push(energy_increasing.clone());

        Self {
            operations,
            seen,
            energy_increasing,
            sensory_pool,
            motor_pool,
        }
    }

    pub fn operation(&self, verb: Verb, direction: Direction) -> &Term {
        &self.operations[&(verb, direction)]
    }

    pub fn move_op(&self, direction: Direction) -> &Term {
        self.operation(Verb::Move, direction)
    }

    pub fn eat_op(&self, direction: Direction) -> &Term {
        self.operation(Verb::Eat, direction)
    }

    /// Operations of one verb in `Direction::ALL` order.
    pub fn operations_of(&self, verb: Verb) -> Vec<(Direction, Term)> {
        Direction::ALL
            .into_iter()
            .map(|d| (d, self.operation(verb, d).clone()))
            .collect()
    }

    pub fn seen(&self, kind: TileKind, direction: Direction) -> &Term {
        &self.seen[&(kind, direction)]
    }

    /// Statement reported when `kind` is observed in `direction`, or `None`
    /// for tiles that are not perceived.
    pub fn sensor_term(&self, kind: TileKind, direction: Direction) -> Option<&Term> {
        kind.is_sensed().then(|| self.seen(kind, direction))
    }

    pub fn energy_increasing(&self) -> &Term {
        &self.energy_increasing
    }

    pub fn sensory_pool(&self) -> &[Term] {
        &self.sensory_pool
    }

    pub fn motor_pool(&self) -> &[Term] {
        &self.motor_pool
    }

    pub fn random_sensory_term<R: Rng + ?Sized>(&self, rng: &mut R, energy_chance: f64) -> Term {
        if rng.r#gen::<f64>() < energy_chance {
            return self.energy_increasing.clone();
        }
        self.sensory_pool[rng.gen_range(0..self.sensory_pool.len())].clone()
    }

    pub fn random_motor_term<R: Rng + ?Sized>(&self, rng: &mut R) -> Term {
        self.motor_pool[rng.gen_range(0..self.motor_pool.len())].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn motor_terms_are_operations() {
        let arena = TermArena::new();
        let vocab = SensorimotorVocabulary::new(&arena);
        assert_eq!(vocab.motor_pool().len(), 18);
        assert!(vocab.motor_pool().iter().all(Term::is_operation));
        assert_eq!(
            vocab.eat_op(Direction::P0xP0y).as_str(),
            "((*,{SELF},p0x_p0y) --> eat)"
        );
    }

    #[test]
    fn sensory_pool_has_no_operations() {
        let arena = TermArena::new();
        let vocab = SensorimotorVocabulary::new(&arena);
        assert_eq!(vocab.sensory_pool().len(), 9 * 3 + 1);
        assert!(vocab.sensory_pool().iter().all(|t| !t.is_operation()));
        assert!(vocab.sensory_pool().contains(vocab.energy_increasing()));
    }

    #[test]
    fn goats_are_not_sensed() {
        let arena = TermArena::new();
        let vocab = SensorimotorVocabulary::new(&arena);
        assert!(vocab.sensor_term(TileKind::Goat, Direction::N1xP0y).is_none());
        assert_eq!(
            vocab.sensor_term(TileKind::Grass, Direction::N1xP0y).unwrap().as_str(),
            "(grass --> n1x_p0y)"
        );
    }

    #[test]
    fn random_terms_come_from_pools() {
        let arena = TermArena::new();
        let vocab = SensorimotorVocabulary::new(&arena);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(vocab.sensory_pool().contains(&vocab.random_sensory_term(&mut rng, 0.05)));
            assert!(vocab.random_motor_term(&mut rng).is_operation());
        }
        assert_eq!(
            &vocab.random_sensory_term(&mut rng, 1.0),
            vocab.energy_increasing()
        );
    }

    #[test]
    fn direction_names_round_trip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_name(d.as_str()), Some(d));
        }
        assert_eq!(Direction::P1xN1y.offset(), (1, -1));
    }
}
