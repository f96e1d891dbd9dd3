use nars_evolve::{
    Direction, EvolutionConfig, EvolutionMode, EvidentialValue, GenePool, Genome, Nars,
    NarsConfig, Personality, Sampling, SelectionTable, SharedSelectionTable, TermArena, TileKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

fn pool(mode: EvolutionMode) -> Arc<GenePool> {
    let config = EvolutionConfig {
        mode,
        ..EvolutionConfig::default()
    };
    GenePool::new(Arc::new(TermArena::new()), config)
}

fn keys_match(genome: &Genome) -> bool {
    let listed: HashSet<String> = genome
        .beliefs()
        .iter()
        .map(|b| b.statement.to_canonical_string())
        .collect();
    listed.len() == genome.beliefs().len() && &listed == genome.belief_keys()
}

/// Meals eaten when grass always grows east and the agent only acts on
/// its innate rules.
fn meals(pool: &Arc<GenePool>, genome: &Genome) -> f64 {
    let vocab = &pool.vocabulary;
    let mut nars = Nars::new(Arc::clone(&pool.arena), NarsConfig::default(), genome);
    let sensed = EvidentialValue::new(1.0, 0.99);
    let mut meals = 0.0;
    for _ in 0..10 {
        nars.sense(vocab.seen(TileKind::Grass, Direction::P1xP0y).clone(), sensed);
        nars.run_cycle();
        if let Some((op, _)) = nars.best_operation(vocab.motor_pool()) {
            nars.report_operation(&op);
            if &op == vocab.eat_op(Direction::P1xP0y) {
                meals += 1.0;
            }
        }
        nars.run_cycle();
    }
    meals
}

#[test]
fn generations_keep_every_invariant() {
    let mut rng = StdRng::seed_from_u64(2024);
    let pool = pool(EvolutionMode::EvolvePersonalityAndContingenciesNoLearning);
    let table = SharedSelectionTable::new(SelectionTable::new(12, Sampling::ScoreWeighted));

    for _ in 0..6 {
        let mut cohort = Vec::new();
        while cohort.len() < 8 {
            if table.count() < 2 {
                cohort.push(Genome::new(Arc::clone(&pool), None, None, None, &mut rng));
            } else {
                let sexual = rng.gen_bool(0.5);
                cohort.extend(table.breed(sexual, &mut rng));
            }
        }
        for genome in cohort {
            assert!(keys_match(&genome));
            for (parameter, value) in genome.personality().iter() {
                assert!(parameter.range().contains(value), "{parameter} = {value}");
            }
            for belief in genome.beliefs() {
                assert!((0.0..=1.0).contains(&belief.evidence.frequency));
                assert!(belief.evidence.confidence > 0.0 && belief.evidence.confidence < 1.0);
            }
            let fitness = meals(&pool, &genome);
            table.try_add(fitness, genome);
        }
        table.with(|t| {
            assert!(t.count() <= t.capacity());
            assert!(t.entries().windows(2).all(|w| w[0].0 <= w[1].0));
        });
    }
    assert_eq!(table.count(), 12);
}

#[test]
fn innate_rule_for_the_right_direction_earns_meals() {
    let mut rng = StdRng::seed_from_u64(7);
    let pool = pool(EvolutionMode::EvolveContingenciesFixedPersonalityNoLearning);
    let good = pool
        .arena
        .parse("((&/,(grass --> #x),((*,{SELF},#x) --> eat)) =/> (ENERGY --> INCREASING))")
        .unwrap();
    let wrong = pool
        .arena
        .parse("((&/,(grass --> p1x_p0y),((*,{SELF},n1x_p0y) --> eat)) =/> (ENERGY --> INCREASING))")
        .unwrap();

    let informed = Genome::new(
        Arc::clone(&pool),
        Some(vec![nars_evolve::EvolvableSentence::new(good, EvidentialValue::new(1.0, 0.9))]),
        None,
        None,
        &mut rng,
    );
    let misled = Genome::new(
        Arc::clone(&pool),
        Some(vec![nars_evolve::EvolvableSentence::new(wrong, EvidentialValue::new(1.0, 0.9))]),
        None,
        None,
        &mut rng,
    );
    assert_eq!(meals(&pool, &informed), 10.0);
    assert_eq!(meals(&pool, &misled), 0.0);
    assert!(informed.hamming_distance(&misled) == 2.0);

    let mut table = SelectionTable::new(4, Sampling::RankWeighted);
    table.try_add(meals(&pool, &misled), misled);
    table.try_add(meals(&pool, &informed), informed);
    let (best_score, best) = table.get_best().unwrap();
    assert_eq!(best_score, 10.0);
    assert_eq!(best.beliefs().len(), 1);
    assert_eq!(
        best.personality().get(Personality::DecisionThreshold),
        Personality::DecisionThreshold.default_value()
    );
}
