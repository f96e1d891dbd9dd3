use nars_evolve::{
    Buffer, Copula, EvidentialValue, InductionContext, Sentence, StampSource, TemporalModule,
    TermArena,
};

fn event(arena: &TermArena, stamps: &mut StampSource, text: &str, t: i64) -> Sentence {
    Sentence::judgment(
        arena.parse(text).unwrap(),
        EvidentialValue::new(1.0, 0.9),
        stamps.stamp(t, Some(t)),
    )
}

#[test]
fn grass_eat_grass_induces_an_implication() {
    let arena = TermArena::new();
    let mut global: Buffer<Sentence> = Buffer::new(50);
    let mut stamps = StampSource::new();
    let mut module = TemporalModule::new(3, 5, 1.0, None);

    let mut insert = |module: &mut TemporalModule, sentence: Sentence, now: i64| {
        let mut ctx = InductionContext {
            arena: &arena,
            global: &mut global,
            stamps: &mut stamps,
            now,
            evidential_base_length: 20,
        };
        module.put_new(sentence, &mut ctx)
    };

    let mut scratch = StampSource::new();
    for t in [1, 2, 3] {
        let grass = event(&arena, &mut scratch, "(grass --> n1x_p0y)", t);
        assert!(insert(&mut module, grass, t).is_none());
    }
    let eat = event(&arena, &mut scratch, "((*,{SELF},p0x_p0y) --> eat)", 2);
    let evicted = insert(&mut module, eat, 3).expect("oldest event evicted");
    assert_eq!(evicted.occurrence_time(), Some(1));

    let times: Vec<i64> = module.chain().iter().filter_map(Sentence::occurrence_time).collect();
    assert_eq!(times, vec![2, 2, 3]);
    assert!(module.chain()[1].statement.is_operation());

    let implications: Vec<&Sentence> = global
        .iter()
        .filter(|s| s.statement.copula() == Some(Copula::PredictiveImplication))
        .collect();
    assert!(!implications.is_empty());
    assert!(implications.iter().all(|s| s.evidence.frequency == 1.0));
    assert!(
        global
            .contains("((&/,(grass --> n1x_p0y),((*,{SELF},p0x_p0y) --> eat)) =/> (grass --> n1x_p0y))")
    );
}

#[test]
fn repeated_experience_does_not_double_count() {
    let arena = TermArena::new();
    let mut global: Buffer<Sentence> = Buffer::new(50);
    let mut stamps = StampSource::new();
    let mut module = TemporalModule::new(10, 5, 1.0, None);
    let mut scratch = StampSource::new();

    let texts = [
        ("(berry --> p1x_p1y)", 1),
        ("((*,{SELF},p1x_p1y) --> eat)", 2),
        ("(ENERGY --> INCREASING)", 3),
        ("(water --> p0x_p0y)", 4),
        ("(water --> n1x_n1y)", 5),
    ];
    for (text, t) in texts {
        let e = event(&arena, &mut scratch, text, t);
        let mut ctx = InductionContext {
            arena: &arena,
            global: &mut global,
            stamps: &mut stamps,
            now: t,
            evidential_base_length: 20,
        };
        module.put_new(e, &mut ctx);
    }

    // The berry/eat/energy triple is re-derived on every later insertion
    // from the same evidence, so its confidence must stay at one unit.
    let key = "((&/,(berry --> p1x_p1y),((*,{SELF},p1x_p1y) --> eat)) =/> (ENERGY --> INCREASING))";
    let rule = global.peek(Some(key)).expect("berry rule");
    assert_eq!(rule.evidence.confidence, EvidentialValue::unit_confidence(1.0));
}
