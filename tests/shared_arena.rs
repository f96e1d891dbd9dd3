use nars_evolve::{Term, TermArena};
use std::sync::Arc;
use std::thread;

#[test]
fn agents_on_many_threads_intern_into_one_arena() {
    let arena = Arc::new(TermArena::new());
    let texts = [
        "((&/,(grass --> #x),((*,{SELF},#x) --> eat)) =/> (ENERGY --> INCREASING))",
        "(water --> n1x_p1y)",
        "(|,{a},{b})",
        "(berry <-> grass)",
    ];

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                texts
                    .iter()
                    .map(|text| arena.parse(text).unwrap())
                    .collect::<Vec<Term>>()
            })
        })
        .collect();
    let results: Vec<Vec<Term>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for terms in &results[1..] {
        for (a, b) in terms.iter().zip(&results[0]) {
            assert!(a.ptr_eq(b), "{a} was interned twice");
        }
    }
    for (term, text) in results[0].iter().zip(texts) {
        assert_eq!(term.as_str(), text);
        assert_eq!(arena.parse(term.as_str()).unwrap(), *term);
    }
}
