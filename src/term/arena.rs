use super::syntax::{Connector, Copula, SELF_TERM, VariableKind};
use super::{Term, TermKind, TermNode, parser, render_compound, render_statement};
use crate::error::ParseError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Interning pool for terms, keyed by canonical string.
///
/// One arena is owned by a reasoning context (usually shared by `Arc`
/// across every agent of a population). The first construction of a
/// canonical string wins; later constructions return the same node.
#[derive(Default)]
pub struct TermArena {
    pool: RwLock<HashMap<String, Term>>,
}

impl TermArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pool.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.read().is_empty()
    }

    pub fn get(&self, canonical: &str) -> Option<Term> {
        self.pool.read().get(canonical).cloned()
    }

    fn intern(&self, canonical: String, kind: impl FnOnce() -> TermKind) -> Term {
        if let Some(existing) = self.pool.read().get(&canonical) {
            return existing.clone();
        }
        let mut pool = self.pool.write();
        pool.entry(canonical)
            .or_insert_with_key(|key| Term(Arc::new(TermNode::new(key.clone(), kind()))))
            .clone()
    }

    pub fn parse(&self, text: &str) -> Result<Term, ParseError> {
        parser::parse(self, text)
    }

    pub fn atomic(&self, name: &str) -> Term {
        self.intern(name.to_string(), || TermKind::Atomic {
            name: name.to_string(),
        })
    }

    pub fn variable(&self, name: &str, kind: VariableKind) -> Term {
        let canonical = format!("{}{}", kind.sigil(), name);
        self.intern(canonical, || TermKind::Variable {
            name: name.to_string(),
            kind,
        })
    }

    /// `{SELF}`, the reserved self-reference used by motor terms.
    pub fn self_term(&self) -> Term {
        if let Some(existing) = self.get(SELF_TERM) {
            return existing;
        }
        let me = self.atomic("SELF");
        self.compound(Connector::ExtensionalSet, vec![me])
    }

    pub fn compound(&self, connector: Connector, subterms: Vec<Term>) -> Term {
        self.compound_with_intervals(connector, subterms, Vec::new())
    }

    pub fn compound_with_intervals(
        &self,
        connector: Connector,
        mut subterms: Vec<Term>,
        intervals: Vec<i64>,
    ) -> Term {
        if subterms.len() > 1 {
            if let Some(intersection) = connector.set_intersection() {
                let singletons = subterms
                    .into_iter()
                    .map(|t| self.compound(connector, vec![t]))
                    .collect();
                return self.compound(intersection, singletons);
            }
        }
        if connector.is_order_invariant() {
            subterms.sort();
            subterms.dedup();
        }
        let gaps = subterms.len().saturating_sub(1);
        let intervals = match connector {
            Connector::ParallelConjunction => vec![0; gaps],
            Connector::SequentialConjunction if intervals.len() == gaps => intervals,
            Connector::SequentialConjunction => vec![1; gaps],
            _ => Vec::new(),
        };
        let canonical = render_compound(connector, &subterms);
        self.intern(canonical, || TermKind::Compound {
            connector,
            subterms,
            intervals,
        })
    }

    pub fn statement(&self, subject: Term, predicate: Term, copula: Copula) -> Term {
        self.statement_with_interval(subject, predicate, copula, 0)
    }

    pub fn statement_with_interval(
        &self,
        subject: Term,
        predicate: Term,
        copula: Copula,
        interval: i64,
    ) -> Term {
        let (subject, predicate) =
            if copula.is_symmetric() && subject.as_str().as_bytes() > predicate.as_str().as_bytes() {
                (predicate, subject)
            } else {
                (subject, predicate)
            };
        let canonical = render_statement(&subject, &predicate, copula);
        self.intern(canonical, || TermKind::Statement {
            subject,
            predicate,
            copula,
            interval,
        })
    }

    /// Rebuilds `term` with every occurrence of `from` replaced by `to`.
    pub fn substitute(&self, term: &Term, from: &Term, to: &Term) -> Term {
        if term == from {
            return to.clone();
        }
        match term.kind() {
            TermKind::Atomic { .. } | TermKind::Variable { .. } => term.clone(),
            TermKind::Compound {
                connector,
                subterms,
                intervals,
            } => {
                let rebuilt = subterms
                    .iter()
                    .map(|t| self.substitute(t, from, to))
                    .collect();
                self.compound_with_intervals(*connector, rebuilt, intervals.clone())
            }
            TermKind::Statement {
                subject,
                predicate,
                copula,
                interval,
            } => self.statement_with_interval(
                self.substitute(subject, from, to),
                self.substitute(predicate, from, to),
                *copula,
                *interval,
            ),
        }
    }
}
