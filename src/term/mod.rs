mod arena;
mod parser;
pub mod syntax;

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use arena::TermArena;
pub use syntax::{Connector, Copula, SELF_TERM, VariableKind};

/// Structural variants of a term.
#[derive(Debug)]
pub enum TermKind {
    Atomic {
        name: String,
    },
    Variable {
        name: String,
        kind: VariableKind,
    },
    Compound {
        connector: Connector,
        subterms: Vec<Term>,
        /// One gap per adjacent pair of subterms, only for conjunctions
        /// that carry time. Not part of identity.
        intervals: Vec<i64>,
    },
    Statement {
        subject: Term,
        predicate: Term,
        copula: Copula,
        interval: i64,
    },
}

#[derive(Debug)]
pub struct TermNode {
    canonical: String,
    complexity: usize,
    is_operation: bool,
    kind: TermKind,
}

impl TermNode {
    fn new(canonical: String, kind: TermKind) -> Self {
        let complexity = match &kind {
            TermKind::Atomic { .. } | TermKind::Variable { .. } => 1,
            TermKind::Compound { subterms, .. } => {
                1 + subterms.iter().map(Term::complexity).sum::<usize>()
            }
            TermKind::Statement {
                subject, predicate, ..
            } => 1 + subject.complexity() + predicate.complexity(),
        };
        let is_operation = match &kind {
            TermKind::Atomic { .. } | TermKind::Variable { .. } => false,
            TermKind::Compound { subterms, .. } => {
                subterms.len() > 1 && subterms.iter().all(Term::is_operation)
            }
            TermKind::Statement { subject, .. } => match subject.kind() {
                TermKind::Compound {
                    connector: Connector::Product,
                    subterms,
                    ..
                } => subterms.first().is_some_and(|s| s.as_str() == SELF_TERM),
                _ => false,
            },
        };
        Self {
            canonical,
            complexity,
            is_operation,
            kind,
        }
    }
}

/// Immutable, interned symbolic expression. Cloning is a reference count
/// bump; identity is the canonical string.
#[derive(Clone)]
pub struct Term(Arc<TermNode>);

impl Term {
    pub fn as_str(&self) -> &str {
        &self.0.canonical
    }

    pub fn to_canonical_string(&self) -> String {
        self.0.canonical.clone()
    }

    pub fn kind(&self) -> &TermKind {
        &self.0.kind
    }

    pub fn complexity(&self) -> usize {
        self.0.complexity
    }

    /// Motor term: a statement whose subject is a product headed by `{SELF}`.
    pub fn is_operation(&self) -> bool {
        self.0.is_operation
    }

    pub fn ptr_eq(&self, other: &Term) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self.kind(), TermKind::Atomic { .. })
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind(), TermKind::Variable { .. })
    }

    pub fn is_statement(&self) -> bool {
        matches!(self.kind(), TermKind::Statement { .. })
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.kind(), TermKind::Compound { .. })
    }

    pub fn subject(&self) -> Option<&Term> {
        match self.kind() {
            TermKind::Statement { subject, .. } => Some(subject),
            _ => None,
        }
    }

    pub fn predicate(&self) -> Option<&Term> {
        match self.kind() {
            TermKind::Statement { predicate, .. } => Some(predicate),
            _ => None,
        }
    }

    pub fn copula(&self) -> Option<Copula> {
        match self.kind() {
            TermKind::Statement { copula, .. } => Some(*copula),
            _ => None,
        }
    }

    pub fn interval(&self) -> i64 {
        match self.kind() {
            TermKind::Statement { interval, .. } => *interval,
            _ => 0,
        }
    }

    pub fn connector(&self) -> Option<Connector> {
        match self.kind() {
            TermKind::Compound { connector, .. } => Some(*connector),
            _ => None,
        }
    }

    pub fn subterms(&self) -> &[Term] {
        match self.kind() {
            TermKind::Compound { subterms, .. } => subterms,
            _ => &[],
        }
    }

    pub fn intervals(&self) -> &[i64] {
        match self.kind() {
            TermKind::Compound { intervals, .. } => intervals,
            _ => &[],
        }
    }

    pub fn contains_variable(&self) -> bool {
        match self.kind() {
            TermKind::Atomic { .. } => false,
            TermKind::Variable { .. } => true,
            TermKind::Compound { subterms, .. } => subterms.iter().any(Term::contains_variable),
            TermKind::Statement {
                subject, predicate, ..
            } => subject.contains_variable() || predicate.contains_variable(),
        }
    }

    /// Statement whose copula relates terms rather than statements.
    pub fn is_first_order(&self) -> bool {
        self.copula().is_some_and(|c| !c.is_higher_order())
    }

    pub fn contains(&self, needle: &Term) -> bool {
        if self == needle {
            return true;
        }
        match self.kind() {
            TermKind::Atomic { .. } | TermKind::Variable { .. } => false,
            TermKind::Compound { subterms, .. } => subterms.iter().any(|t| t.contains(needle)),
            TermKind::Statement {
                subject, predicate, ..
            } => subject.contains(needle) || predicate.contains(needle),
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.canonical == other.0.canonical
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.canonical.hash(state);
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.canonical.cmp(&other.0.canonical)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.canonical)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self.0.canonical)
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.canonical)
    }
}

fn render_compound(connector: Connector, subterms: &[Term]) -> String {
    let body = subterms
        .iter()
        .map(Term::as_str)
        .collect::<Vec<_>>()
        .join(",");
    match connector.set_close() {
        Some(close) => format!("{}{}{}", connector.symbol(), body, close),
        None => format!("({},{})", connector.symbol(), body),
    }
}

fn render_statement(subject: &Term, predicate: &Term, copula: Copula) -> String {
    format!("({} {} {})", subject, copula.symbol(), predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_requires_self_product_subject() {
        let arena = TermArena::new();
        let op = arena.parse("((*,{SELF},p0x_p0y) --> eat)").unwrap();
        let not_op = arena.parse("((*,goat,p0x_p0y) --> eat)").unwrap();
        let sensory = arena.parse("(grass --> n1x_p0y)").unwrap();
        assert!(op.is_operation());
        assert!(!not_op.is_operation());
        assert!(!sensory.is_operation());
    }

    #[test]
    fn compound_of_operations_is_operation() {
        let arena = TermArena::new();
        let seq = arena
            .parse("(&/,((*,{SELF},a) --> move),((*,{SELF},b) --> eat))")
            .unwrap();
        assert!(seq.is_operation());
        let mixed = arena
            .parse("(&/,(grass --> a),((*,{SELF},b) --> eat))")
            .unwrap();
        assert!(!mixed.is_operation());
    }

    #[test]
    fn complexity_counts_leaves_and_connectors() {
        let arena = TermArena::new();
        assert_eq!(arena.parse("bird").unwrap().complexity(), 1);
        assert_eq!(arena.parse("(bird --> animal)").unwrap().complexity(), 3);
        // statement(1) + product(1 + {SELF}(1 + 1) + 1) + eat(1)
        assert_eq!(
            arena.parse("((*,{SELF},x) --> eat)").unwrap().complexity(),
            6
        );
    }

    #[test]
    fn accessors_expose_structure() {
        let arena = TermArena::new();
        let t = arena.parse("((&/,a,b) =/> c)").unwrap();
        assert_eq!(t.copula(), Some(Copula::PredictiveImplication));
        let subject = t.subject().unwrap();
        assert_eq!(subject.connector(), Some(Connector::SequentialConjunction));
        assert_eq!(subject.subterms().len(), 2);
        assert_eq!(subject.intervals(), &[1]);
        assert_eq!(t.predicate().unwrap().as_str(), "c");
        assert!(!t.is_first_order());
        assert!(t.contains(&arena.atomic("b")));
    }
}
