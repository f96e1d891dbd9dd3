use serde::{Deserialize, Serialize};

pub const STATEMENT_OPEN: char = '(';
pub const STATEMENT_CLOSE: char = ')';
pub const DIVIDER: char = ',';
pub const SELF_TERM: &str = "{SELF}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Independent,
    Dependent,
    Query,
}

impl VariableKind {
    pub fn sigil(self) -> char {
        match self {
            VariableKind::Independent => '$',
            VariableKind::Dependent => '#',
            VariableKind::Query => '?',
        }
    }

    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            '$' => Some(VariableKind::Independent),
            '#' => Some(VariableKind::Dependent),
            '?' => Some(VariableKind::Query),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    ExtensionalSet,
    IntensionalSet,
    ExtensionalIntersection,
    IntensionalIntersection,
    ExtensionalDifference,
    IntensionalDifference,
    Product,
    ExtensionalImage,
    IntensionalImage,
    Negation,
    Conjunction,
    Disjunction,
    SequentialConjunction,
    ParallelConjunction,
}

impl Connector {
    pub const ALL: [Connector; 14] = [
        Connector::ExtensionalSet,
        Connector::IntensionalSet,
        Connector::ExtensionalIntersection,
        Connector::IntensionalIntersection,
        Connector::ExtensionalDifference,
        Connector::IntensionalDifference,
        Connector::Product,
        Connector::ExtensionalImage,
        Connector::IntensionalImage,
        Connector::Negation,
        Connector::Conjunction,
        Connector::Disjunction,
        Connector::SequentialConjunction,
        Connector::ParallelConjunction,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Connector::ExtensionalSet => "{",
            Connector::IntensionalSet => "[",
            Connector::ExtensionalIntersection => "&",
            Connector::IntensionalIntersection => "|",
            Connector::ExtensionalDifference => "-",
            Connector::IntensionalDifference => "~",
            Connector::Product => "*",
            Connector::ExtensionalImage => "/",
            Connector::IntensionalImage => "\\",
            Connector::Negation => "--",
            Connector::Conjunction => "&&",
            Connector::Disjunction => "||",
            Connector::SequentialConjunction => "&/",
            Connector::ParallelConjunction => "&|",
        }
    }

    /// Looks up a connector written inside `(` ... `)`. Set connectors are
    /// only written with their own brackets and are not matched here.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Connector::ALL
            .into_iter()
            .filter(|c| !c.is_set())
            .find(|c| c.symbol() == symbol)
    }

    pub fn is_set(self) -> bool {
        matches!(self, Connector::ExtensionalSet | Connector::IntensionalSet)
    }

    /// Closing bracket for set connectors.
    pub fn set_close(self) -> Option<char> {
        match self {
            Connector::ExtensionalSet => Some('}'),
            Connector::IntensionalSet => Some(']'),
            _ => None,
        }
    }

    pub fn from_set_open(c: char) -> Option<Self> {
        match c {
            '{' => Some(Connector::ExtensionalSet),
            '[' => Some(Connector::IntensionalSet),
            _ => None,
        }
    }

    /// Intersection that a multi-element set of this kind normalizes into.
    /// `{a,b}` is the intensional intersection `(|,{a},{b})`, `[a,b]` the
    /// extensional intersection `(&,[a],[b])`.
    pub fn set_intersection(self) -> Option<Self> {
        match self {
            Connector::ExtensionalSet => Some(Connector::IntensionalIntersection),
            Connector::IntensionalSet => Some(Connector::ExtensionalIntersection),
            _ => None,
        }
    }

    pub fn is_order_invariant(self) -> bool {
        matches!(
            self,
            Connector::ExtensionalSet
                | Connector::IntensionalSet
                | Connector::ExtensionalIntersection
                | Connector::IntensionalIntersection
                | Connector::Conjunction
                | Connector::Disjunction
                | Connector::ParallelConjunction
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Copula {
    Inheritance,
    Similarity,
    Instance,
    Property,
    InstanceProperty,
    Implication,
    PredictiveImplication,
    ConcurrentImplication,
    RetrospectiveImplication,
    Equivalence,
    PredictiveEquivalence,
    ConcurrentEquivalence,
}

impl Copula {
    pub const ALL: [Copula; 12] = [
        Copula::Inheritance,
        Copula::Similarity,
        Copula::Instance,
        Copula::Property,
        Copula::InstanceProperty,
        Copula::Implication,
        Copula::PredictiveImplication,
        Copula::ConcurrentImplication,
        Copula::RetrospectiveImplication,
        Copula::Equivalence,
        Copula::PredictiveEquivalence,
        Copula::ConcurrentEquivalence,
    ];

    /// Every copula token is exactly this many bytes.
    pub const WIDTH: usize = 3;

    pub fn symbol(self) -> &'static str {
        match self {
            Copula::Inheritance => "-->",
            Copula::Similarity => "<->",
            Copula::Instance => "{--",
            Copula::Property => "--]",
            Copula::InstanceProperty => "{-]",
            Copula::Implication => "==>",
            Copula::PredictiveImplication => "=/>",
            Copula::ConcurrentImplication => "=|>",
            Copula::RetrospectiveImplication => "=\\>",
            Copula::Equivalence => "<=>",
            Copula::PredictiveEquivalence => "</>",
            Copula::ConcurrentEquivalence => "<|>",
        }
    }

    /// Copula token at the very start of `text`, if any.
    pub fn match_prefix(text: &str) -> Option<Self> {
        Copula::ALL.into_iter().find(|c| text.starts_with(c.symbol()))
    }

    /// True for copula tokens that contain bracket characters and must be
    /// skipped when tracking nesting depth.
    pub fn is_bracketed(self) -> bool {
        matches!(
            self,
            Copula::Instance | Copula::Property | Copula::InstanceProperty
        )
    }

    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            Copula::Similarity | Copula::Equivalence | Copula::PredictiveEquivalence | Copula::ConcurrentEquivalence
        )
    }

    pub fn is_higher_order(self) -> bool {
        matches!(
            self,
            Copula::Implication
                | Copula::PredictiveImplication
                | Copula::ConcurrentImplication
                | Copula::RetrospectiveImplication
                | Copula::Equivalence
                | Copula::PredictiveEquivalence
                | Copula::ConcurrentEquivalence
        )
    }
}
