use crate::error::{NarsError, Result};
use crate::term::{Connector, Copula, Term, TermArena, VariableKind};

/// Name of the dependent variable that stands in for a direction.
pub const DIRECTION_VARIABLE: &str = "x";

/// Procedural rule `((&/,S,M) =/> P)`, or `(M =/> P)` without antecedent:
/// in context S, executing operation M leads to P.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contingency {
    pub antecedent: Option<Term>,
    pub operation: Term,
    pub consequent: Term,
}

impl Contingency {
    pub fn new(antecedent: Option<Term>, operation: Term, consequent: Term) -> Self {
        Self {
            antecedent,
            operation,
            consequent,
        }
    }

    /// Splits a predictive implication into its parts, rejecting any
    /// statement that is not a contingency.
    pub fn decompose(statement: &Term) -> Result<Self> {
        if statement.copula() != Some(Copula::PredictiveImplication) {
            return Err(NarsError::shape(statement, "not a predictive implication"));
        }
        let (Some(subject), Some(consequent)) = (statement.subject(), statement.predicate()) else {
            return Err(NarsError::shape(statement, "missing subject or predicate"));
        };
        if subject.is_operation() && subject.is_statement() {
            return Ok(Self::new(None, subject.clone(), consequent.clone()));
        }
        match (subject.connector(), subject.subterms()) {
            (Some(Connector::SequentialConjunction), [antecedent, operation])
                if operation.is_operation() && operation.is_statement() =>
            {
                Ok(Self::new(
                    Some(antecedent.clone()),
                    operation.clone(),
                    consequent.clone(),
                ))
            }
            _ => Err(NarsError::shape(
                statement,
                "subject is not (&/,antecedent,operation)",
            )),
        }
    }

    pub fn to_term(&self, arena: &TermArena) -> Term {
        let subject = match &self.antecedent {
            Some(antecedent) => arena.compound(
                Connector::SequentialConjunction,
                vec![antecedent.clone(), self.operation.clone()],
            ),
            None => self.operation.clone(),
        };
        arena.statement(subject, self.consequent.clone(), Copula::PredictiveImplication)
    }

    /// The direction slot of the operation, `dir` in `((*,{SELF},dir) --> verb)`.
    pub fn operation_argument(&self) -> Option<&Term> {
        self.operation.subject()?.subterms().get(1)
    }

    /// The direction slot of the antecedent, `dir` in `(kind --> dir)`.
    pub fn antecedent_argument(&self) -> Option<&Term> {
        self.antecedent.as_ref()?.predicate()
    }

    pub fn is_variablized(&self) -> bool {
        matches!(
            (self.antecedent_argument(), self.operation_argument()),
            (Some(a), Some(m)) if a.is_variable() && m.is_variable()
        )
    }

    pub fn is_concrete(&self) -> bool {
        matches!(
            (self.antecedent_argument(), self.operation_argument()),
            (Some(a), Some(m)) if a.is_atomic() && m.is_atomic()
        )
    }

    /// Replaces both direction slots with the dependent variable `#x`.
    pub fn variablize(&self, arena: &TermArena) -> Result<Self> {
        if !self.is_concrete() {
            return Err(NarsError::shape(
                self.to_term(arena),
                "antecedent and operation are not both concrete",
            ));
        }
        let x = arena.variable(DIRECTION_VARIABLE, VariableKind::Dependent);
        self.with_arguments(arena, &x)
    }

    /// Replaces both direction variables with `direction`.
    pub fn concretize(&self, arena: &TermArena, direction: &Term) -> Result<Self> {
        if !self.is_variablized() {
            return Err(NarsError::shape(
                self.to_term(arena),
                "antecedent and operation are not both variables",
            ));
        }
        self.with_arguments(arena, direction)
    }

    /// Variablizes a concrete rule whose antecedent and operation name the
    /// same direction. Returns `None` when they differ or are not atomic.
    pub fn generalize(&self, arena: &TermArena) -> Option<Self> {
        match (self.antecedent_argument(), self.operation_argument()) {
            (Some(a), Some(m)) if a.is_atomic() && m.is_atomic() && a == m => {
                self.variablize(arena).ok()
            }
            _ => None,
        }
    }

    fn with_arguments(&self, arena: &TermArena, argument: &Term) -> Result<Self> {
        let antecedent = self
            .antecedent
            .as_ref()
            .map(|s| with_predicate(arena, s, argument.clone()))
            .transpose()?;
        let operation = with_operation_argument(arena, &self.operation, argument.clone())?;
        Ok(Self::new(antecedent, operation, self.consequent.clone()))
    }
}

/// `(subject copula predicate)` rebuilt with a new predicate.
pub fn with_predicate(arena: &TermArena, statement: &Term, predicate: Term) -> Result<Term> {
    match (statement.subject(), statement.copula()) {
        (Some(subject), Some(copula)) => Ok(arena.statement(subject.clone(), predicate, copula)),
        _ => Err(NarsError::shape(statement, "not a statement")),
    }
}

/// `((*,{SELF},arg) --> verb)` rebuilt with a new argument.
pub fn with_operation_argument(arena: &TermArena, operation: &Term, argument: Term) -> Result<Term> {
    let (Some(product), Some(verb), Some(copula)) =
        (operation.subject(), operation.predicate(), operation.copula())
    else {
        return Err(NarsError::shape(operation, "operation is not a statement"));
    };
    if product.connector() != Some(Connector::Product) || product.subterms().len() < 2 {
        return Err(NarsError::shape(operation, "operation subject is not (*,{SELF},arg)"));
    }
    let mut subterms = product.subterms().to_vec();
    subterms[1] = argument;
    let product = arena.compound(Connector::Product, subterms);
    Ok(arena.statement(product, verb.clone(), copula))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONCRETE: &str =
        "((&/,(grass --> p1x_p0y),((*,{SELF},p1x_p0y) --> eat)) =/> (ENERGY --> INCREASING))";
    const VARIABLE: &str =
        "((&/,(grass --> #x),((*,{SELF},#x) --> eat)) =/> (ENERGY --> INCREASING))";

    #[test]
    fn decompose_and_rebuild() {
        let arena = TermArena::new();
        let term = arena.parse(CONCRETE).unwrap();
        let c = Contingency::decompose(&term).unwrap();
        assert_eq!(c.antecedent.as_ref().unwrap().as_str(), "(grass --> p1x_p0y)");
        assert_eq!(c.operation.as_str(), "((*,{SELF},p1x_p0y) --> eat)");
        assert!(c.to_term(&arena).ptr_eq(&term));
    }

    #[test]
    fn bare_operation_contingency() {
        let arena = TermArena::new();
        let term = arena
            .parse("(((*,{SELF},p0x_p0y) --> eat) =/> (ENERGY --> INCREASING))")
            .unwrap();
        let c = Contingency::decompose(&term).unwrap();
        assert!(c.antecedent.is_none());
        assert_eq!(c.to_term(&arena), term);
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let arena = TermArena::new();
        for text in [
            "(grass --> p1x_p0y)",
            "((&/,(grass --> a),(water --> b)) =/> (ENERGY --> INCREASING))",
            "((&/,a,b,c) =/> d)",
        ] {
            let term = arena.parse(text).unwrap();
            assert!(
                matches!(Contingency::decompose(&term), Err(NarsError::InvalidShape { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn variablize_and_concretize_are_inverse() {
        let arena = TermArena::new();
        let concrete = Contingency::decompose(&arena.parse(CONCRETE).unwrap()).unwrap();
        let variable = concrete.variablize(&arena).unwrap();
        assert_eq!(variable.to_term(&arena).as_str(), VARIABLE);
        assert!(variable.is_variablized());
        let back = variable
            .concretize(&arena, &arena.atomic("p1x_p0y"))
            .unwrap();
        assert_eq!(back, concrete);
        assert!(variable.variablize(&arena).is_err());
    }

    #[test]
    fn generalize_needs_matching_directions() {
        let arena = TermArena::new();
        let concrete = Contingency::decompose(&arena.parse(CONCRETE).unwrap()).unwrap();
        assert!(concrete.generalize(&arena).is_some());
        let mismatched = arena
            .parse("((&/,(grass --> p1x_p0y),((*,{SELF},n1x_p0y) --> eat)) =/> (ENERGY --> INCREASING))")
            .unwrap();
        let mismatched = Contingency::decompose(&mismatched).unwrap();
        assert!(mismatched.generalize(&arena).is_none());
        assert!(mismatched.variablize(&arena).is_ok());
    }
}
