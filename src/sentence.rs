use crate::error::ParseError;
use crate::evidence::EvidentialValue;
use crate::term::{Term, TermArena};
use serde::{Deserialize, Serialize};
use std::fmt;

const EVENT_MARKER: &str = ":|:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    Judgment,
    Goal,
}

impl Punctuation {
    pub fn symbol(self) -> char {
        match self {
            Punctuation::Judgment => '.',
            Punctuation::Goal => '!',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(Punctuation::Judgment),
            '!' => Some(Punctuation::Goal),
            _ => None,
        }
    }
}

/// Provenance of a sentence: when it was made, when it holds, and the
/// serials of the inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub id: u64,
    pub creation_time: i64,
    /// `None` for eternal sentences.
    pub occurrence_time: Option<i64>,
    pub evidential_base: Vec<u64>,
}

impl Stamp {
    pub fn new(id: u64, creation_time: i64, occurrence_time: Option<i64>) -> Self {
        Self {
            id,
            creation_time,
            occurrence_time,
            evidential_base: vec![id],
        }
    }

    pub fn overlaps(&self, other: &Stamp) -> bool {
        self.evidential_base
            .iter()
            .any(|id| other.evidential_base.contains(id))
    }

    /// Interleaves both bases, newest first, keeping at most `max_len` ids.
    pub fn merge_bases(&self, other: &Stamp, max_len: usize) -> Vec<u64> {
        let mut merged = Vec::with_capacity(max_len);
        let mut left = self.evidential_base.iter();
        let mut right = other.evidential_base.iter();
        while merged.len() < max_len {
            let (l, r) = (left.next(), right.next());
            if l.is_none() && r.is_none() {
                break;
            }
            for id in [l, r].into_iter().flatten() {
                if merged.len() < max_len && !merged.contains(id) {
                    merged.push(*id);
                }
            }
        }
        merged
    }
}

/// Hands out serials for new stamps.
#[derive(Debug, Default, Clone)]
pub struct StampSource {
    next: u64,
}

impl StampSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    pub fn stamp(&mut self, creation_time: i64, occurrence_time: Option<i64>) -> Stamp {
        Stamp::new(self.next_id(), creation_time, occurrence_time)
    }
}

/// Attentional ranking used only for container ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    pub priority: f64,
    pub durability: f64,
    pub quality: f64,
}

impl Budget {
    pub fn from_evidence(evidence: &EvidentialValue) -> Self {
        let e = evidence.expectation();
        let quality = e.max((1.0 - e) * 0.75);
        Self {
            priority: quality,
            durability: quality,
            quality,
        }
    }

    /// Forgetting step: larger rates forget more slowly.
    pub fn decay(&mut self, rate: f64) {
        if rate > 1.0 {
            self.priority *= 1.0 - 1.0 / rate;
        } else {
            self.priority = 0.0;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub statement: Term,
    pub evidence: EvidentialValue,
    pub stamp: Stamp,
    pub punctuation: Punctuation,
}

impl Sentence {
    pub fn judgment(statement: Term, evidence: EvidentialValue, stamp: Stamp) -> Self {
        Self {
            statement,
            evidence,
            stamp,
            punctuation: Punctuation::Judgment,
        }
    }

    pub fn goal(statement: Term, evidence: EvidentialValue, stamp: Stamp) -> Self {
        Self {
            statement,
            evidence,
            stamp,
            punctuation: Punctuation::Goal,
        }
    }

    pub fn is_judgment(&self) -> bool {
        self.punctuation == Punctuation::Judgment
    }

    pub fn is_goal(&self) -> bool {
        self.punctuation == Punctuation::Goal
    }

    pub fn is_event(&self) -> bool {
        self.stamp.occurrence_time.is_some()
    }

    pub fn is_eternal(&self) -> bool {
        self.stamp.occurrence_time.is_none()
    }

    pub fn occurrence_time(&self) -> Option<i64> {
        self.stamp.occurrence_time
    }

    pub fn budget(&self) -> Budget {
        Budget::from_evidence(&self.evidence)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.statement, self.punctuation.symbol())?;
        if self.is_event() {
            write!(f, " {EVENT_MARKER}")?;
        }
        write!(f, " {}", self.evidence)
    }
}

/// A sentence read from Narsese text before it is stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSentence {
    pub statement: Term,
    pub punctuation: Punctuation,
    pub is_event: bool,
    pub evidence: Option<EvidentialValue>,
}

fn parse_truth(text: &str) -> Result<EvidentialValue, ParseError> {
    let invalid = || ParseError::InvalidTruthValue(text.to_string());
    let mut parts = text.split(';');
    let frequency: f64 = parts
        .next()
        .and_then(|f| f.trim().parse().ok())
        .ok_or_else(invalid)?;
    let confidence = match parts.next() {
        Some(c) => Some(c.trim().parse::<f64>().map_err(|_| invalid())?),
        None => None,
    };
    if parts.next().is_some() || !(0.0..=1.0).contains(&frequency) {
        return Err(invalid());
    }
    match confidence {
        Some(c) if c > 0.0 && c < 1.0 => Ok(EvidentialValue::new(frequency, c)),
        Some(_) => Err(invalid()),
        None => Ok(EvidentialValue::new(frequency, 0.9)),
    }
}

/// Reads `<term><.|!> [:|:] [%f;c%]`.
pub fn parse_sentence(arena: &TermArena, text: &str) -> Result<ParsedSentence, ParseError> {
    let mut rest = text.trim();

    let mut evidence = None;
    if let Some(body) = rest.strip_suffix('%') {
        let open = body
            .rfind('%')
            .ok_or_else(|| ParseError::InvalidTruthValue(rest.to_string()))?;
        evidence = Some(parse_truth(&body[open + 1..])?);
        rest = body[..open].trim_end();
    }

    let mut is_event = false;
    if let Some(body) = rest.strip_suffix(EVENT_MARKER) {
        is_event = true;
        rest = body.trim_end();
    }

    let punctuation = rest
        .chars()
        .last()
        .and_then(Punctuation::from_symbol)
        .ok_or_else(|| ParseError::MissingPunctuation(text.to_string()))?;
    let statement = arena.parse(&rest[..rest.len() - 1])?;

    Ok(ParsedSentence {
        statement,
        punctuation,
        is_event,
        evidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_judgment_with_truth() {
        let arena = TermArena::new();
        let parsed = parse_sentence(&arena, "(grass --> n1x_p0y). :|: %1.0;0.9%").unwrap();
        assert_eq!(parsed.statement.as_str(), "(grass --> n1x_p0y)");
        assert_eq!(parsed.punctuation, Punctuation::Judgment);
        assert!(parsed.is_event);
        assert_eq!(parsed.evidence, Some(EvidentialValue::new(1.0, 0.9)));
    }

    #[test]
    fn parses_eternal_goal_without_truth() {
        let arena = TermArena::new();
        let parsed = parse_sentence(&arena, "(ENERGY --> INCREASING)!").unwrap();
        assert_eq!(parsed.punctuation, Punctuation::Goal);
        assert!(!parsed.is_event);
        assert_eq!(parsed.evidence, None);
    }

    #[test]
    fn rejects_missing_punctuation_and_bad_truth() {
        let arena = TermArena::new();
        assert!(matches!(
            parse_sentence(&arena, "(a --> b)"),
            Err(ParseError::MissingPunctuation(_))
        ));
        assert!(matches!(
            parse_sentence(&arena, "(a --> b). %1.5;0.9%"),
            Err(ParseError::InvalidTruthValue(_))
        ));
        assert!(matches!(
            parse_sentence(&arena, "(a --> b). %1.0;1.0%"),
            Err(ParseError::InvalidTruthValue(_))
        ));
        assert!(matches!(
            parse_sentence(&arena, "(a --> b). %1.0;0.0%"),
            Err(ParseError::InvalidTruthValue(_))
        ));
    }

    #[test]
    fn merged_bases_interleave_and_truncate() {
        let a = Stamp {
            evidential_base: vec![1, 3, 5],
            ..Stamp::new(1, 0, None)
        };
        let b = Stamp {
            evidential_base: vec![2, 4],
            ..Stamp::new(2, 0, None)
        };
        assert_eq!(a.merge_bases(&b, 4), vec![1, 2, 3, 4]);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Stamp::new(5, 0, None)));
    }

    #[test]
    fn budget_prefers_decisive_evidence() {
        let strong = Budget::from_evidence(&EvidentialValue::new(1.0, 0.9));
        let weak = Budget::from_evidence(&EvidentialValue::new(0.5, 0.1));
        assert!(strong.priority > weak.priority);
        let negative = Budget::from_evidence(&EvidentialValue::new(0.0, 0.9));
        assert!(negative.priority > weak.priority);
    }
}
