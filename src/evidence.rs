use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence can approach but never reach certainty.
pub const MAX_CONFIDENCE: f64 = 0.9999;

/// (frequency, confidence) degree of belief attached to a statement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidentialValue {
    pub frequency: f64,
    pub confidence: f64,
}

impl EvidentialValue {
    pub fn new(frequency: f64, confidence: f64) -> Self {
        Self {
            frequency: frequency.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, MAX_CONFIDENCE),
        }
    }

    /// Confidence of a single piece of evidence under horizon `k`.
    pub fn unit_confidence(k: f64) -> f64 {
        1.0 / (1.0 + k)
    }

    pub fn expectation(&self) -> f64 {
        self.confidence * (self.frequency - 0.5) + 0.5
    }

    /// Total evidence weight implied by the confidence.
    pub fn to_weight(&self, k: f64) -> f64 {
        k * self.confidence / (1.0 - self.confidence)
    }

    /// Pools the evidence behind both values. Consistent evidence raises
    /// confidence; conflicting evidence pulls frequency toward the newer sample
    /// in proportion to its weight.
    pub fn revise(&self, other: &EvidentialValue, k: f64) -> EvidentialValue {
        let w1 = self.to_weight(k);
        let w2 = other.to_weight(k);
        let total = w1 + w2;
        if total <= 0.0 {
            return EvidentialValue::new(
                (self.frequency + other.frequency) / 2.0,
                self.confidence.max(other.confidence),
            );
        }
        let frequency = (w1 * self.frequency + w2 * other.frequency) / total;
        let confidence = total / (total + k);
        EvidentialValue::new(frequency, confidence)
    }

    pub fn deduction(&self, other: &EvidentialValue) -> EvidentialValue {
        let f = self.frequency * other.frequency;
        EvidentialValue::new(f, f * self.confidence * other.confidence)
    }

    pub fn intersection(&self, other: &EvidentialValue) -> EvidentialValue {
        EvidentialValue::new(
            self.frequency * other.frequency,
            self.confidence * other.confidence,
        )
    }

    /// `self` is the antecedent, `other` the consequent observed after it.
    pub fn induction(&self, other: &EvidentialValue, k: f64) -> EvidentialValue {
        let w = self.frequency * self.confidence * other.confidence;
        EvidentialValue::new(other.frequency, w / (w + k))
    }

    pub fn negation(&self) -> EvidentialValue {
        EvidentialValue::new(1.0 - self.frequency, self.confidence)
    }

    /// Discounts confidence for an event observed `dt` cycles away.
    pub fn project(&self, dt: i64, horizon: f64) -> EvidentialValue {
        if horizon <= 0.0 {
            return *self;
        }
        let decay = (-(dt.unsigned_abs() as f64) / horizon).exp();
        EvidentialValue::new(self.frequency, self.confidence * decay)
    }
}

impl Default for EvidentialValue {
    fn default() -> Self {
        Self::new(1.0, 0.9)
    }
}

impl fmt::Display for EvidentialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{:.2};{:.2}%", self.frequency, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_clamps_into_range() {
        let ev = EvidentialValue::new(1.4, 1.0);
        assert_eq!(ev.frequency, 1.0);
        assert_eq!(ev.confidence, MAX_CONFIDENCE);
        let ev = EvidentialValue::new(-0.2, -1.0);
        assert_eq!(ev.frequency, 0.0);
        assert_eq!(ev.confidence, 0.0);
    }

    #[test]
    fn consistent_revision_raises_confidence() {
        let a = EvidentialValue::new(1.0, 0.9);
        let revised = a.revise(&a, 1.0);
        assert!(close(revised.frequency, 1.0));
        // w = 9 + 9, c = 18 / 19
        assert!(close(revised.confidence, 18.0 / 19.0));
    }

    #[test]
    fn conflicting_revision_moves_frequency_toward_new_sample() {
        let old = EvidentialValue::new(1.0, 0.5);
        let new = EvidentialValue::new(0.0, 0.5);
        let revised = old.revise(&new, 1.0);
        assert!(close(revised.frequency, 0.5));
        assert!(revised.confidence > 0.5);
    }

    #[test]
    fn unit_confidence_matches_horizon() {
        assert!(close(EvidentialValue::unit_confidence(1.0), 0.5));
        assert!(close(EvidentialValue::unit_confidence(4.0), 0.2));
    }

    #[test]
    fn projection_decays_with_distance() {
        let ev = EvidentialValue::new(1.0, 0.9);
        assert!(close(ev.project(0, 10.0).confidence, 0.9));
        assert!(ev.project(5, 10.0).confidence < ev.project(1, 10.0).confidence);
        assert!(close(ev.project(-3, 10.0).confidence, ev.project(3, 10.0).confidence));
    }

    #[test]
    fn expectation_is_neutral_without_confidence() {
        assert!(close(EvidentialValue::new(1.0, 0.0).expectation(), 0.5));
        assert!(close(EvidentialValue::new(1.0, 0.8).expectation(), 0.9));
    }
}
