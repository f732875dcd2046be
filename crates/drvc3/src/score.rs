//! Validation scoring: how the `validation` block of a new receipt is filled.

use drvc3_core::{Resource, Validation};
use serde_json::{Map, Value};

/// The descriptive fields a score is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub issuer: &'a str,
    pub event: &'a str,
    pub description: Option<&'a str>,
    pub resource: Option<&'a Resource>,
}

/// Produces the validation block for a receipt about to be signed.
pub trait ScorePolicy: Send + Sync {
    fn assess(&self, input: &ScoreInput<'_>) -> Validation;
}

/// Scores a receipt by how many of its descriptive fields are populated.
///
/// With every field present the score is `full_score`; each missing field
/// removes an equal share. The `completeness` check is true only when
/// nothing is missing.
#[derive(Debug, Clone, Copy)]
pub struct Completeness {
    pub full_score: f64,
}

impl Completeness {
    pub const DEFAULT_FULL_SCORE: f64 = 95.0;
}

impl Default for Completeness {
    fn default() -> Self {
        Self {
            full_score: Self::DEFAULT_FULL_SCORE,
        }
    }
}

impl ScorePolicy for Completeness {
    fn assess(&self, input: &ScoreInput<'_>) -> Validation {
        let present = |s: Option<&str>| s.is_some_and(|s| !s.trim().is_empty());
        let fields = [
            present(Some(input.issuer)),
            present(Some(input.event)),
            present(input.description),
            present(input.resource.and_then(|r| r.url.as_deref())),
        ];
        let filled = fields.iter().filter(|f| **f).count();
        let ratio = filled as f64 / fields.len() as f64;

        let v_score = round2(clamp_score(self.full_score) * ratio);
        validation(v_score, filled == fields.len())
    }
}

/// Always reports the same score with every check passing.
#[derive(Debug, Clone, Copy)]
pub struct FixedScore(pub f64);

impl ScorePolicy for FixedScore {
    fn assess(&self, _input: &ScoreInput<'_>) -> Validation {
        validation(clamp_score(self.0), true)
    }
}

fn validation(v_score: f64, complete: bool) -> Validation {
    let mut checks = Map::new();
    checks.insert("completeness".to_string(), Value::Bool(complete));
    checks.insert("signed".to_string(), Value::Bool(true));
    Validation {
        v_score: Some(v_score),
        checks: Some(checks),
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(description: Option<&'a str>, resource: Option<&'a Resource>) -> ScoreInput<'a> {
        ScoreInput {
            issuer: "github.com/acme/site",
            event: "content.publish",
            description,
            resource,
        }
    }

    #[test]
    fn test_complete_receipt_scores_full() {
        let resource = Resource::file("/srv/site/index.html");
        let validation =
            Completeness::default().assess(&input(Some("landing page"), Some(&resource)));

        assert_eq!(validation.v_score, Some(95.0));
        let checks = validation.checks.unwrap();
        assert_eq!(checks["completeness"], Value::Bool(true));
        assert_eq!(checks["signed"], Value::Bool(true));
    }

    #[test]
    fn test_missing_fields_lower_score() {
        let resource = Resource::file("/srv/site/index.html");
        let partial = Completeness::default().assess(&input(None, Some(&resource)));
        assert_eq!(partial.v_score, Some(71.25));
        assert_eq!(partial.checks.unwrap()["completeness"], Value::Bool(false));

        let bare = Completeness::default().assess(&input(Some("  "), None));
        assert_eq!(bare.v_score, Some(47.5));
    }

    #[test]
    fn test_scores_are_clamped() {
        let high = Completeness { full_score: 250.0 }.assess(&input(Some("d"), None));
        assert_eq!(high.v_score, Some(75.0));

        assert_eq!(FixedScore(-3.0).assess(&input(None, None)).v_score, Some(0.0));
        assert_eq!(FixedScore(f64::NAN).assess(&input(None, None)).v_score, Some(0.0));
        assert_eq!(FixedScore(101.0).assess(&input(None, None)).v_score, Some(100.0));
    }
}
