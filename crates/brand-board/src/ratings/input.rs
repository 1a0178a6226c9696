//! Shape and range checks for rating submissions, plus voter resolution.

use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use super::domain::{RatingScores, ValidatedRating, VoterId, MAX_SCORE, MIN_SCORE};

/// Headers consulted for the client address, most specific first.
pub const VOTER_HEADERS: [&str; 4] = [
    "x-forwarded-for",
    "x-real-ip",
    "x-client-ip",
    "cf-connecting-ip",
];

const COMMENT_LIMIT: usize = 2000;

/// Untyped rating body as posted by the client. Scores may arrive as numbers
/// or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingSubmission {
    #[serde(default)]
    pub potency_rating: Option<Value>,
    #[serde(default)]
    pub flavor_rating: Option<Value>,
    #[serde(default)]
    pub effects_rating: Option<Value>,
    #[serde(default)]
    pub value_rating: Option<Value>,
    #[serde(default)]
    pub overall_rating: Option<Value>,
    #[serde(default)]
    pub comment: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a number")]
    NotNumeric { field: &'static str },
    #[error("{field} must be between 1 and 10")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("comment must be text of at most 2000 characters")]
    InvalidComment,
}

pub fn validate_rating(
    submission: &RatingSubmission,
) -> Result<ValidatedRating, RatingValidationError> {
    let scores = RatingScores {
        potency: score("potency_rating", submission.potency_rating.as_ref())?,
        flavor: score("flavor_rating", submission.flavor_rating.as_ref())?,
        effects: score("effects_rating", submission.effects_rating.as_ref())?,
        value: score("value_rating", submission.value_rating.as_ref())?,
        overall: score("overall_rating", submission.overall_rating.as_ref())?,
    };

    let comment = match &submission.comment {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.chars().count() > COMMENT_LIMIT {
                return Err(RatingValidationError::InvalidComment);
            }
            (!text.is_empty()).then(|| text.to_string())
        }
        Some(_) => return Err(RatingValidationError::InvalidComment),
    };

    Ok(ValidatedRating { scores, comment })
}

fn score(field: &'static str, raw: Option<&Value>) -> Result<u8, RatingValidationError> {
    let value = match raw {
        None | Some(Value::Null) => return Err(RatingValidationError::Missing { field }),
        Some(value) => coerce_integer(value).ok_or(RatingValidationError::NotNumeric { field })?,
    };

    if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(RatingValidationError::OutOfRange { field, value })
    }
}

/// Integer coercion: fractions truncate toward zero, numeric strings parse.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// First non-empty address from the proxy header chain, or `"unknown"`.
/// Trivially spoofable; only used to collapse repeat votes.
pub fn resolve_voter(headers: &HeaderMap) -> VoterId {
    VOTER_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| raw.split(',').next())
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| VoterId(candidate.to_string()))
        .unwrap_or_else(VoterId::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn submission(body: Value) -> RatingSubmission {
        serde_json::from_value(body).expect("submission deserializes")
    }

    #[test]
    fn accepts_full_range_values() {
        let validated = validate_rating(&submission(json!({
            "potency_rating": 1,
            "flavor_rating": 10,
            "effects_rating": "7",
            "value_rating": 5,
            "overall_rating": 9,
            "comment": "  smooth  "
        })))
        .expect("valid rating");
        assert_eq!(validated.scores.as_array(), [1, 10, 7, 5, 9]);
        assert_eq!(validated.comment.as_deref(), Some("smooth"));
    }

    #[test]
    fn rejects_zero_and_eleven() {
        for bad in [0, 11] {
            let result = validate_rating(&submission(json!({
                "potency_rating": bad,
                "flavor_rating": 5,
                "effects_rating": 5,
                "value_rating": 5,
                "overall_rating": 5
            })));
            assert_eq!(
                result,
                Err(RatingValidationError::OutOfRange {
                    field: "potency_rating",
                    value: bad
                })
            );
        }
    }

    #[test]
    fn reports_missing_and_non_numeric_fields() {
        let missing = validate_rating(&submission(json!({
            "potency_rating": 5,
            "flavor_rating": 5,
            "effects_rating": 5,
            "value_rating": 5
        })));
        assert_eq!(
            missing,
            Err(RatingValidationError::Missing {
                field: "overall_rating"
            })
        );

        let garbage = validate_rating(&submission(json!({
            "potency_rating": 5,
            "flavor_rating": "tasty",
            "effects_rating": 5,
            "value_rating": 5,
            "overall_rating": 5
        })));
        assert_eq!(
            garbage,
            Err(RatingValidationError::NotNumeric {
                field: "flavor_rating"
            })
        );
    }

    #[test]
    fn fractional_scores_truncate() {
        let validated = validate_rating(&submission(json!({
            "potency_rating": 9.9,
            "flavor_rating": "4.2",
            "effects_rating": 5,
            "value_rating": 5,
            "overall_rating": 10.5
        })))
        .expect("valid rating");
        assert_eq!(validated.scores.potency, 9);
        assert_eq!(validated.scores.flavor, 4);
        assert_eq!(validated.scores.overall, 10);
    }

    #[test]
    fn blank_comment_is_absent() {
        let validated = validate_rating(&submission(json!({
            "potency_rating": 5,
            "flavor_rating": 5,
            "effects_rating": 5,
            "value_rating": 5,
            "overall_rating": 5,
            "comment": "   "
        })))
        .expect("valid rating");
        assert!(validated.comment.is_none());
    }

    #[test]
    fn voter_comes_from_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        assert_eq!(resolve_voter(&headers), VoterId("203.0.113.7".to_string()));
    }

    #[test]
    fn voter_falls_back_through_proxy_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(resolve_voter(&headers), VoterId("198.51.100.4".to_string()));
        assert_eq!(resolve_voter(&HeaderMap::new()), VoterId::unknown());
    }
}
