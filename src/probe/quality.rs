use serde_json::Value;

use crate::providers::Provider;
use crate::report::QualityAssessment;

/// Payload log lines are capped at this many characters plus an ellipsis.
pub const PAYLOAD_SUMMARY_LIMIT: usize = 1000;

/// Required payload shape for one (provider, endpoint) pair.
#[derive(Debug)]
pub enum RequiredShape {
    /// Top-level object carrying all named keys.
    Fields(&'static [&'static str]),
    /// Array of objects whose first element carries all named keys.
    ElementFields(&'static [&'static str]),
    /// Array of positional rows with at least this many columns.
    RowLen(usize),
}

/// Registry of quality predicates. New pairs are added here, not in the
/// prober's control flow; unregistered pairs fall back to a zero assessment.
const QUALITY_RULES: &[(Provider, &str, RequiredShape)] = &[
    (
        Provider::Binance,
        "ticker-price",
        RequiredShape::Fields(&["symbol", "price"]),
    ),
    (
        Provider::Binance,
        "ticker-24hr",
        RequiredShape::Fields(&["symbol", "lastPrice", "volume"]),
    ),
    (Provider::Binance, "klines", RequiredShape::RowLen(11)),
    (
        Provider::Binance,
        "depth",
        RequiredShape::Fields(&["bids", "asks"]),
    ),
    (
        Provider::Binance,
        "exchange-info",
        RequiredShape::Fields(&["symbols"]),
    ),
    (
        Provider::CoinGecko,
        "global",
        RequiredShape::Fields(&["data"]),
    ),
    (
        Provider::CoinGecko,
        "simple-price",
        RequiredShape::Fields(&["bitcoin"]),
    ),
    (
        Provider::CoinGecko,
        "coins-markets",
        RequiredShape::ElementFields(&["id", "current_price"]),
    ),
    (
        Provider::CryptoCompare,
        "price",
        RequiredShape::Fields(&["USD"]),
    ),
    (
        Provider::CryptoCompare,
        "histoday",
        RequiredShape::Fields(&["Response", "Data"]),
    ),
    (
        Provider::CoinCap,
        "assets",
        RequiredShape::Fields(&["data"]),
    ),
    (
        Provider::CoinPaprika,
        "tickers",
        RequiredShape::Fields(&["id", "quotes"]),
    ),
    (
        Provider::Coinbase,
        "spot-price",
        RequiredShape::Fields(&["data"]),
    ),
    (
        Provider::Kraken,
        "ticker",
        RequiredShape::Fields(&["result"]),
    ),
];

fn rule_for(provider: Provider, endpoint: &str) -> Option<&'static RequiredShape> {
    QUALITY_RULES
        .iter()
        .find(|(rule_provider, rule_endpoint, _)| {
            *rule_provider == provider && *rule_endpoint == endpoint
        })
        .map(|(_, _, shape)| shape)
}

/// Computes the quality verdict for one successful payload. Malformed
/// payloads are recorded as issues; this never fails.
pub fn assess(provider: Provider, endpoint: &str, payload: &Value) -> QualityAssessment {
    let Some(rule) = rule_for(provider, endpoint) else {
        return QualityAssessment {
            has_required_fields: false,
            field_count: 0,
            completeness_score: 0,
            issues: vec![format!(
                "no quality rule registered for {provider}/{endpoint}"
            )],
        };
    };

    let mut issues = Vec::new();

    let field_count = match payload {
        Value::Object(map) => map.len(),
        Value::Array(rows) => rows.len(),
        _ => {
            issues.push("payload is neither a JSON object nor an array".to_string());
            0
        }
    };

    let has_required_fields = match rule {
        RequiredShape::Fields(keys) => match payload.as_object() {
            Some(map) => keys.iter().all(|key| map.contains_key(*key)),
            None => {
                issues.push("expected a JSON object".to_string());
                false
            }
        },
        RequiredShape::ElementFields(keys) => {
            match payload.as_array().and_then(|rows| rows.first()) {
                Some(Value::Object(first)) => keys.iter().all(|key| first.contains_key(*key)),
                _ => {
                    issues.push("expected a non-empty JSON array of objects".to_string());
                    false
                }
            }
        }
        RequiredShape::RowLen(min_len) => match payload.as_array().and_then(|rows| rows.first()) {
            Some(Value::Array(row)) => row.len() >= *min_len,
            _ => {
                issues.push("expected a non-empty JSON array of rows".to_string());
                false
            }
        },
    };

    let completeness_score = if field_count == 0 {
        0
    } else if has_required_fields {
        100
    } else {
        50
    };

    QualityAssessment {
        has_required_fields,
        field_count,
        completeness_score,
        issues,
    }
}

/// Caps a payload copy for logging; appends an ellipsis marker when cut.
pub fn truncate_payload(body: &str) -> String {
    if body.chars().count() <= PAYLOAD_SUMMARY_LIMIT {
        return body.to_string();
    }

    let truncated: String = body.chars().take(PAYLOAD_SUMMARY_LIMIT).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assess_full_match_scores_100() {
        let payload = json!({"symbol": "BTCUSDT", "price": "36250.50"});

        let quality = assess(Provider::Binance, "ticker-price", &payload);
        assert!(quality.has_required_fields);
        assert_eq!(quality.field_count, 2);
        assert_eq!(quality.completeness_score, 100);
        assert!(quality.issues.is_empty());
    }

    #[test]
    fn test_assess_missing_required_field_scores_50() {
        let payload = json!({"symbol": "BTCUSDT", "code": -1000});

        let quality = assess(Provider::Binance, "ticker-price", &payload);
        assert!(!quality.has_required_fields);
        assert_eq!(quality.field_count, 2);
        assert_eq!(quality.completeness_score, 50);
    }

    #[test]
    fn test_assess_empty_object_scores_0() {
        let quality = assess(Provider::CoinGecko, "global", &json!({}));

        assert_eq!(quality.field_count, 0);
        assert_eq!(quality.completeness_score, 0);
    }

    #[test]
    fn test_assess_unregistered_pair_defaults_to_zero() {
        let payload = json!({"anything": 1});

        let quality = assess(Provider::Kraken, "order-book", &payload);
        assert!(!quality.has_required_fields);
        assert_eq!(quality.field_count, 0);
        assert_eq!(quality.completeness_score, 0);
        assert_eq!(quality.issues.len(), 1);
    }

    #[test]
    fn test_assess_kline_rows_by_column_count() {
        let full_row: Vec<i64> = (0..12).collect();
        let quality = assess(Provider::Binance, "klines", &json!([full_row]));
        assert!(quality.has_required_fields);
        assert_eq!(quality.completeness_score, 100);

        let short_row: Vec<i64> = (0..5).collect();
        let quality = assess(Provider::Binance, "klines", &json!([short_row]));
        assert!(!quality.has_required_fields);
        assert_eq!(quality.completeness_score, 50);
    }

    #[test]
    fn test_assess_array_of_objects_checks_first_element() {
        let payload = json!([{"id": "bitcoin", "current_price": 40000.0}]);
        let quality = assess(Provider::CoinGecko, "coins-markets", &payload);
        assert!(quality.has_required_fields);

        let quality = assess(Provider::CoinGecko, "coins-markets", &json!([]));
        assert!(!quality.has_required_fields);
        assert_eq!(quality.completeness_score, 0);
    }

    #[test]
    fn test_assess_scalar_payload_records_issue() {
        let quality = assess(Provider::CoinGecko, "global", &json!("plain text"));

        assert_eq!(quality.field_count, 0);
        assert!(!quality.issues.is_empty());
    }

    #[test]
    fn test_truncate_payload_under_limit_is_unchanged() {
        let body = "a".repeat(PAYLOAD_SUMMARY_LIMIT);

        assert_eq!(truncate_payload(&body), body);
    }

    #[test]
    fn test_truncate_payload_over_limit_appends_ellipsis() {
        let body = "a".repeat(PAYLOAD_SUMMARY_LIMIT + 10);

        let truncated = truncate_payload(&body);
        assert_eq!(truncated.chars().count(), PAYLOAD_SUMMARY_LIMIT + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_payload_respects_char_boundaries() {
        let body = "é".repeat(PAYLOAD_SUMMARY_LIMIT + 1);

        let truncated = truncate_payload(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), PAYLOAD_SUMMARY_LIMIT + 3);
    }
}
