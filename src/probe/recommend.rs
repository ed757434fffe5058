use super::summary::RankedProvider;
use crate::providers::Provider;
use crate::report::Recommendation;

/// Derives recommendations from the ranked working providers and the failed
/// set. Pure function; deterministic for a given input.
pub fn recommend(working: &[RankedProvider], failed: &[Provider]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if working.is_empty() {
        recommendations.push(Recommendation::NoWorkingProviders);
    } else {
        let primary = &working[0];
        recommendations.push(Recommendation::UsePrimary {
            provider: primary.provider,
            success_rate_percent: primary.success_rate_percent,
            average_latency_ms: primary.average_latency_ms,
        });

        if working.len() >= 2 {
            recommendations.push(Recommendation::UseFallbackChain {
                providers: working[1..].iter().map(|ranked| ranked.provider).collect(),
            });
        }
    }

    // Emitted for the market-cap aggregator whenever it works, regardless of
    // its rank.
    if working
        .iter()
        .any(|ranked| ranked.provider == Provider::CoinGecko)
    {
        recommendations.push(Recommendation::RateLimitAdvice {
            provider: Provider::CoinGecko,
            note: "free tier allows roughly one call every 2 seconds; keep the client-side \
                   throttle enabled"
                .to_string(),
        });
    }

    // Assumption under test: an exchange failure here is read as a possible
    // geographic restriction, not a verified classification.
    if failed.contains(&Provider::Binance) {
        recommendations.push(Recommendation::GeoBlockWarning {
            provider: Provider::Binance,
            note: "binance probes failed; this may indicate a geographic restriction rather \
                   than an outage (unverified heuristic)"
                .to_string(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(provider: Provider, rate: f64, latency: f64) -> RankedProvider {
        RankedProvider {
            provider,
            success_rate_percent: rate,
            average_latency_ms: Some(latency),
        }
    }

    #[test]
    fn test_no_working_providers_yields_exactly_one_entry() {
        let recommendations = recommend(&[], &[Provider::Kraken, Provider::CoinCap]);

        assert_eq!(recommendations, [Recommendation::NoWorkingProviders]);
    }

    #[test]
    fn test_single_working_provider_yields_primary_without_chain() {
        let working = [ranked(Provider::Binance, 100.0, 120.0)];

        let recommendations = recommend(&working, &[]);

        assert_eq!(recommendations.len(), 1);
        assert!(matches!(
            recommendations[0],
            Recommendation::UsePrimary {
                provider: Provider::Binance,
                ..
            }
        ));
    }

    #[test]
    fn test_fallback_chain_lists_remaining_providers_in_rank_order() {
        let working = [
            ranked(Provider::Binance, 100.0, 120.0),
            ranked(Provider::Kraken, 80.0, 200.0),
            ranked(Provider::CoinCap, 60.0, 300.0),
        ];

        let recommendations = recommend(&working, &[]);

        assert!(matches!(
            &recommendations[1],
            Recommendation::UseFallbackChain { providers }
                if providers == &[Provider::Kraken, Provider::CoinCap]
        ));
    }

    #[test]
    fn test_rate_limit_advice_emitted_regardless_of_rank() {
        let working = [
            ranked(Provider::Binance, 100.0, 120.0),
            ranked(Provider::CoinGecko, 66.0, 500.0),
        ];

        let recommendations = recommend(&working, &[]);

        assert!(recommendations.iter().any(|r| matches!(
            r,
            Recommendation::RateLimitAdvice {
                provider: Provider::CoinGecko,
                ..
            }
        )));
    }

    #[test]
    fn test_geo_block_warning_on_binance_failure() {
        let working = [ranked(Provider::CoinGecko, 100.0, 500.0)];

        let recommendations = recommend(&working, &[Provider::Binance]);

        assert!(recommendations.iter().any(|r| matches!(
            r,
            Recommendation::GeoBlockWarning {
                provider: Provider::Binance,
                ..
            }
        )));
    }

    #[test]
    fn test_no_geo_block_warning_for_other_failures() {
        let working = [ranked(Provider::Binance, 100.0, 120.0)];

        let recommendations = recommend(&working, &[Provider::Kraken]);

        assert!(!recommendations
            .iter()
            .any(|r| matches!(r, Recommendation::GeoBlockWarning { .. })));
    }
}
