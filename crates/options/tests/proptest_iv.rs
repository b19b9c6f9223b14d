use chrono::{Duration, TimeZone, Utc};
use options::{ImpliedVolSolver, OptionContract, OptionRight};
use proptest::prelude::*;

fn right() -> impl Strategy<Value = OptionRight> {
    prop_oneof![Just(OptionRight::Call), Just(OptionRight::Put)]
}

proptest! {
    /// Pricing a near-the-money contract at a known volatility and feeding
    /// that price back recovers the volatility.
    #[test]
    fn implied_vol_recovers_pricing_vol(
        sigma in 0.05f64..1.5,
        spot in 20.0f64..1_000.0,
        moneyness in 0.97f64..1.03,
        days in 14i64..180,
        right in right(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        let solver = ImpliedVolSolver::default();
        let strike = spot * moneyness;
        let t = days as f64 / 365.0;
        let price = solver.model().price(right, spot, strike, t, sigma);

        let contract = OptionContract {
            symbol: "TEST".into(),
            strike,
            right,
            bid: price,
            ask: price,
            expiry: now + Duration::days(days),
        };

        let iv = solver.implied_volatility(&contract, spot, now);
        prop_assert!(iv.is_some(), "no IV for sigma={sigma}, price={price}");
        let iv = iv.unwrap();
        prop_assert!((iv - sigma).abs() < 1e-4, "iv={iv}, sigma={sigma}");
    }

    /// Degenerate quotes never panic and never produce a volatility.
    #[test]
    fn non_positive_mid_or_expiry_yields_none(
        spot in 1.0f64..1_000.0,
        strike in 1.0f64..1_000.0,
        days in -30i64..=0,
        right in right(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        let solver = ImpliedVolSolver::default();
        let expired = OptionContract {
            symbol: "TEST".into(),
            strike,
            right,
            bid: 1.0,
            ask: 2.0,
            expiry: now + Duration::days(days),
        };
        prop_assert!(solver.implied_volatility(&expired, spot, now).is_none());

        let unquoted = OptionContract {
            bid: 0.0,
            ask: 0.0,
            expiry: now + Duration::days(30),
            ..expired
        };
        prop_assert!(solver.implied_volatility(&unquoted, spot, now).is_none());
    }
}
