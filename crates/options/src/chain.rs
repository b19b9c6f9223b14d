use chrono::{DateTime, Duration, Utc};

use crate::{OptionContract, OptionRight};

/// Pick the at-the-money call and put.
///
/// The ATM strike is the one nearest `underlying_price`; on a tie the
/// contract that appears first in `chain` wins. Then the first call and the
/// first put at exactly that strike are returned. Either side is `None`
/// when the chain has no such contract.
pub fn atm_options(
    chain: &[OptionContract],
    underlying_price: f64,
) -> (Option<&OptionContract>, Option<&OptionContract>) {
    let Some(atm) = chain.iter().min_by(|a, b| {
        let da = (a.strike - underlying_price).abs();
        let db = (b.strike - underlying_price).abs();
        da.total_cmp(&db)
    }) else {
        return (None, None);
    };

    let at_strike = |right: OptionRight| {
        chain
            .iter()
            .find(|c| c.strike == atm.strike && c.right == right)
    };

    (at_strike(OptionRight::Call), at_strike(OptionRight::Put))
}

/// Narrows a chain to strikes around the money and near expiries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainFilter {
    /// Strike steps kept on each side of the ATM strike.
    pub strike_window: usize,
    pub max_expiry_days: i64,
}

impl Default for ChainFilter {
    fn default() -> Self {
        Self {
            strike_window: 2,
            max_expiry_days: 30,
        }
    }
}

impl ChainFilter {
    /// Contracts expiring within `[now, now + max_expiry_days]` whose strike
    /// lies within `strike_window` distinct strikes of the one nearest
    /// `underlying_price`. Chain order is preserved.
    pub fn apply(
        &self,
        chain: &[OptionContract],
        underlying_price: f64,
        now: DateTime<Utc>,
    ) -> Vec<OptionContract> {
        // Out-of-range windows leave expiries unbounded above.
        let horizon = Duration::try_days(self.max_expiry_days).and_then(|d| now.checked_add_signed(d));
        let live: Vec<&OptionContract> = chain
            .iter()
            .filter(|c| c.expiry >= now && horizon.map_or(true, |h| c.expiry <= h))
            .collect();

        let mut strikes: Vec<f64> = live.iter().map(|c| c.strike).collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();

        let Some(atm_idx) = strikes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - underlying_price).abs().total_cmp(&(*b - underlying_price).abs())
            })
            .map(|(i, _)| i)
        else {
            return Vec::new();
        };

        let lo = strikes[atm_idx.saturating_sub(self.strike_window)];
        let hi = strikes[(atm_idx + self.strike_window).min(strikes.len() - 1)];

        live.into_iter()
            .filter(|c| c.strike >= lo && c.strike <= hi)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 14, 0, 0).unwrap()
    }

    fn c(symbol: &str, strike: f64, right: OptionRight, days: i64) -> OptionContract {
        OptionContract {
            symbol: symbol.into(),
            strike,
            right,
            bid: 1.0,
            ask: 1.2,
            expiry: now() + Duration::days(days),
        }
    }

    fn ladder(strikes: &[f64]) -> Vec<OptionContract> {
        strikes
            .iter()
            .flat_map(|&k| {
                [
                    c(&format!("C{k}"), k, OptionRight::Call, 14),
                    c(&format!("P{k}"), k, OptionRight::Put, 14),
                ]
            })
            .collect()
    }

    #[test]
    fn nearest_strike_is_atm() {
        let chain = ladder(&[90.0, 100.0, 110.0]);
        let (call, put) = atm_options(&chain, 101.0);
        assert_eq!(call.unwrap().symbol, "C100");
        assert_eq!(put.unwrap().symbol, "P100");
    }

    #[test]
    fn tie_goes_to_first_contract_in_chain() {
        let chain = ladder(&[110.0, 100.0]);
        let (call, put) = atm_options(&chain, 105.0);
        assert_eq!(call.unwrap().strike, 110.0);
        assert_eq!(put.unwrap().strike, 110.0);
    }

    #[test]
    fn first_match_per_side_wins() {
        let mut chain = ladder(&[100.0]);
        chain.push(c("C100-late", 100.0, OptionRight::Call, 21));
        let (call, _) = atm_options(&chain, 100.0);
        assert_eq!(call.unwrap().symbol, "C100");
    }

    #[test]
    fn missing_side_is_none() {
        let chain = vec![
            c("C100", 100.0, OptionRight::Call, 7),
            c("P105", 105.0, OptionRight::Put, 7),
        ];
        let (call, put) = atm_options(&chain, 100.5);
        assert!(call.is_some());
        assert!(put.is_none());
    }

    #[test]
    fn empty_chain_yields_nothing() {
        assert_eq!(atm_options(&[], 100.0), (None, None));
    }

    #[test]
    fn filter_keeps_two_strikes_each_side() {
        let chain = ladder(&[80.0, 90.0, 95.0, 100.0, 105.0, 110.0, 120.0]);
        let kept = ChainFilter::default().apply(&chain, 99.0, now());
        let mut strikes: Vec<f64> = kept.iter().map(|c| c.strike).collect();
        strikes.dedup();
        assert_eq!(strikes, vec![90.0, 95.0, 100.0, 105.0, 110.0]);
    }

    #[test]
    fn filter_drops_expired_and_far_expiries() {
        let chain = vec![
            c("old", 100.0, OptionRight::Call, -1),
            c("near", 100.0, OptionRight::Call, 5),
            c("edge", 100.0, OptionRight::Put, 30),
            c("far", 100.0, OptionRight::Put, 31),
        ];
        let kept = ChainFilter::default().apply(&chain, 100.0, now());
        let names: Vec<&str> = kept.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(names, vec!["near", "edge"]);
    }

    #[test]
    fn huge_expiry_window_keeps_all_live_contracts() {
        let filter = ChainFilter { strike_window: 2, max_expiry_days: 100_000_000 };
        assert!(filter.apply(&[], 100.0, now()).is_empty());

        let chain = vec![
            c("old", 100.0, OptionRight::Call, -1),
            c("far", 100.0, OptionRight::Put, 4_000),
        ];
        let kept = ChainFilter { strike_window: 2, max_expiry_days: i64::MAX }.apply(&chain, 100.0, now());
        let names: Vec<&str> = kept.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(names, vec!["far"]);
    }

    #[test]
    fn filter_window_clamps_at_ladder_edges() {
        let chain = ladder(&[100.0, 105.0, 110.0, 115.0]);
        let kept = ChainFilter::default().apply(&chain, 99.0, now());
        let mut strikes: Vec<f64> = kept.iter().map(|c| c.strike).collect();
        strikes.dedup();
        assert_eq!(strikes, vec![100.0, 105.0, 110.0]);
    }
}
