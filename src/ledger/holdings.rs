use std::collections::BTreeMap;

use crate::ledger::Trade;

/// The number of shares of one symbol a user holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    pub symbol: String,
    pub shares: i64,
}

/// Derive holdings from a trade log.
///
/// Shares are summed per symbol and only symbols with a positive sum are
/// kept. The result is ordered by symbol.
///
/// Sums are accumulated as `i128`. A total that does not fit in an `i64` is
/// logged and dropped.
pub fn summarize_holdings(trades: &[Trade]) -> Vec<Holding> {
    let mut totals: BTreeMap<&str, i128> = BTreeMap::new();

    for trade in trades {
        *totals.entry(trade.symbol.as_str()).or_default() += i128::from(trade.shares);
    }

    totals
        .into_iter()
        .filter(|&(_, shares)| shares > 0)
        .filter_map(|(symbol, shares)| match i64::try_from(shares) {
            Ok(shares) => Some(Holding {
                symbol: symbol.to_owned(),
                shares,
            }),
            Err(_) => {
                tracing::error!("holding of {symbol} has {shares} shares, more than can be stored");
                None
            }
        })
        .collect()
}
