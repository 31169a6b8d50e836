use serde::Deserialize;

/// Confirmation status as reported by the block explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UtxoStatus {
    pub confirmed: bool,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
}

/// A single unspent transaction output owned by the wallet's address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Utxo {
    /// Transaction ID as a hex string (display order).
    pub txid: String,
    /// Output index within the transaction.
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
    #[serde(default)]
    pub status: UtxoStatus,
}

/// The coin-selection context for one Bitcoin provider.
///
/// Holds the last UTXO snapshot fetched for the wallet's address. The owner
/// decides when it is refreshed; an empty set is treated as stale and is
/// re-fetched before selecting coins.
#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    utxos: Vec<Utxo>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with a freshly fetched one.
    pub fn replace(&mut self, utxos: Vec<Utxo>) {
        self.utxos = utxos;
    }

    /// Drop the snapshot, forcing a refresh on next use.
    pub fn clear(&mut self) {
        self.utxos.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn as_slice(&self) -> &[Utxo] {
        &self.utxos
    }

    /// Sum of all UTXO values in satoshis.
    pub fn total_sat(&self) -> u64 {
        self.utxos.iter().map(|u| u.value).sum()
    }
}

/// Result of UTXO selection: the chosen UTXOs, in spend order, and their sum.
#[derive(Debug, Clone, Default)]
pub struct CoinSelection {
    pub selected: Vec<Utxo>,
    pub total_sat: u64,
}

/// Largest-first greedy selection.
///
/// UTXOs are ordered by value, descending, and taken one at a time until the
/// running sum reaches `target_sat`. The fee is not part of the target; the
/// transaction builder rejects selections that cannot also pay it. If the
/// target is never reached every UTXO is returned.
///
/// This policy is deliberately simple: it does not minimise fee or change.
pub fn select_largest_first(utxos: &[Utxo], target_sat: u64) -> CoinSelection {
    let mut sorted: Vec<&Utxo> = utxos.iter().collect();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));

    let mut selection = CoinSelection::default();
    for utxo in sorted {
        selection.total_sat += utxo.value;
        selection.selected.push(utxo.clone());

        if selection.total_sat >= target_sat {
            break;
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_utxo(txid: &str, value: u64) -> Utxo {
        Utxo {
            txid: txid.to_string(),
            vout: 0,
            value,
            status: UtxoStatus::default(),
        }
    }

    fn values(selection: &CoinSelection) -> Vec<u64> {
        selection.selected.iter().map(|u| u.value).collect()
    }

    #[test]
    fn picks_largest_until_covered() {
        let utxos = vec![
            make_utxo("c", 2),
            make_utxo("a", 5),
            make_utxo("d", 1),
            make_utxo("b", 3),
        ];
        let selection = select_largest_first(&utxos, 6);
        assert_eq!(values(&selection), vec![5, 3]);
        assert_eq!(selection.total_sat, 8);
    }

    #[test]
    fn stops_on_exact_match() {
        let utxos = vec![make_utxo("a", 5), make_utxo("b", 3), make_utxo("c", 2)];
        let selection = select_largest_first(&utxos, 5);
        assert_eq!(values(&selection), vec![5]);
    }

    #[test]
    fn takes_everything_when_short() {
        let utxos = vec![make_utxo("a", 1), make_utxo("b", 2)];
        let selection = select_largest_first(&utxos, 100);
        assert_eq!(values(&selection), vec![2, 1]);
        assert_eq!(selection.total_sat, 3);
    }

    #[test]
    fn empty_input_selects_nothing() {
        let selection = select_largest_first(&[], 1_000);
        assert!(selection.selected.is_empty());
        assert_eq!(selection.total_sat, 0);
    }

    #[test]
    fn does_not_reorder_caller_slice() {
        let utxos = vec![make_utxo("small", 1), make_utxo("large", 9)];
        let _ = select_largest_first(&utxos, 5);
        assert_eq!(utxos[0].txid, "small");
    }

    #[test]
    fn utxo_set_tracks_snapshot() {
        let mut set = UtxoSet::new();
        assert!(set.is_empty());

        set.replace(vec![make_utxo("a", 40_000), make_utxo("b", 60_000)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_sat(), 100_000);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.total_sat(), 0);
    }

    #[test]
    fn deserializes_explorer_json() {
        let json = r#"[
            {"txid":"4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
             "vout":1,
             "status":{"confirmed":true,"block_height":840000,
                       "block_hash":"0000000000000000000320283a032748cef8227873ff4872689bf23f1cda83a5",
                       "block_time":1713571767},
             "value":125000},
            {"txid":"b1fea52486ce0c62bb442b530a3f0132b826c74e473d1f2c220bfa78111c5082",
             "vout":0,
             "status":{"confirmed":false},
             "value":546}
        ]"#;
        let utxos: Vec<Utxo> = serde_json::from_str(json).unwrap();
        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[0].value, 125_000);
        assert_eq!(utxos[0].status.block_height, Some(840_000));
        assert!(!utxos[1].status.confirmed);
        assert_eq!(utxos[1].status.block_hash, None);
    }
}
