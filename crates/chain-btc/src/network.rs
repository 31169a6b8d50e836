use bitcoin::Network;

/// Bitcoin networks the wallet can be configured for. The wallet's
/// `testnet` setting maps to signet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtcNetwork {
    Mainnet,
    Signet,
}

impl BtcNetwork {
    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Signet => Network::Signet,
        }
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Signet => write!(f, "signet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_bitcoin_network() {
        assert_eq!(BtcNetwork::Mainnet.to_bitcoin_network(), Network::Bitcoin);
        assert_eq!(BtcNetwork::Signet.to_bitcoin_network(), Network::Signet);
    }

    #[test]
    fn display_names() {
        assert_eq!(BtcNetwork::Mainnet.to_string(), "mainnet");
        assert_eq!(BtcNetwork::Signet.to_string(), "signet");
    }
}
