use std::str::FromStr;

use solana_sdk::signature::Signature;

/// Сеть Solana, с которой работает клиент.
///
/// Закрытый набор вариантов: неизвестная строка в конфиге отклоняется
/// при загрузке, а не трактуется как devnet по умолчанию.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Devnet,
}

impl Network {
    /// RPC-эндпоинт выбранной сети
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet-beta.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
        }
    }

    /// Ссылка на транзакцию в обозревателе Solscan
    pub fn explorer_tx_url(&self, signature: &Signature) -> String {
        match self {
            Network::Mainnet => format!("https://solscan.io/tx/{}", signature),
            Network::Devnet => format!("https://solscan.io/tx/{}?cluster=devnet", signature),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(format!(
                "unknown network '{}', expected 'mainnet' or 'devnet'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
    }

    #[test]
    fn test_network_parse_rejects_unknown() {
        assert!("testnet".parse::<Network>().is_err());
        assert!("".parse::<Network>().is_err());
        assert!("Mainnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_rpc_url() {
        assert_eq!(
            Network::Mainnet.rpc_url(),
            "https://api.mainnet-beta.solana.com"
        );
        assert_eq!(Network::Devnet.rpc_url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn test_explorer_tx_url() {
        let signature = Signature::default();
        let mainnet = Network::Mainnet.explorer_tx_url(&signature);
        let devnet = Network::Devnet.explorer_tx_url(&signature);

        assert_eq!(mainnet, format!("https://solscan.io/tx/{}", signature));
        assert!(devnet.starts_with("https://solscan.io/tx/"));
        assert!(devnet.ends_with("?cluster=devnet"));
    }
}
