use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use std::path::Path;

use crate::network::Network;
use crate::token::TokenProgram;

#[derive(Debug, Deserialize)]
pub struct TransferEntry {
    pub mint: String,
    /// Сумма в человекочитаемых единицах токена
    pub amount: f64,
    /// "legacy" или "token2022"; если не задан, вариант определяется
    /// по владельцу mint-аккаунта
    #[serde(default)]
    pub token_program: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SolTransferEntry {
    /// Сумма в SOL
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// "mainnet" или "devnet"
    pub network: String,
    /// Приватный ключ отправителя в base58
    pub sender_private_key: String,
    /// Публичный адрес получателя
    pub receiver_public_key: String,
    /// Цена compute unit в микролампортах
    #[serde(default = "default_priority_fee")]
    pub priority_fee_micro_lamports: u64,
    #[serde(default)]
    pub transfers: Vec<TransferEntry>,
    #[serde(default)]
    pub sol_transfers: Vec<SolTransferEntry>,
}

// 0.2 лампорта за compute unit
fn default_priority_fee() -> u64 {
    200_000
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    }

    /// Сеть из конфига; неизвестные значения отклоняются
    pub fn network(&self) -> Result<Network, Box<dyn std::error::Error>> {
        Ok(self.network.parse::<Network>()?)
    }

    /// Ключ отправителя, декодированный из base58-строки конфига
    pub fn sender_keypair(&self) -> Result<Keypair, Box<dyn std::error::Error>> {
        let bytes = bs58::decode(&self.sender_private_key).into_vec()?;
        let keypair = Keypair::try_from(bytes.as_slice())?;
        Ok(keypair)
    }

    /// Публичный адрес получателя
    pub fn receiver(&self) -> Result<Pubkey, Box<dyn std::error::Error>> {
        Ok(self.receiver_public_key.parse()?)
    }
}

impl TransferEntry {
    pub fn mint(&self) -> Result<Pubkey, Box<dyn std::error::Error>> {
        Ok(self.mint.parse()?)
    }

    /// Вариант токен-программы, если он задан в конфиге явно
    pub fn token_program(&self) -> Result<Option<TokenProgram>, Box<dyn std::error::Error>> {
        match self.token_program.as_deref() {
            None => Ok(None),
            Some("legacy") => Ok(Some(TokenProgram::Legacy)),
            Some("token2022") => Ok(Some(TokenProgram::Token2022)),
            Some(other) => Err(format!(
                "unknown token program '{}', expected 'legacy' or 'token2022'",
                other
            )
            .into()),
        }
    }
}
