use solana_client::client_error::ClientError;
use solana_sdk::message::CompileError;
use solana_sdk::program_error::ProgramError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::SignerError;
use thiserror::Error;

/// Ошибки перевода SOL и SPL-токенов.
///
/// Ошибки валидации (баланс комиссий, баланс токена, неизвестная
/// токен-программа) возникают до каких-либо изменяющих вызовов к сети.
/// `TransactionNotConfirmed` и `BlockhashExpired` поднимаются уже после
/// рассылки транзакции и для вызывающего неоднозначны: транзакция всё
/// ещё может попасть в сеть позже.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("insufficient SOL to pay transaction fees: have {have} lamports, need at least {need}")]
    InsufficientFeeBalance { have: u64, need: u64 },

    #[error("mint {mint} is owned by unknown program {owner}")]
    UnknownProgramVariant { mint: Pubkey, owner: Pubkey },

    #[error("mint account {0} not found or not a valid mint")]
    MintNotFound(Pubkey),

    #[error("failed to create token account {account}: {reason}")]
    AccountCreationFailed { account: Pubkey, reason: String },

    #[error("insufficient token balance: have {have:?}, need {need}")]
    InsufficientTokenBalance { have: Option<f64>, need: f64 },

    #[error("transaction {0} not confirmed")]
    TransactionNotConfirmed(Signature),

    #[error("blockhash expired before transaction {0} was confirmed")]
    BlockhashExpired(Signature),

    // Транспортные ошибки RPC-слоя пробрасываются как есть
    #[error("rpc error: {0}")]
    Rpc(#[from] ClientError),

    #[error("failed to build instruction: {0}")]
    Instruction(#[from] ProgramError),

    #[error("failed to compile transaction message: {0}")]
    Compile(#[from] CompileError),

    #[error("failed to sign transaction: {0}")]
    Signing(#[from] SignerError),
}
