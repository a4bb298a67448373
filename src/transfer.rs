use std::{thread::sleep, time::Duration};

use log::{debug, info};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::instruction::Instruction;
use solana_sdk::message::{VersionedMessage, v0};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::VersionedTransaction;
use spl_associated_token_account_interface::instruction::create_associated_token_account_idempotent;

use crate::common::{lamports_to_sol, sol_to_lamports, ui_amount_to_base};
use crate::error::TransferError;
use crate::token::{MintInfo, TokenProgram};

// Минимальный остаток SOL на отправителе для оплаты комиссий (0.01 SOL)
const MIN_FEE_LAMPORTS: u64 = 10_000_000;

// Число повторов отправки транзакции на стороне RPC
const MAX_SEND_RETRIES: usize = 20;

// Пауза между опросами статуса подтверждения
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Запрос на перевод токена между двумя фиксированными кошельками
pub struct TransferRequest<'a> {
    /// Отправитель; он же плательщик комиссий и создания токен-аккаунтов
    pub sender: &'a Keypair,
    /// Публичный адрес получателя
    pub receiver: Pubkey,
    /// Адрес минта токена
    pub mint: Pubkey,
    /// Сумма в человекочитаемых единицах токена
    pub amount: f64,
    /// Заранее известный вариант токен-программы;
    /// None - определить по владельцу минта
    pub token_program: Option<TokenProgram>,
    /// Цена compute unit в микролампортах (приоритетная комиссия)
    pub priority_fee_micro_lamports: u64,
}

/// Перевод SPL-токена.
///
/// Определяет вариант токен-программы минта, убеждается, что токен-аккаунты
/// обоих участников существуют, проверяет балансы, строит совместимую с
/// вариантом инструкцию перевода и проводит транзакцию до подтверждения.
///
/// # Returns
/// Подпись подтверждённой транзакции. Ошибки валидации поднимаются до
/// каких-либо изменяющих вызовов к сети.
pub fn transfer_token(
    client: &RpcClient,
    request: &TransferRequest,
) -> Result<Signature, TransferError> {
    let sender_pubkey = request.sender.pubkey();

    check_fee_balance(client, &sender_pubkey)?;

    // Вариант программы и decimals минта
    let mint_info = match request.token_program {
        Some(program) => MintInfo::fetch_with_program(client, &request.mint, program)?,
        None => MintInfo::fetch(client, &request.mint)?,
    };
    info!("Token decimals: {}", mint_info.decimals);

    // Токен-аккаунты участников; отсутствующие создаются за счёт отправителя
    let source_account = get_or_create_token_account(
        client,
        request.sender,
        &mint_info,
        &sender_pubkey,
        request.priority_fee_micro_lamports,
    )?;
    let destination_account = get_or_create_token_account(
        client,
        request.sender,
        &mint_info,
        &request.receiver,
        request.priority_fee_micro_lamports,
    )?;

    // Баланс токен-аккаунта отправителя; None - только что созданный (пустой)
    let source_balance = client.get_token_account_balance(&source_account)?;
    info!(
        "Source token account balance: {:?} tokens",
        source_balance.ui_amount
    );
    if !has_sufficient_balance(source_balance.ui_amount, request.amount) {
        return Err(TransferError::InsufficientTokenBalance {
            have: source_balance.ui_amount,
            need: request.amount,
        });
    }

    let base_amount = ui_amount_to_base(request.amount, mint_info.decimals);
    let transfer_ix = mint_info.transfer_instruction(
        &source_account,
        &destination_account,
        &sender_pubkey,
        base_amount,
    )?;

    send_and_confirm(
        client,
        request.sender,
        transfer_ix,
        request.priority_fee_micro_lamports,
    )
}

/// Перевод SOL; та же проверка остатка и тот же путь отправки,
/// что и у перевода токенов
pub fn transfer_sol(
    client: &RpcClient,
    sender: &Keypair,
    receiver: &Pubkey,
    amount_sol: f64,
    priority_fee_micro_lamports: u64,
) -> Result<Signature, TransferError> {
    let sender_pubkey = sender.pubkey();
    check_fee_balance(client, &sender_pubkey)?;

    let lamports = sol_to_lamports(amount_sol);
    info!("Sending {} lamports to {}", lamports, receiver);
    let transfer_ix = solana_system_interface::instruction::transfer(
        &sender_pubkey,
        receiver,
        lamports,
    );
    send_and_confirm(client, sender, transfer_ix, priority_fee_micro_lamports)
}

// Проверка остатка SOL на отправителе до каких-либо изменяющих вызовов.
// Проверка ориентировочная: итоговая комиссия зависит от приоритетной цены.
fn check_fee_balance(client: &RpcClient, sender: &Pubkey) -> Result<(), TransferError> {
    let balance = client.get_balance(sender)?;
    info!("From wallet balance: {} SOL", lamports_to_sol(balance));

    if balance < MIN_FEE_LAMPORTS {
        return Err(TransferError::InsufficientFeeBalance {
            have: balance,
            need: MIN_FEE_LAMPORTS,
        });
    }
    Ok(())
}

// true, если баланс известен и покрывает запрошенную сумму
fn has_sufficient_balance(ui_amount: Option<f64>, requested: f64) -> bool {
    matches!(ui_amount, Some(balance) if balance >= requested)
}

/// Get-or-create ассоциированного токен-аккаунта.
///
/// Идемпотентно: повторные вызовы для той же тройки (кошелёк, минт,
/// программа) возвращают один и тот же адрес, создание выполняется не
/// более одного раза. Создание оплачивается отправителем и проводится
/// отдельной транзакцией до основного перевода.
fn get_or_create_token_account(
    client: &RpcClient,
    payer: &Keypair,
    mint: &MintInfo,
    owner: &Pubkey,
    priority_fee_micro_lamports: u64,
) -> Result<Pubkey, TransferError> {
    let address = mint.associated_token_address(owner);

    let existing = client
        .get_account_with_commitment(&address, CommitmentConfig::confirmed())?
        .value;
    if existing.is_some() {
        debug!("Token account {} already exists", address);
        return Ok(address);
    }

    info!("Creating token account {} for owner {}", address, owner);
    let create_ix = create_associated_token_account_idempotent(
        &payer.pubkey(),
        owner,
        &mint.pubkey,
        &mint.program.id(),
    );
    send_and_confirm(client, payer, create_ix, priority_fee_micro_lamports).map_err(|e| {
        TransferError::AccountCreationFailed {
            account: address,
            reason: e.to_string(),
        }
    })?;

    Ok(address)
}

// Приоритетная комиссия ставится первой инструкцией транзакции
fn with_priority_fee(instruction: Instruction, micro_lamports: u64) -> [Instruction; 2] {
    [
        ComputeBudgetInstruction::set_compute_unit_price(micro_lamports),
        instruction,
    ]
}

/// Сборка и проведение транзакции: приоритетная комиссия, свежий blockhash,
/// versioned-транзакция v0 за подписью плательщика, отправка с повторами
/// на стороне RPC и ожидание подтверждения
fn send_and_confirm(
    client: &RpcClient,
    payer: &Keypair,
    instruction: Instruction,
    priority_fee_micro_lamports: u64,
) -> Result<Signature, TransferError> {
    let instructions = with_priority_fee(instruction, priority_fee_micro_lamports);

    let (blockhash, last_valid_block_height) =
        client.get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())?;

    let message = v0::Message::try_compile(&payer.pubkey(), &instructions, &[], blockhash)?;
    let transaction = VersionedTransaction::try_new(VersionedMessage::V0(message), &[payer])?;

    let signature = client.send_transaction_with_config(
        &transaction,
        RpcSendTransactionConfig {
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            max_retries: Some(MAX_SEND_RETRIES),
            ..Default::default()
        },
    )?;
    debug!("Transaction sent: {}", signature);

    wait_for_confirmation(client, &signature, last_valid_block_height)?;
    Ok(signature)
}

/// Ожидание подтверждения в пределах окна действия blockhash.
///
/// Ошибка исполнения по подписи даёт `TransactionNotConfirmed`; выход
/// высоты блока за `last_valid_block_height` до подтверждения -
/// `BlockhashExpired`.
fn wait_for_confirmation(
    client: &RpcClient,
    signature: &Signature,
    last_valid_block_height: u64,
) -> Result<(), TransferError> {
    loop {
        match client.get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())?
        {
            Some(Ok(())) => {
                debug!("Transaction {} confirmed", signature);
                return Ok(());
            }
            Some(Err(err)) => {
                debug!("Transaction {} failed: {}", signature, err);
                return Err(TransferError::TransactionNotConfirmed(*signature));
            }
            None => {}
        }

        if client.get_block_height()? > last_valid_block_height {
            return Err(TransferError::BlockhashExpired(*signature));
        }
        sleep(CONFIRM_POLL_INTERVAL);
    }
}
