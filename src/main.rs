use solana_client::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::signer::Signer;

mod common;
mod config;
mod error;
mod network;
mod token;
mod transfer;

use config::Config;
use crate::transfer::{TransferRequest, transfer_sol, transfer_token};

fn main() {
    env_logger::init();

    let cfg = Config::from_file("config.toml").expect("Failed to read config");

    let network = cfg.network().expect("Invalid network in config");
    let sender = cfg
        .sender_keypair()
        .expect("Invalid sender private key in config");
    let receiver = cfg
        .receiver()
        .expect("Invalid receiver public key in config");

    println!("Network: {:?} ({})", network, network.rpc_url());
    println!("Sender: {}", sender.pubkey());
    println!("Receiver: {}", receiver);

    let client = RpcClient::new_with_commitment(
        network.rpc_url().to_string(),
        CommitmentConfig::confirmed(),
    );

    // Переводы SOL
    for entry in &cfg.sol_transfers {
        println!("Sending {} SOL to {}", entry.amount, receiver);
        match transfer_sol(
            &client,
            &sender,
            &receiver,
            entry.amount,
            cfg.priority_fee_micro_lamports,
        ) {
            Ok(signature) => {
                println!("Transaction signature: {}", network.explorer_tx_url(&signature));
            }
            Err(e) => {
                eprintln!("SOL transfer failed: {}", e);
            }
        }
    }

    // Переводы токенов; каждый запрос выполняется и отчитывается отдельно
    for entry in &cfg.transfers {
        let mint = match entry.mint() {
            Ok(mint) => mint,
            Err(e) => {
                eprintln!("Invalid mint {}: {}", entry.mint, e);
                continue;
            }
        };
        let token_program = match entry.token_program() {
            Ok(program) => program,
            Err(e) => {
                eprintln!("Invalid token program for mint {}: {}", entry.mint, e);
                continue;
            }
        };

        println!("Sending {} of {} to {}", entry.amount, mint, receiver);
        let request = TransferRequest {
            sender: &sender,
            receiver,
            mint,
            amount: entry.amount,
            token_program,
            priority_fee_micro_lamports: cfg.priority_fee_micro_lamports,
        };
        match transfer_token(&client, &request) {
            Ok(signature) => {
                println!("Transaction signature: {}", network.explorer_tx_url(&signature));
            }
            Err(e) => {
                eprintln!("Token transfer failed for mint {}: {}", mint, e);
            }
        }
    }
}
