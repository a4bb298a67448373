use log::debug;
use solana_client::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account_interface::address::get_associated_token_address_with_program_id;

use crate::common::{MINT_LEN, read_mint_decimals, read_mint_initialized};
use crate::error::TransferError;

/// Токен-программа, владеющая минтом.
///
/// Классическая SPL Token и Token-2022 имеют разные program id и разные
/// правила кодирования инструкций, поэтому вариант нужно знать до
/// построения перевода. По одному адресу минта вариант не угадывается -
/// он определяется владельцем mint-аккаунта в сети.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenProgram {
    Legacy,
    Token2022,
}

impl TokenProgram {
    /// Program id соответствующей токен-программы
    pub fn id(&self) -> Pubkey {
        match self {
            TokenProgram::Legacy => spl_token_interface::ID,
            TokenProgram::Token2022 => spl_token_2022_interface::ID,
        }
    }

    /// Определяет вариант по владельцу mint-аккаунта.
    /// None, если владелец не является известной токен-программой.
    pub fn from_owner(owner: &Pubkey) -> Option<Self> {
        if *owner == spl_token_interface::ID {
            Some(TokenProgram::Legacy)
        } else if *owner == spl_token_2022_interface::ID {
            Some(TokenProgram::Token2022)
        } else {
            None
        }
    }
}

/// Метаданные минта, разрешённые перед переводом
#[derive(Clone, Copy, Debug)]
pub struct MintInfo {
    pub pubkey: Pubkey,
    pub program: TokenProgram,
    pub decimals: u8,
}

impl MintInfo {
    /// Читает mint-аккаунт и определяет вариант программы по его владельцу
    pub fn fetch(client: &RpcClient, mint: &Pubkey) -> Result<Self, TransferError> {
        Self::fetch_inner(client, mint, None)
    }

    /// То же, но с заранее известным вариантом: владелец минта обязан
    /// совпадать с ожидаемой программой
    pub fn fetch_with_program(
        client: &RpcClient,
        mint: &Pubkey,
        program: TokenProgram,
    ) -> Result<Self, TransferError> {
        Self::fetch_inner(client, mint, Some(program))
    }

    fn fetch_inner(
        client: &RpcClient,
        mint: &Pubkey,
        expected: Option<TokenProgram>,
    ) -> Result<Self, TransferError> {
        let account = client
            .get_account_with_commitment(mint, CommitmentConfig::confirmed())?
            .value
            .ok_or(TransferError::MintNotFound(*mint))?;

        let program = TokenProgram::from_owner(&account.owner).ok_or(
            TransferError::UnknownProgramVariant {
                mint: *mint,
                owner: account.owner,
            },
        )?;
        if let Some(expected) = expected {
            if program != expected {
                return Err(TransferError::MintNotFound(*mint));
            }
        }

        // Базовая раскладка минта одинакова в обоих вариантах,
        // расширения Token-2022 дописываются после неё
        if account.data.len() < MINT_LEN || !read_mint_initialized(&account) {
            return Err(TransferError::MintNotFound(*mint));
        }
        let decimals = read_mint_decimals(&account);
        debug!("Mint {}: program {:?}, decimals {}", mint, program, decimals);

        Ok(Self {
            pubkey: *mint,
            program,
            decimals,
        })
    }

    /// Детерминированный адрес ассоциированного токен-аккаунта кошелька.
    /// Вывод зависит от program id: Legacy и Token-2022 дают разные
    /// адреса для одной и той же пары (кошелёк, минт).
    pub fn associated_token_address(&self, wallet: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(wallet, &self.pubkey, &self.program.id())
    }

    /// Инструкция перевода, совместимая с вариантом программы минта.
    ///
    /// Legacy использует базовый transfer. Token-2022 требует
    /// transfer_checked: он дополнительно кодирует адрес минта и decimals,
    /// и сеть сверяет их с фактическим минтом аккаунта.
    #[allow(deprecated)]
    pub fn transfer_instruction(
        &self,
        source: &Pubkey,
        destination: &Pubkey,
        owner: &Pubkey,
        base_amount: u64,
    ) -> Result<Instruction, TransferError> {
        let instruction = match self.program {
            TokenProgram::Legacy => spl_token_interface::instruction::transfer(
                &spl_token_interface::ID,
                source,
                destination,
                owner,
                &[],
                base_amount,
            )?,
            TokenProgram::Token2022 => spl_token_2022_interface::instruction::transfer_checked(
                &spl_token_2022_interface::ID,
                source,
                &self.pubkey,
                destination,
                owner,
                &[],
                base_amount,
                self.decimals,
            )?,
        };
        Ok(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_info(program: TokenProgram, decimals: u8) -> MintInfo {
        MintInfo {
            pubkey: Pubkey::new_unique(),
            program,
            decimals,
        }
    }

    #[test]
    fn test_from_owner() {
        assert_eq!(
            TokenProgram::from_owner(&spl_token_interface::ID),
            Some(TokenProgram::Legacy)
        );
        assert_eq!(
            TokenProgram::from_owner(&spl_token_2022_interface::ID),
            Some(TokenProgram::Token2022)
        );
        assert_eq!(TokenProgram::from_owner(&Pubkey::new_unique()), None);
    }

    #[test]
    fn test_associated_token_address_is_deterministic() {
        let wallet = Pubkey::new_unique();
        let mint = mint_info(TokenProgram::Legacy, 6);

        assert_eq!(
            mint.associated_token_address(&wallet),
            mint.associated_token_address(&wallet)
        );
    }

    #[test]
    fn test_associated_token_address_depends_on_program() {
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let legacy = MintInfo {
            pubkey: mint,
            program: TokenProgram::Legacy,
            decimals: 6,
        };
        let token_2022 = MintInfo {
            pubkey: mint,
            program: TokenProgram::Token2022,
            decimals: 6,
        };

        assert_ne!(
            legacy.associated_token_address(&wallet),
            token_2022.associated_token_address(&wallet)
        );
    }

    #[test]
    fn test_legacy_transfer_instruction() {
        let mint = mint_info(TokenProgram::Legacy, 6);
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        // 10 токенов при 6 знаках
        let ix = mint
            .transfer_instruction(&source, &destination, &owner, 10_000_000)
            .unwrap();

        assert_eq!(ix.program_id, spl_token_interface::ID);
        // Базовый transfer: тег 3, затем сумма (u64 LE), минт не кодируется
        assert_eq!(ix.data[0], 3);
        assert_eq!(ix.data[1..9], 10_000_000u64.to_le_bytes());
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.accounts[0].pubkey, source);
        assert_eq!(ix.accounts[1].pubkey, destination);
    }

    #[test]
    fn test_token_2022_transfer_instruction() {
        let mint = mint_info(TokenProgram::Token2022, 6);
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        // 0.05 токена при 6 знаках
        let ix = mint
            .transfer_instruction(&source, &destination, &owner, 50_000)
            .unwrap();

        assert_eq!(ix.program_id, spl_token_2022_interface::ID);
        // transfer_checked: тег 12, сумма (u64 LE), затем decimals
        assert_eq!(ix.data[0], 12);
        assert_eq!(ix.data[1..9], 50_000u64.to_le_bytes());
        assert_eq!(ix.data[9], 6);
        // Минт кодируется вторым аккаунтом
        assert_eq!(ix.accounts[1].pubkey, mint.pubkey);
    }
}
