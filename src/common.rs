use solana_sdk::account::Account;

// Лампортов в одном SOL (9 знаков)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// Длина базовой раскладки Mint Account (без расширений Token-2022)
pub const MINT_LEN: usize = 82;

// Чтение decimals из Mint Account
pub fn read_mint_decimals(acc: &Account) -> u8 {
    acc.data[44]
}

// Чтение флага is_initialized из Mint Account
pub fn read_mint_initialized(acc: &Account) -> bool {
    acc.data[45] == 1
}

/// Перевод человекочитаемой суммы токена в базовые единицы по decimals минта.
///
/// Округление до ближайшего целого: суммы, представимые ровно в
/// `decimals` знаках, преобразуются туда-обратно без потерь.
pub fn ui_amount_to_base(amount: f64, decimals: u8) -> u64 {
    (amount * 10f64.powi(decimals as i32)).round() as u64
}

/// Обратное преобразование: базовые единицы -> человекочитаемая сумма
pub fn base_to_ui_amount(base: u64, decimals: u8) -> f64 {
    base as f64 / 10f64.powi(decimals as i32)
}

// SOL -> лампорты
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

// Лампорты -> SOL (для логов)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    // Mint Account с заданными decimals и флагом is_initialized
    fn mint_account(decimals: u8, initialized: bool) -> Account {
        let mut data = vec![0u8; MINT_LEN];
        data[44] = decimals;
        data[45] = initialized as u8;
        Account {
            lamports: 1_461_600,
            data,
            owner: Pubkey::new_unique(),
            executable: false,
            rent_epoch: 0,
        }
    }

    #[test]
    fn test_read_mint_fields() {
        let acc = mint_account(6, true);
        assert_eq!(read_mint_decimals(&acc), 6);
        assert!(read_mint_initialized(&acc));

        let acc = mint_account(9, false);
        assert_eq!(read_mint_decimals(&acc), 9);
        assert!(!read_mint_initialized(&acc));
    }

    #[test]
    fn test_ui_amount_to_base() {
        assert_eq!(ui_amount_to_base(0.05, 6), 50_000);
        assert_eq!(ui_amount_to_base(10.0, 6), 10_000_000);
        assert_eq!(ui_amount_to_base(50.0, 6), 50_000_000);
        assert_eq!(ui_amount_to_base(1.0, 0), 1);
    }

    #[test]
    fn test_amount_round_trip() {
        for (amount, decimals) in [(0.05, 6), (10.0, 6), (0.000001, 6), (123.456789, 6), (2.5, 1)] {
            let base = ui_amount_to_base(amount, decimals);
            assert_eq!(base_to_ui_amount(base, decimals), amount);
        }
    }

    #[test]
    fn test_sol_conversion() {
        assert_eq!(sol_to_lamports(0.01), 10_000_000);
        assert_eq!(sol_to_lamports(1.5), 1_500_000_000);
        assert_eq!(lamports_to_sol(1_000_000_000), 1.0);
        assert_eq!(lamports_to_sol(500_000_000), 0.5);
    }
}
