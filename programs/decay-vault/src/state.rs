use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Per-user vault holding deposited lamports
///
/// Security considerations:
/// - Owner stored in state, set once on first deposit
/// - `balance` tracks deposited value only; the account's lamports are
///   `rent-exempt minimum + balance`
/// - Bump stored for cheap address re-verification
#[account]
#[derive(Default)]
pub struct UserVault {
    /// Wallet that deposits into and withdraws from this vault
    pub owner: Pubkey,              // 32 bytes

    /// Lamports currently held on behalf of the owner
    pub balance: u64,               // 8 bytes

    /// Bump seed for vault PDA
    pub bump: u8,                   // 1 byte
}

/// Running totals of everything a user has moved through their vault
///
/// Totals are denominated in lamports and never decrease.
#[account]
#[derive(Default)]
pub struct InteractionCounter {
    pub owner: Pubkey,              // 32 bytes

    /// Sum of all deposited lamports
    pub total_deposits: u64,        // 8 bytes

    /// Sum of all withdrawn lamports
    pub total_withdrawals: u64,     // 8 bytes

    /// Number of successful deposit calls
    pub deposit_count: u64,         // 8 bytes

    /// Number of successful withdraw calls
    pub withdrawal_count: u64,      // 8 bytes

    pub bump: u8,                   // 1 byte
}

/// Existence anchor created alongside the vault
#[account]
#[derive(Default)]
pub struct BalanceRecord {
    pub owner: Pubkey,              // 32 bytes

    pub bump: u8,                   // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 32],       // 32 bytes
}

/// Shared by the three per-user accounts: a zeroed owner means the
/// account was just created by the deposit handler.
fn open_owner(stored: &mut Pubkey, bump_slot: &mut u8, owner: Pubkey, bump: u8) -> Result<bool> {
    if *stored == Pubkey::default() {
        *stored = owner;
        *bump_slot = bump;
        return Ok(true);
    }
    require_keys_eq!(*stored, owner, VaultError::Unauthorized);
    Ok(false)
}

impl UserVault {
    /// Claim a freshly allocated vault for `owner`, or check that an
    /// existing one already belongs to them. Returns true on creation.
    pub fn open(&mut self, owner: Pubkey, bump: u8) -> Result<bool> {
        open_owner(&mut self.owner, &mut self.bump, owner, bump)
    }

    /// Amount the next withdraw releases: floor(balance / 10)
    ///
    /// Geometric decay: each call takes 10% of what is left, not of
    /// the original deposit.
    pub fn withdrawal_amount(&self) -> Result<u64> {
        require!(self.balance > 0, VaultError::EmptyVault);

        let amount = self
            .balance
            .checked_div(WITHDRAW_DIVISOR)
            .ok_or(error!(VaultError::ArithmeticOverflow))?;

        // balance in 1..=9 floors to zero; reject instead of a no-op
        require!(amount > 0, VaultError::ZeroWithdrawal);
        Ok(amount)
    }
}

impl InteractionCounter {
    pub fn open(&mut self, owner: Pubkey, bump: u8) -> Result<bool> {
        open_owner(&mut self.owner, &mut self.bump, owner, bump)
    }
}

impl BalanceRecord {
    pub fn open(&mut self, owner: Pubkey, bump: u8) -> Result<bool> {
        open_owner(&mut self.owner, &mut self.bump, owner, bump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_vault(balance: u64) -> UserVault {
        UserVault {
            owner: Pubkey::new_unique(),
            balance,
            bump: 255,
        }
    }

    #[test]
    fn test_withdrawal_is_ten_percent() {
        let vault = mock_vault(1_000_000_000);
        assert_eq!(vault.withdrawal_amount().unwrap(), 100_000_000);
    }

    #[test]
    fn test_withdrawal_floors() {
        // 10% of 1_234 is 123.4
        let vault = mock_vault(1_234);
        assert_eq!(vault.withdrawal_amount().unwrap(), 123);

        let vault = mock_vault(10);
        assert_eq!(vault.withdrawal_amount().unwrap(), 1);
    }

    #[test]
    fn test_withdrawal_from_empty_vault() {
        let vault = mock_vault(0);
        assert_eq!(
            vault.withdrawal_amount().unwrap_err(),
            VaultError::EmptyVault.into()
        );
    }

    #[test]
    fn test_withdrawal_below_ten_lamports() {
        for balance in 1..=9 {
            let vault = mock_vault(balance);
            assert_eq!(
                vault.withdrawal_amount().unwrap_err(),
                VaultError::ZeroWithdrawal.into()
            );
        }
    }

    #[test]
    fn test_withdrawal_at_max_balance() {
        let vault = mock_vault(u64::MAX);
        assert_eq!(vault.withdrawal_amount().unwrap(), u64::MAX / 10);
    }

    #[test]
    fn test_open_fresh_vault() {
        let owner = Pubkey::new_unique();
        let mut vault = UserVault::default();

        assert!(vault.open(owner, 254).unwrap());
        assert_eq!(vault.owner, owner);
        assert_eq!(vault.bump, 254);

        // Second open by the same owner is not a creation
        assert!(!vault.open(owner, 254).unwrap());
    }

    #[test]
    fn test_open_rejects_other_owner() {
        let mut vault = mock_vault(500);
        let intruder = Pubkey::new_unique();
        let owner = vault.owner;

        assert_eq!(
            vault.open(intruder, 1).unwrap_err(),
            VaultError::Unauthorized.into()
        );
        // Rejected open leaves the vault untouched
        assert_eq!(vault.owner, owner);
        assert_eq!(vault.bump, 255);
    }

    #[test]
    fn test_balance_record_open() {
        let owner = Pubkey::new_unique();
        let mut record = BalanceRecord::default();

        assert!(record.open(owner, 253).unwrap());
        assert_eq!(record.owner, owner);
        assert_eq!(record._reserved, [0; BALANCE_RECORD_RESERVED]);

        let err = record.open(Pubkey::new_unique(), 253).unwrap_err();
        assert_eq!(err, VaultError::Unauthorized.into());
    }
}
