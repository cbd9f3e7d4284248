use anchor_lang::prelude::*;

use crate::{
    errors::VaultError,
    state::{InteractionCounter, UserVault},
};

/// Post-state of one settled deposit or withdraw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Lamports moved by this call
    pub amount: u64,
    pub balance: u64,
    pub total_deposits: u64,
    pub total_withdrawals: u64,
}

impl Settlement {
    fn snapshot(amount: u64, vault: &UserVault, counter: &InteractionCounter) -> Self {
        Self {
            amount,
            balance: vault.balance,
            total_deposits: counter.total_deposits,
            total_withdrawals: counter.total_withdrawals,
        }
    }
}

/// Credit `amount` to the vault and the running deposit totals.
///
/// `available` is the depositor's spendable lamports. Every check runs
/// before the first write, so an error leaves both accounts as they were.
/// Ownership is not checked here: the deposit handler's `open` and the
/// withdraw context's `has_one` are the guards.
pub fn settle_deposit(
    vault: &mut UserVault,
    counter: &mut InteractionCounter,
    available: u64,
    amount: u64,
) -> Result<Settlement> {
    // CHECKS
    require!(amount > 0, VaultError::InvalidAmount);
    require!(available >= amount, VaultError::InsufficientFunds);

    let balance = vault
        .balance
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let total_deposits = counter
        .total_deposits
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let deposit_count = counter
        .deposit_count
        .checked_add(1)
        .ok_or(VaultError::ArithmeticOverflow)?;

    // EFFECTS
    vault.balance = balance;
    counter.total_deposits = total_deposits;
    counter.deposit_count = deposit_count;

    Ok(Settlement::snapshot(amount, vault, counter))
}

/// Release floor(balance / 10) from the vault.
///
/// The caller moves `Settlement::amount` lamports out of the vault after
/// this returns; no state changes on error.
pub fn settle_withdraw(
    vault: &mut UserVault,
    counter: &mut InteractionCounter,
) -> Result<Settlement> {
    // CHECKS
    let amount = vault.withdrawal_amount()?;

    // amount <= balance by construction
    let balance = vault
        .balance
        .checked_sub(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let total_withdrawals = counter
        .total_withdrawals
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let withdrawal_count = counter
        .withdrawal_count
        .checked_add(1)
        .ok_or(VaultError::ArithmeticOverflow)?;

    // EFFECTS
    vault.balance = balance;
    counter.total_withdrawals = total_withdrawals;
    counter.withdrawal_count = withdrawal_count;

    Ok(Settlement::snapshot(amount, vault, counter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(owner: Pubkey) -> (UserVault, InteractionCounter) {
        let vault = UserVault {
            owner,
            balance: 0,
            bump: 255,
        };
        let counter = InteractionCounter {
            owner,
            total_deposits: 0,
            total_withdrawals: 0,
            deposit_count: 0,
            withdrawal_count: 0,
            bump: 254,
        };
        (vault, counter)
    }

    #[test]
    fn test_deposit_then_withdraw() {
        let owner = Pubkey::new_unique();
        let (mut vault, mut counter) = fresh(owner);

        let s = settle_deposit(&mut vault, &mut counter, u64::MAX, 1_000_000_000).unwrap();
        assert_eq!(s.balance, 1_000_000_000);
        assert_eq!(s.total_deposits, 1_000_000_000);

        let s = settle_withdraw(&mut vault, &mut counter).unwrap();
        assert_eq!(s.amount, 100_000_000);
        assert_eq!(s.balance, 900_000_000);
        assert_eq!(s.total_withdrawals, 100_000_000);
        assert_eq!(counter.deposit_count, 1);
        assert_eq!(counter.withdrawal_count, 1);
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let owner = Pubkey::new_unique();
        let (mut vault, mut counter) = fresh(owner);

        let err = settle_deposit(&mut vault, &mut counter, 1_000, 0).unwrap_err();
        assert_eq!(err, VaultError::InvalidAmount.into());
        assert_eq!(counter.deposit_count, 0);
    }

    #[test]
    fn test_deposit_exceeding_funds_rejected() {
        let owner = Pubkey::new_unique();
        let (mut vault, mut counter) = fresh(owner);

        let err = settle_deposit(&mut vault, &mut counter, 999, 1_000).unwrap_err();
        assert_eq!(err, VaultError::InsufficientFunds.into());
        assert_eq!(vault.balance, 0);
    }

    #[test]
    fn test_deposit_overflow_leaves_state_untouched() {
        let owner = Pubkey::new_unique();
        let (mut vault, mut counter) = fresh(owner);
        vault.balance = u64::MAX - 5;
        counter.total_deposits = u64::MAX - 5;

        let err = settle_deposit(&mut vault, &mut counter, u64::MAX, 10).unwrap_err();
        assert_eq!(err, VaultError::ArithmeticOverflow.into());
        assert_eq!(vault.balance, u64::MAX - 5);
        assert_eq!(counter.total_deposits, u64::MAX - 5);
        assert_eq!(counter.deposit_count, 0);
    }

    #[test]
    fn test_counter_overflow_does_not_credit_vault() {
        // Vault has room but the running total does not
        let owner = Pubkey::new_unique();
        let (mut vault, mut counter) = fresh(owner);
        counter.total_deposits = u64::MAX;

        let err = settle_deposit(&mut vault, &mut counter, u64::MAX, 1).unwrap_err();
        assert_eq!(err, VaultError::ArithmeticOverflow.into());
        assert_eq!(vault.balance, 0);
    }

    #[test]
    fn test_withdraw_small_balance_rejected() {
        let owner = Pubkey::new_unique();
        let (mut vault, mut counter) = fresh(owner);
        settle_deposit(&mut vault, &mut counter, u64::MAX, 9).unwrap();

        let err = settle_withdraw(&mut vault, &mut counter).unwrap_err();
        assert_eq!(err, VaultError::ZeroWithdrawal.into());
        assert_eq!(vault.balance, 9);
        assert_eq!(counter.withdrawal_count, 0);
    }
}
