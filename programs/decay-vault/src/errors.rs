use anchor_lang::prelude::*;

/// Custom error codes for the Decay Vault program
///
/// Every check runs before any account is mutated, so a failed
/// instruction leaves the vault, counter and balance record untouched.
#[error_code]
pub enum VaultError {
    #[msg("Deposit amount must be greater than zero")]
    InvalidAmount,

    #[msg("Depositor does not hold enough lamports to cover the deposit")]
    InsufficientFunds,

    #[msg("Vault is empty - nothing to withdraw")]
    EmptyVault,

    #[msg("Vault balance too small - 10% withdrawal rounds down to zero")]
    ZeroWithdrawal,

    #[msg("Unauthorized - accounts are not derived from or owned by the signer")]
    Unauthorized,

    #[msg("Math overflow occurred during calculation")]
    ArithmeticOverflow,
}
