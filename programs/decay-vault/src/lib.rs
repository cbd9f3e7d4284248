// Decay Vault - per-user native SOL vault on Solana
// Withdrawal policy: each withdraw releases floor(balance / 10) of the current balance
// Architecture: three PDAs per user (vault, interaction counter, balance record)

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod state;

use instructions::*;

declare_id!("3Ym3aCtqvj78Y1M7k9yPPxeL4V49uY16LKk24qiuwd3z");

#[program]
pub mod decay_vault {
    use super::*;

    /// Deposit lamports into the caller's vault
    ///
    /// Security considerations:
    /// - Caller must sign and pays for first-time account creation
    /// - Vault, counter and balance record are re-derived from the signer
    /// - Stored owner must match the signer on existing accounts
    /// - Uses checked math for balance and running totals
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw 10% of the vault's current balance back to the caller
    ///
    /// Security considerations:
    /// - No amount argument; the program computes floor(balance / 10)
    /// - Rejects empty vaults and withdrawals that floor to zero
    /// - Vault, counter and balance record are re-derived from the signer
    /// - Emits event for tracking
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler(ctx)
    }
}
