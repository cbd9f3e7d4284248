use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, ledger, pda, state::*};

/// Withdraw 10% of the vault's current balance back to its owner
///
/// Account keys are re-derived in the handler rather than through
/// `seeds`, so a vault belonging to someone else fails with
/// `Unauthorized` instead of a generic constraint error.
///
/// `has_one = owner` on the three accounts is the only ownership check;
/// the handler and ledger rely on it.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Vault owner, receives the withdrawn lamports
    #[account(mut)]
    pub owner: Signer<'info>,

    /// User vault PDA
    /// Security: has_one validates owner from state
    #[account(
        mut,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub user_vault: Account<'info, UserVault>,

    /// Interaction counter PDA
    #[account(
        mut,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub interaction_counter: Account<'info, InteractionCounter>,

    /// Balance record PDA, only checked for existence and ownership
    #[account(
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub balance_record: Account<'info, BalanceRecord>,

    pub system_program: Program<'info, System>,
}

impl<'info> Withdraw<'info> {
    /// Recompute each address from the signer and the stored bump
    pub fn verify_addresses(&self) -> Result<()> {
        let owner = self.owner.key();
        pda::verify_address(
            VAULT_SEED,
            &owner,
            self.user_vault.bump,
            &self.user_vault.key(),
        )?;
        pda::verify_address(
            COUNTER_SEED,
            &owner,
            self.interaction_counter.bump,
            &self.interaction_counter.key(),
        )?;
        pda::verify_address(
            BALANCE_SEED,
            &owner,
            self.balance_record.bump,
            &self.balance_record.key(),
        )
    }
}

pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    let owner = ctx.accounts.owner.key();

    // CHECKS: Stored owners were matched by has_one; addresses are checked here
    ctx.accounts.verify_addresses()?;

    // EFFECTS: Compute 10% and update vault state BEFORE moving lamports
    let settlement = ledger::settle_withdraw(
        &mut ctx.accounts.user_vault,
        &mut ctx.accounts.interaction_counter,
    )?;

    // INTERACTIONS: The program owns the vault, so it debits it directly.
    // Rent-exempt lamports sit outside `balance` and are never touched.
    ctx.accounts.user_vault.sub_lamports(settlement.amount)?;
    ctx.accounts.owner.add_lamports(settlement.amount)?;

    msg!(
        "Withdrew {} lamports, vault balance {}",
        settlement.amount,
        settlement.balance
    );
    emit!(Withdrawn {
        owner,
        vault: ctx.accounts.user_vault.key(),
        amount: settlement.amount,
        balance: settlement.balance,
        total_withdrawals: settlement.total_withdrawals,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
