use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

use crate::{constants::*, events::*, ledger, pda::UserAddresses, state::*};

/// Deposit lamports into the caller's vault
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Owner must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: All three PDAs re-derived from the signer before anything else
/// ✅ 3. AUTHORITY CHECKS: Stored owner must equal signer on existing accounts
/// ✅ 6. MATH SAFETY: Checked operations on balance and totals
/// ✅ 8. BUSINESS LOGIC: Checks-effects-interactions pattern
/// ✅ 10. EVENTS: Emits VaultOpened / Deposited
///
/// The PDAs are taken unchecked and created in the handler rather than via
/// `init_if_needed`, so an address mismatch is reported as `Unauthorized`.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing lamports
    /// Security: Must be signer, pays for first-time account creation
    #[account(mut)]
    pub owner: Signer<'info>,

    /// User vault PDA, receives the deposited lamports
    /// CHECK: Address re-derived in `verify_addresses`, created or loaded in handler
    #[account(mut)]
    pub user_vault: UncheckedAccount<'info>,

    /// Interaction counter PDA
    /// CHECK: Address re-derived in `verify_addresses`, created or loaded in handler
    #[account(mut)]
    pub interaction_counter: UncheckedAccount<'info>,

    /// Balance record PDA
    /// CHECK: Address re-derived in `verify_addresses`, created or loaded in handler
    #[account(mut)]
    pub balance_record: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

impl<'info> Deposit<'info> {
    /// Re-derive all three addresses from the signer and compare them
    /// with the accounts the client passed in.
    pub fn verify_addresses(&self) -> Result<UserAddresses> {
        let addrs = UserAddresses::derive(&self.owner.key());
        addrs.verify(
            &self.user_vault.key(),
            &self.interaction_counter.key(),
            &self.balance_record.key(),
        )?;
        Ok(addrs)
    }

    /// Load `target`, creating it first if the address has never been used.
    /// A newly created account comes back as `T::default()`.
    fn open_account<T>(
        &self,
        target: &UncheckedAccount<'info>,
        tag: &[u8],
        bump: u8,
        space: usize,
    ) -> Result<T>
    where
        T: AccountDeserialize + Default,
    {
        if target.data_is_empty() && *target.owner == system_program::ID {
            self.create_pda(target, tag, bump, space)?;
            return Ok(T::default());
        }
        load(target)
    }

    fn create_pda(
        &self,
        target: &UncheckedAccount<'info>,
        tag: &[u8],
        bump: u8,
        space: usize,
    ) -> Result<()> {
        let owner_key = self.owner.key();
        let bump_seed = [bump];
        let seeds: &[&[u8]] = &[tag, owner_key.as_ref(), &bump_seed];
        let signer_seeds = &[seeds];

        let required = Rent::get()?.minimum_balance(space);
        let current = target.lamports();
        let program = self.system_program.to_account_info();

        if current == 0 {
            system_program::create_account(
                CpiContext::new_with_signer(
                    program,
                    CreateAccount {
                        from: self.owner.to_account_info(),
                        to: target.to_account_info(),
                    },
                    signer_seeds,
                ),
                required,
                space as u64,
                &crate::ID,
            )?;
            return Ok(());
        }

        // Someone already sent lamports to the address: create_account would
        // fail, so top up, allocate and assign instead.
        let top_up = required.saturating_sub(current);
        if top_up > 0 {
            system_program::transfer(
                CpiContext::new(
                    program.clone(),
                    Transfer {
                        from: self.owner.to_account_info(),
                        to: target.to_account_info(),
                    },
                ),
                top_up,
            )?;
        }
        system_program::allocate(
            CpiContext::new_with_signer(
                program.clone(),
                Allocate {
                    account_to_allocate: target.to_account_info(),
                },
                signer_seeds,
            ),
            space as u64,
        )?;
        system_program::assign(
            CpiContext::new_with_signer(
                program,
                Assign {
                    account_to_assign: target.to_account_info(),
                },
                signer_seeds,
            ),
            &crate::ID,
        )?;
        Ok(())
    }
}

/// Deserialize a program-owned account, checking owner and discriminator
fn load<T: AccountDeserialize>(info: &AccountInfo) -> Result<T> {
    require_keys_eq!(
        *info.owner,
        crate::ID,
        anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
    );
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Write discriminator and fields back into the account
fn store<T: AccountSerialize>(info: &AccountInfo, value: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut dst: &mut [u8] = &mut data[..];
    value.try_serialize(&mut dst)
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let accounts = &*ctx.accounts;
    let owner = accounts.owner.key();

    // CHECKS: Never trust client-supplied addresses
    let addrs = accounts.verify_addresses()?;

    let mut vault: UserVault = accounts.open_account(
        &accounts.user_vault,
        VAULT_SEED,
        addrs.vault_bump,
        USER_VAULT_SIZE,
    )?;
    let mut counter: InteractionCounter = accounts.open_account(
        &accounts.interaction_counter,
        COUNTER_SEED,
        addrs.counter_bump,
        INTERACTION_COUNTER_SIZE,
    )?;
    let mut record: BalanceRecord = accounts.open_account(
        &accounts.balance_record,
        BALANCE_SEED,
        addrs.balance_record_bump,
        BALANCE_RECORD_SIZE,
    )?;

    // Fresh accounts are claimed; existing ones must already be ours
    let opened = vault.open(owner, addrs.vault_bump)?;
    counter.open(owner, addrs.counter_bump)?;
    record.open(owner, addrs.balance_record_bump)?;

    // EFFECTS: Validate and update vault state BEFORE the transfer.
    // Lamports are read after any rent for new accounts was paid.
    let settlement =
        ledger::settle_deposit(&mut vault, &mut counter, accounts.owner.lamports(), amount)?;

    store(&accounts.user_vault, &vault)?;
    store(&accounts.interaction_counter, &counter)?;
    store(&accounts.balance_record, &record)?;

    // INTERACTIONS: Move lamports from owner to vault
    let transfer_ctx = CpiContext::new(
        accounts.system_program.to_account_info(),
        Transfer {
            from: accounts.owner.to_account_info(),
            to: accounts.user_vault.to_account_info(),
        },
    );
    system_program::transfer(transfer_ctx, amount)?;

    let vault_key = accounts.user_vault.key();
    let timestamp = Clock::get()?.unix_timestamp;

    if opened {
        msg!("Opened vault {} for {}", vault_key, owner);
        emit!(VaultOpened {
            owner,
            vault: vault_key,
            timestamp,
        });
    }

    msg!(
        "Deposited {} lamports, vault balance {}",
        settlement.amount,
        settlement.balance
    );
    emit!(Deposited {
        owner,
        vault: vault_key,
        amount: settlement.amount,
        balance: settlement.balance,
        total_deposits: settlement.total_deposits,
        timestamp,
    });

    Ok(())
}
