use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Derive the vault PDA for `user`
pub fn vault_address(user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, user.as_ref()], &crate::ID)
}

/// Derive the interaction counter PDA for `user`
pub fn counter_address(user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COUNTER_SEED, user.as_ref()], &crate::ID)
}

/// Derive the balance record PDA for `user`
pub fn balance_record_address(user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[BALANCE_SEED, user.as_ref()], &crate::ID)
}

/// Recompute `[tag, user, bump]` and check it lands on `address`.
///
/// Uses the stored bump, so this is one hash instead of a bump search.
pub fn verify_address(tag: &[u8], user: &Pubkey, bump: u8, address: &Pubkey) -> Result<()> {
    let expected = Pubkey::create_program_address(&[tag, user.as_ref(), &[bump]], &crate::ID)
        .map_err(|_| error!(VaultError::Unauthorized))?;
    require_keys_eq!(expected, *address, VaultError::Unauthorized);
    Ok(())
}

/// The three per-user addresses, as a client derives them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserAddresses {
    pub vault: Pubkey,
    pub vault_bump: u8,
    pub counter: Pubkey,
    pub counter_bump: u8,
    pub balance_record: Pubkey,
    pub balance_record_bump: u8,
}

impl UserAddresses {
    pub fn derive(user: &Pubkey) -> Self {
        let (vault, vault_bump) = vault_address(user);
        let (counter, counter_bump) = counter_address(user);
        let (balance_record, balance_record_bump) = balance_record_address(user);
        Self {
            vault,
            vault_bump,
            counter,
            counter_bump,
            balance_record,
            balance_record_bump,
        }
    }

    /// Check client-supplied account keys against the derived set
    pub fn verify(&self, vault: &Pubkey, counter: &Pubkey, balance_record: &Pubkey) -> Result<()> {
        require_keys_eq!(*vault, self.vault, VaultError::Unauthorized);
        require_keys_eq!(*counter, self.counter, VaultError::Unauthorized);
        require_keys_eq!(*balance_record, self.balance_record, VaultError::Unauthorized);
        Ok(())
    }
}
