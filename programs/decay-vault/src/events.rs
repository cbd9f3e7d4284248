use anchor_lang::prelude::*;

/// Event emitted the first time a user deposits and their accounts are created
#[event]
pub struct VaultOpened {
    pub owner: Pubkey,
    pub vault: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when lamports are deposited
#[event]
pub struct Deposited {
    pub owner: Pubkey,
    pub vault: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub total_deposits: u64,
    pub timestamp: i64,
}

/// Event emitted when 10% of the vault is withdrawn
#[event]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub vault: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub total_withdrawals: u64,
    pub timestamp: i64,
}
