// Constants for the Decay Vault program

/// Seed for the user vault PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the interaction counter PDA
pub const COUNTER_SEED: &[u8] = b"counter";

/// Seed for the balance record PDA
pub const BALANCE_SEED: &[u8] = b"balance";

/// Each withdrawal releases `balance / WITHDRAW_DIVISOR` (10%)
pub const WITHDRAW_DIVISOR: u64 = 10;

/// Space for UserVault account (8 discriminator + 32 owner + 8 balance + 1 bump)
pub const USER_VAULT_SIZE: usize = 8 + 32 + 8 + 1;

/// Space for InteractionCounter account (8 discriminator + 32 owner +
/// 8 total_deposits + 8 total_withdrawals + 8 deposit_count +
/// 8 withdrawal_count + 1 bump)
pub const INTERACTION_COUNTER_SIZE: usize = 8 + 32 + 8 + 8 + 8 + 8 + 1;

/// Reserved bytes kept on the balance record for future extension
pub const BALANCE_RECORD_RESERVED: usize = 32;

/// Space for BalanceRecord account (8 discriminator + 32 owner + 1 bump +
/// 32 padding)
pub const BALANCE_RECORD_SIZE: usize = 8 + 32 + 1 + BALANCE_RECORD_RESERVED;
