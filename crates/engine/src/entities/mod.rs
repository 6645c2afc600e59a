//! Sea-ORM models for the canonical target schema.
//!
//! One module per target table. Natural keys double as primary keys wherever
//! the legacy store already minted a stable id; only `transactions` gets a
//! new surrogate id space.

pub mod bank;
pub mod bank_account_deposit;
pub mod card_payment;
pub mod cash_pickup;
pub mod country;
pub mod kiibank_transfer;
pub mod mobile_money_transfer;
pub mod receiver_detail;
pub mod recipient;
pub mod reinitialize;
pub mod sender;
pub mod staff;
pub mod transaction;
pub mod wallet_operator;
