//! Wallet Records

use jiff::Timestamp;
use settle::wallet::LedgerOperation;

use crate::{
    domain::{orders::records::OrderUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Wallet UUID
pub type WalletUuid = TypedUuid<WalletRecord>;

/// Wallet Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    pub uuid: WalletUuid,
    pub user_uuid: UserUuid,
    pub balance: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wallet History UUID
pub type WalletHistoryUuid = TypedUuid<WalletHistoryRecord>;

/// Wallet History Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletHistoryRecord {
    pub uuid: WalletHistoryUuid,
    pub wallet_uuid: WalletUuid,
    pub user_uuid: UserUuid,
    pub order_uuid: Option<OrderUuid>,
    pub operation: LedgerOperation,
    pub amount: u64,
    pub balance: u64,
    pub reason: String,
    pub created_at: Timestamp,
}

/// One page of wallet history, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletHistoryPage {
    pub entries: Vec<WalletHistoryRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// A user's wallet balance. Users who never had a wallet hold zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletBalance {
    pub user_uuid: UserUuid,
    pub balance: u64,
}
