use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of posting experience to a user's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePosting {
    pub total_exp: Decimal,
    pub rank: i32,
    pub tickets_awarded: i32,
    pub tickets: i32,
}

/// Result of a ticket-award reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAward {
    pub rank: i32,
    pub tickets_awarded: i32,
    pub tickets: i32,
}

/// Result of spending a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSpend {
    pub tickets_remaining: i32,
}
