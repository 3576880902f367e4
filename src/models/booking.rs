use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

use super::seat::SeatId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BuyerContact {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Подтверждение оплаты от платёжного слоя. Протокол шлюза сюда не попадает.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PaymentProof {
    #[validate(length(min = 1, max = 64))]
    pub provider: String,
    #[validate(length(min = 1, max = 256))]
    pub reference: String,
}

impl PaymentProof {
    /// Отпечаток подтверждения, хранится вместо сырых данных.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.provider.as_bytes());
        hasher.update(b":");
        hasher.update(self.reference.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Неизменяемая продажа, созданная из живого hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: i64,
    pub hold_id: Uuid,
    pub session_id: String,
    pub seat_ids: Vec<SeatId>,
    pub buyer: BuyerContact,
    pub amount_cents: i64,
    pub payment_reference: String,
    pub payment_fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// Всё, что финализатор передаёт хранилищу для атомарного коммита.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub booking_id: Uuid,
    pub hold_id: Uuid,
    pub buyer: BuyerContact,
    pub payment_reference: String,
    pub payment_fingerprint: String,
    pub now: DateTime<Utc>,
}
