use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, BookingDraft, BuyerContact, PaymentProof};
use crate::storage::InventoryStore;

/// Финализация: живой hold -> продажа, одной транзакцией.
pub struct BookingService {
    store: Arc<dyn InventoryStore>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(store: Arc<dyn InventoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Повтор для уже проданного hold возвращает ту же бронь.
    pub async fn commit(
        &self,
        hold_id: Uuid,
        proof: PaymentProof,
        buyer: BuyerContact,
    ) -> EngineResult<Booking> {
        proof.validate()?;
        buyer.validate()?;

        let draft = BookingDraft {
            booking_id: Uuid::new_v4(),
            hold_id,
            payment_fingerprint: proof.fingerprint(),
            payment_reference: proof.reference,
            buyer,
            now: self.clock.now(),
        };
        let draft_id = draft.booking_id;

        match self.store.commit(draft).await {
            Ok(booking) if booking.id == draft_id => {
                info!(
                    "Booking {} created from hold {}: {} seats, {} cents",
                    booking.id,
                    hold_id,
                    booking.seat_ids.len(),
                    booking.amount_cents
                );
                Ok(booking)
            }
            Ok(booking) => {
                info!("Hold {} already committed as booking {}", hold_id, booking.id);
                Ok(booking)
            }
            Err(EngineError::HoldExpired { hold_id }) => {
                info!("Commit rejected: hold {} expired", hold_id);
                Err(EngineError::HoldExpired { hold_id })
            }
            Err(e @ EngineError::Storage(_)) => {
                error!("Commit of hold {} failed: {}", hold_id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_hold(&self, hold_id: Uuid) -> EngineResult<Booking> {
        self.store
            .find_booking_by_hold(hold_id)
            .await?
            .ok_or_else(|| EngineError::not_found("booking", hold_id))
    }
}
