pub mod zone;
pub mod seat;
pub mod layout;
pub mod inventory;
pub mod hold;
pub mod booking;
pub mod seat_event;
pub mod recommendation;

pub use zone::{NamingScheme, Point, SeatCategory, ShapeKind, Zone};
pub use seat::{Seat, SeatId, SeatKey, SeatPlacement};
pub use layout::{RegenerationReport, SeatOverride, VenueLayout, ZoneRecord};
pub use inventory::{AvailabilitySummary, InventorySeat, SeatMapEntry, SeatStatus, SeatStatusView, SeatView};
pub use hold::{Hold, HoldGrant, HoldStatus, SeatClaim};
pub use booking::{Booking, BookingDraft, BuyerContact, PaymentProof};
pub use seat_event::{SeatEvent, SeatEventKind};
pub use recommendation::{Recommendation, RecommendationSet, SeatPreferences};
