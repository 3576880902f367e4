pub mod booking;
pub mod holds;
pub mod inventory;
pub mod layout;
pub mod sweeper;

pub use booking::BookingService;
pub use holds::HoldService;
pub use inventory::InventoryService;
pub use layout::LayoutService;
pub use sweeper::HoldSweeper;
