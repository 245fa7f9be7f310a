pub mod accrual;
pub mod progression;

pub use accrual::{mine, passive_tick};
pub use progression::{apply_purchase, PlayerState, PurchaseError, PurchaseReceipt};
