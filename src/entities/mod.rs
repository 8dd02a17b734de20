pub mod alert;
pub mod preparation_item;
pub mod supply_claim;

pub use alert::AlertSeverity;
