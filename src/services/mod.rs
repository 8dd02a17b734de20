// Core services
pub mod alerts;
pub mod claims;
pub mod preparation_items;

pub use alerts::AlertService;
pub use claims::ClaimService;
pub use preparation_items::PreparationItemService;
