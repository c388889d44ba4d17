pub mod business;
pub mod intent;
pub mod session;

pub use business::{BusinessProfile, OperatingHours, ServiceOffering};
pub use intent::Intent;
pub use session::{ChatSession, HistoryEntry};
