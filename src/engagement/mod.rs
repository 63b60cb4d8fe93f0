pub mod controller;
pub mod intervention;
pub mod reminder;
pub mod state;

pub use controller::EngagementController;
pub use intervention::Intervention;
pub use state::RuntimeState;
