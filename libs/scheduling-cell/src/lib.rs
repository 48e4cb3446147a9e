pub mod clock;
pub mod lock;
pub mod models;
pub mod services;
pub mod store;

pub use clock::*;
pub use models::*;
pub use services::*;
pub use store::*;
