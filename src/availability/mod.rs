pub mod blocks;
pub mod conflicts;
pub mod handlers;
pub mod hours;
pub mod models;
pub mod overlap;
pub mod repository;
pub mod service;
pub mod slots;

pub use blocks::*;
pub use conflicts::*;
pub use handlers::*;
pub use hours::*;
pub use models::*;
pub use overlap::*;
pub use repository::*;
pub use service::*;
pub use slots::*;
