mod api_key;
mod app;
mod channel;
mod device;
mod stats;
mod user;

pub use api_key::*;
pub use app::*;
pub use channel::*;
pub use device::*;
pub use stats::*;
pub use user::*;
