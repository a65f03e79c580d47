mod api_key_auth;
mod service_auth;

pub use api_key_auth::*;
pub use service_auth::*;
