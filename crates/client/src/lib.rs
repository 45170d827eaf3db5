pub mod authority;
pub mod error;
pub mod http;

pub use authority::BookingAuthority;
pub use error::{AuthorityError, AuthorityResult};
pub use http::HttpAuthority;
