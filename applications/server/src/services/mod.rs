/// Server services
pub mod identity;
pub mod recordings;
pub mod search;
pub mod session;

pub use identity::{GoogleIdentityProvider, IdentityProvider};
pub use recordings::RecordingStorage;
pub use search::SearchProxy;
pub use session::{LoginRedirects, SessionService};
