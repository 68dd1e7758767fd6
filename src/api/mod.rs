pub mod client;
pub mod params;
pub mod registry;
pub mod transport;

pub use client::{Credentials, Zotero, DEFAULT_ENDPOINT};
pub use params::Params;
pub use registry::{CallRegistry, API_METHODS};
pub use transport::{HttpTransport, Transport};
