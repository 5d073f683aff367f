pub mod connection;
pub mod tls;

pub use connection::{Destination, SecureConnection};
pub use tls::TlsSettings;
