pub mod session;

pub use session::{ClientCredentials, ErrorEnvelope};
