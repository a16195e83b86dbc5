pub mod broker;
pub mod liveavatar;
pub mod metrics;

pub use broker::SessionBroker;
pub use liveavatar::LiveAvatarClient;
