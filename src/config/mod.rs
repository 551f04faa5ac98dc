pub mod app;
pub mod policy;

pub use app::{AppConfig, ChannelKind, NotifyConfig, StoreConfig, StoreKind, WeatherConfig};
pub use policy::{load_policy_default, load_policy_from};
