//! Rocket.Chat REST client used as the default delivery sink

mod client;
mod types;
mod url;

pub use client::RocketClient;
pub use types::{AuthSession, MessageHeader, PostMessage};
pub use url::{api_url, parse_server_url};
