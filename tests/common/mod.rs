pub mod mock_server;

use rocket_log_relay::config::{Credentials, DispatcherConfig, FlushInterval};

pub use mock_server::MockServer;

pub fn password_config(server: &MockServer, password: &str) -> DispatcherConfig {
    DispatcherConfig::new(
        server.url(),
        "#ops",
        Credentials::Password {
            email: "relay@example.com".to_string(),
            password: password.to_string(),
        },
    )
    .with_flush_interval(FlushInterval::Disabled)
}
