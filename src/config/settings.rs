use crate::config::{Credentials, DispatcherConfig, DisplayOptions, FlushInterval};
use crate::error::{RelayError, Result};
use crate::event::{Level, level_threshold};

/// Load dispatcher configuration from the process environment (and `.env`)
pub fn load_settings() -> Result<DispatcherConfig> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    settings_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from an arbitrary key lookup
pub fn settings_from_lookup<F>(lookup: F) -> Result<DispatcherConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let server_url = var("ROCKETCHAT_URL")
        .ok_or_else(|| RelayError::Config("ROCKETCHAT_URL not set".to_string()))?;
    let channel = var("ROCKETCHAT_CHANNEL")
        .ok_or_else(|| RelayError::Config("ROCKETCHAT_CHANNEL not set".to_string()))?;

    // Token credentials win when both halves are present
    let credentials = match (var("ROCKETCHAT_USER_ID"), var("ROCKETCHAT_TOKEN")) {
        (Some(user_id), Some(token)) => Credentials::Token { user_id, token },
        _ => Credentials::Password {
            email: var("ROCKETCHAT_EMAIL").ok_or_else(|| {
                RelayError::Config(
                    "ROCKETCHAT_EMAIL not set (required without ROCKETCHAT_USER_ID/ROCKETCHAT_TOKEN)"
                        .to_string(),
                )
            })?,
            password: var("ROCKETCHAT_PASSWORD")
                .ok_or_else(|| RelayError::Config("ROCKETCHAT_PASSWORD not set".to_string()))?,
        },
    };

    let display = DisplayOptions {
        title: var("RELAY_TITLE").unwrap_or_else(|| "application".to_string()),
        alias: var("RELAY_ALIAS").unwrap_or_default(),
        emoji: var("RELAY_EMOJI").unwrap_or_default(),
        avatar: var("RELAY_AVATAR").unwrap_or_default(),
        notify_users: var("RELAY_NOTIFY_USERS")
            .map(|users| split_list(&users))
            .unwrap_or_default(),
    };

    let accepted_levels = match (var("RELAY_LEVELS"), var("RELAY_MIN_LEVEL")) {
        (Some(levels), _) => split_list(&levels)
            .iter()
            .map(|name| name.parse::<Level>())
            .collect::<Result<Vec<_>>>()?,
        (None, Some(min)) => level_threshold(min.parse()?),
        (None, None) => Vec::new(),
    };

    let batch_size: i64 = var("RELAY_BATCH_SIZE")
        .unwrap_or_else(|| "8".to_string())
        .trim()
        .parse()
        .map_err(|_| RelayError::Config("Invalid RELAY_BATCH_SIZE".to_string()))?;

    let flush_interval_secs: i64 = var("RELAY_FLUSH_INTERVAL_SECS")
        .unwrap_or_else(|| "10".to_string())
        .trim()
        .parse()
        .map_err(|_| RelayError::Config("Invalid RELAY_FLUSH_INTERVAL_SECS".to_string()))?;

    let queue_capacity: usize = var("RELAY_QUEUE_CAPACITY")
        .unwrap_or_else(|| "16".to_string())
        .trim()
        .parse()
        .map_err(|_| RelayError::Config("Invalid RELAY_QUEUE_CAPACITY".to_string()))?;

    let disabled = match var("RELAY_DISABLED") {
        Some(flag) => parse_bool(&flag)
            .ok_or_else(|| RelayError::Config("Invalid RELAY_DISABLED".to_string()))?,
        None => false,
    };

    Ok(DispatcherConfig::new(server_url, channel, credentials)
        .with_display(display)
        .with_accepted_levels(accepted_levels)
        .with_batch_size(batch_size.max(0) as usize)
        .with_flush_interval(FlushInterval::from_secs(flush_interval_secs))
        .with_queue_capacity(queue_capacity)
        .with_disabled(disabled))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().trim_start_matches('@').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
