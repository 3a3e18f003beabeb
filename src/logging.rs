use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// `RUST_LOG` が設定されていればそれを優先する
///
/// level = trace|debug|info|warn|error|off
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// stderr へ出力するグローバル subscriber を登録 (プロセスで一度だけ)
pub fn init(level: &str) -> Result<()> {
    Registry::default()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
