use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// グローバルな tracing subscriber を初期化
///
/// `RUST_LOG` が未設定なら `default_filter` を使う。ログは標準エラーへ出し、
/// 標準出力はコマンドの結果表示に残す。
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}
