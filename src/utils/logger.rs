use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 互動執行
    Compact,
    /// 排程執行 (cron) 時使用，方便集中收集
    Json,
}

impl LogFormat {
    pub fn from_flag(json_logs: bool) -> Self {
        if json_logs {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// 沒有設定 RUST_LOG 時的預設 filter
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "every_election=debug,info"
    } else {
        "every_election=info"
    }
}

pub fn init_logger(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let (compact, json) = match format {
        LogFormat::Compact => (
            Some(fmt::layer().with_target(false).with_thread_ids(false).compact()),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .with_target(true)
                    .json()
                    .with_current_span(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .init();
}
