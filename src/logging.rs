// ==========================================
// 整车产线流转跟踪系统 - 日志初始化
// ==========================================
// 输出: stderr（stdout 留给命令的 JSON 结果）
// 格式: 文本（默认）或 JSON 行,由 VEHICLE_FLOW_LOG_FORMAT 选择
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "VEHICLE_FLOW_LOG_FORMAT";

/// 未设置 RUST_LOG 时的过滤器: 本库 info,依赖库只保留 warn
const DEFAULT_FILTER: &str = "warn,vehicle_flow_tracker=info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json, // 每行一个 JSON 对象,便于采集
}

impl LogFormat {
    /// 解析格式名（大小写不敏感）,无法识别时回退为文本
    pub fn from_env_value(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 过滤器,例如 RUST_LOG=vehicle_flow_tracker=debug
/// - VEHICLE_FLOW_LOG_FORMAT: text | json
///
/// 重复调用是无害的,只有第一次生效
pub fn init() {
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
    let builder = fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };
}

/// 测试用日志（debug 级别,输出交给测试框架捕获）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
