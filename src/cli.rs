// ==========================================
// 整车产线流转跟踪系统 - 命令行参数
// ==========================================
// 结果以 JSON 输出到 stdout,日志输出到 stderr
// ==========================================

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vehicle-flow-tracker")]
#[command(version, about = "整车产线流转跟踪系统 - 单车逐工位状态跟踪")]
pub struct Cli {
    /// 数据库路径（默认取 VEHICLE_FLOW_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 过滤参数（list / export 共用）
#[derive(clap::Args, Debug, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// 状态（In Progress / Completed / Repair Needed）
    #[arg(long)]
    pub status: Option<String>,
    /// 当前工位
    #[arg(long)]
    pub station: Option<String>,
    /// 车辆编号包含的子串
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// 新增车辆
    Add {
        id: String,
        #[arg(long, default_value = "C43")]
        model: String,
        /// 上线日期 YYYY-MM-DD（缺省为当前时间）
        #[arg(long)]
        start: Option<String>,
    },
    /// 更新单车工位状态
    Update {
        id: String,
        station: String,
        status: String,
    },
    /// 批量更新工位状态
    Bulk {
        station: String,
        status: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// 删除车辆
    Delete { id: String },
    /// 查看单车记录
    Show { id: String },
    /// 按条件列出车辆
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// 列出产线工位
    Stations,
    /// 当日生产统计
    Summary {
        /// 统计日期 YYYY-MM-DD（缺省为今天,UTC）
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// 各工位在制车辆数
    Load,
    /// 完工趋势
    Trend,
    /// 导出明细为 CSV
    Export {
        path: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// 查看或修改配置
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// 全部配置快照
    Show,
    /// 读取单个配置
    Get { key: String },
    /// 写入配置（下次启动生效）
    Set { key: String, value: String },
}
