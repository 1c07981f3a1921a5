// ==========================================
// 整车产线流转跟踪系统 - 命令行入口
// ==========================================
// 用法: vehicle-flow-tracker [--db <path>] <command> [args...]
// 参数定义见 cli.rs；结果以 JSON 输出到 stdout,日志输出到 stderr
// ==========================================

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use vehicle_flow_tracker::api::ApiError;
use vehicle_flow_tracker::app::{get_default_db_path, AppState};
use vehicle_flow_tracker::cli::{Cli, Commands, ConfigCommand, FilterArgs};
use vehicle_flow_tracker::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<ApiError>() {
            Some(api_err) => {
                let view = api_err.to_view();
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&view).unwrap_or_else(|_| view.message.clone())
                );
            }
            None => eprintln!("错误: {:#}", err),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.unwrap_or_else(get_default_db_path);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", vehicle_flow_tracker::APP_NAME, vehicle_flow_tracker::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).await.map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Add { id, model, start } => {
            print_json(&state.vehicle_api.add_vehicle(&id, &model, start.as_deref())?)
        }
        Commands::Update { id, station, status } => {
            print_json(&state.vehicle_api.update_status(&id, &station, &status)?)
        }
        Commands::Bulk { station, status, ids } => {
            print_json(&state.vehicle_api.bulk_update_status(&ids, &station, &status)?)
        }
        Commands::Delete { id } => {
            state.vehicle_api.delete_vehicle(&id)?;
            print_json(&serde_json::json!({ "deleted": id.trim().to_uppercase() }))
        }
        Commands::Show { id } => print_json(&state.vehicle_api.get_vehicle(&id)?),
        Commands::List { filter } => {
            let FilterArgs { status, station, search } = filter;
            print_json(&state.vehicle_api.list_vehicles(
                status.as_deref(),
                station.as_deref(),
                search.as_deref(),
            )?)
        }
        Commands::Stations => print_json(&state.vehicle_api.list_stations()),
        Commands::Summary { date } => print_json(&state.dashboard_api.get_daily_summary(date)?),
        Commands::Load => print_json(&state.dashboard_api.get_station_load()?),
        Commands::Trend => print_json(&state.dashboard_api.get_completion_trend()?),
        Commands::Export { path, filter } => {
            let filter = state.vehicle_api.build_filter(
                filter.status.as_deref(),
                filter.station.as_deref(),
                filter.search.as_deref(),
            )?;
            let rows = state.dashboard_api.export_csv(&path, &filter)?;
            print_json(&serde_json::json!({ "path": path, "rows": rows }))
        }
        Commands::Config { command } => match command.unwrap_or(ConfigCommand::Show) {
            ConfigCommand::Show => {
                let snapshot = state
                    .config_manager
                    .get_config_snapshot()
                    .map_err(|e| anyhow!("读取配置失败: {}", e))?;
                println!("{}", snapshot);
                Ok(())
            }
            ConfigCommand::Get { key } => {
                let value = state
                    .config_manager
                    .get_global_config_value(&key)
                    .map_err(|e| anyhow!("读取配置失败: {}", e))?;
                print_json(&serde_json::json!({ "key": key, "value": value }))
            }
            ConfigCommand::Set { key, value } => {
                state
                    .config_manager
                    .set_global_config_value(&key, &value)
                    .map_err(|e| anyhow!("写入配置失败: {}", e))?;
                // 配置在下次启动时生效
                print_json(&serde_json::json!({ "key": key, "value": value }))
            }
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
