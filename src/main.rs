// ==========================================
// 电视广告投放计划系统 - 命令行入口
// ==========================================
// 用法:
//   tv-campaign-planner health
//   tv-campaign-planner cost <wave_id>
//   tv-campaign-planner discounts <wave_id> <client%> <agency%>
//   tv-campaign-planner redistribute <wave_id> [total_trp]
//   tv-campaign-planner clear-wave <wave_id>
//   tv-campaign-planner view <campaign_id>
//   tv-campaign-planner config
// 数据库路径: TV_PLANNER_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tv_campaign_planner::app::{get_default_db_path, AppState};
use tv_campaign_planner::domain::PlanningContext;
use tv_campaign_planner::engine::parse_lenient;
use tv_campaign_planner::logging;

const ACTOR: &str = "cli";

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", tv_campaign_planner::APP_NAME, tv_campaign_planner::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    let db_path = get_default_db_path();
    let state = AppState::new(db_path.clone())
        .with_context(|| format!("打开数据库失败: {}", db_path))?;

    let runtime = tokio::runtime::Runtime::new().context("创建 tokio 运行时失败")?;
    runtime.block_on(run(&state, command, &args[1..]))
}

async fn run(state: &AppState, command: &str, rest: &[String]) -> Result<()> {
    let api = state.planner_api.as_ref();

    match command {
        "health" => {
            state.health_check()?;
            println!("ok ({})", state.db_path);
        }
        "config" => {
            print_json(&state.config_manager.get_config_snapshot()?)?;
        }
        "cost" => {
            let wave_id = id_arg(rest, 0, "wave_id")?;
            print_json(&api.get_wave_cost(wave_id).await?)?;
        }
        "discounts" => {
            let wave_id = id_arg(rest, 0, "wave_id")?;
            let client = rest.get(1).map(String::as_str).unwrap_or("0");
            let agency = rest.get(2).map(String::as_str).unwrap_or("0");
            let ctx = wave_context(state, wave_id)?;
            let result = api.apply_discounts_text(&ctx, wave_id, client, agency).await?;
            print_json(&result)?;
        }
        "redistribute" => {
            let wave_id = id_arg(rest, 0, "wave_id")?;
            let total = match rest.get(1) {
                Some(raw) => Some(
                    parse_lenient(raw).ok_or_else(|| anyhow!("total_trp 无法解析: {}", raw))?,
                ),
                None => None,
            };
            let ctx = wave_context(state, wave_id)?;
            print_json(&api.redistribute_trp(&ctx, wave_id, total).await?)?;
        }
        "clear-wave" => {
            let wave_id = id_arg(rest, 0, "wave_id")?;
            let ctx = wave_context(state, wave_id)?;
            let cleared = api.clear_wave_trp(&ctx, wave_id).await?;
            println!("cleared {} day(s)", cleared);
        }
        "view" => {
            let campaign_id = id_arg(rest, 0, "campaign_id")?;
            print_json(&api.load_campaign_allocation(campaign_id).await?)?;
        }
        other => {
            print_usage();
            bail!("未知命令: {}", other);
        }
    }

    Ok(())
}

/// 由波段反查所属活动，构造命令上下文
fn wave_context(state: &AppState, wave_id: i64) -> Result<PlanningContext> {
    let wave = state
        .wave_repo
        .find_wave(wave_id)?
        .ok_or_else(|| anyhow!("波段不存在: {}", wave_id))?;
    Ok(PlanningContext::new(wave.campaign_id, ACTOR).with_wave(wave_id))
}

fn id_arg(rest: &[String], index: usize, name: &str) -> Result<i64> {
    let raw = rest
        .get(index)
        .ok_or_else(|| anyhow!("缺少参数 <{}>", name))?;
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("参数 <{}> 不是整数: {}", name, raw))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_usage() {
    println!("{} v{}", tv_campaign_planner::APP_NAME, tv_campaign_planner::VERSION);
    println!();
    println!("命令:");
    println!("  health                                   检查数据库连通性");
    println!("  config                                   打印全局配置");
    println!("  cost <wave_id>                           波段汇总成本");
    println!("  discounts <wave_id> <client%> <agency%>  保存折扣并重算");
    println!("  redistribute <wave_id> [total_trp]       TRP 平均分配");
    println!("  clear-wave <wave_id>                     波段 TRP 清零");
    println!("  view <campaign_id>                       活动 TRP 视图");
}
