// 指数目录初始化脚本：写入 AMB Baltics / MG grupė 的标准时长、季节、位置指数
//
// Usage:
//   cargo run --bin seed_index_catalog -- [db_path]
//
// 已存在的记录按 (作用域, 键) 覆盖，可重复执行

use std::error::Error;

use tv_campaign_planner::app::{get_default_db_path, AppState};
use tv_campaign_planner::domain::index_catalog::{
    DurationIndexEntry, PositionIndexEntry, SeasonalIndexEntry, DEFAULT_DURATION_BRACKETS,
};
use tv_campaign_planner::domain::types::{IndexScope, PositionType};
use tv_campaign_planner::logging;

struct ChannelGroupSeed {
    name: &'static str,
    seasonal: [f64; 12],
    // 首位 / 第二位 / 末位 / 其他
    position: [f64; 4],
}

const SEEDS: &[ChannelGroupSeed] = &[
    ChannelGroupSeed {
        name: "AMB Baltics",
        seasonal: [0.9, 0.95, 1.5, 1.55, 1.6, 1.55, 1.1, 1.1, 1.65, 1.65, 1.65, 1.5],
        position: [1.45, 1.3, 1.3, 1.2],
    },
    ChannelGroupSeed {
        name: "MG grupė",
        seasonal: [0.9, 1.0, 1.4, 1.45, 1.45, 1.4, 0.95, 1.0, 1.60, 1.65, 1.65, 1.5],
        position: [1.5, 1.4, 1.4, 1.3],
    },
];

const POSITIONS: [PositionType; 4] = [
    PositionType::First,
    PositionType::Second,
    PositionType::Last,
    PositionType::Other,
];

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path.clone())?;
    let catalog = &state.index_catalog_repo;

    for seed in SEEDS {
        let scope = IndexScope::ChannelGroup(seed.name.to_string());

        for (from, _, value, label) in DEFAULT_DURATION_BRACKETS {
            catalog.upsert_duration_index(&DurationIndexEntry {
                scope: scope.clone(),
                duration_seconds: *from,
                index_value: *value,
                description: Some(label.to_string()),
            })?;
        }

        for (month, value) in (1u32..).zip(seed.seasonal) {
            catalog.upsert_seasonal_index(&SeasonalIndexEntry {
                scope: scope.clone(),
                month,
                index_value: value,
                description: None,
            })?;
        }

        for (position_type, value) in POSITIONS.into_iter().zip(seed.position) {
            catalog.upsert_position_index(&PositionIndexEntry {
                scope: scope.clone(),
                position_type,
                index_value: value,
                description: None,
            })?;
        }

        tracing::info!(channel_group = seed.name, "指数目录已写入");
    }

    println!("seeded {} channel group(s) into {}", SEEDS.len(), db_path);
    Ok(())
}
