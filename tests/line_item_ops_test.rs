// ==========================================
// 投放明细命令集成测试
// ==========================================
// 测试范围:
// 1. 新增明细：指数目录解析、价目表补齐、TVC 时长同步、按波段折扣计价
// 2. 保存重算
// 3. 删除明细与空波段级联删除（按配置）
// ==========================================


use test_helpers::*;
use tv_campaign_planner::config::config_keys;
use tv_campaign_planner::domain::index_catalog::{
    DurationIndexEntry, PositionIndexEntry, RateCardEntry, SeasonalIndexEntry,
};
use tv_campaign_planner::domain::line_item::{LineItemPatch, NewLineItem};
use tv_campaign_planner::domain::types::{IndexScope, PositionType};
use tv_campaign_planner::engine::PricingEngine;

fn seed_catalog(env: &TestEnv) {
    let catalog = &env.state.index_catalog_repo;
    let scope = IndexScope::ChannelGroup("AMB Baltics".to_string());

    for (seconds, value) in [(5, 1.35), (10, 1.25), (15, 1.2), (30, 1.0)] {
        catalog
            .upsert_duration_index(&DurationIndexEntry {
                scope: scope.clone(),
                duration_seconds: seconds,
                index_value: value,
                description: None,
            })
            .expect("写入时长指数失败");
    }
    catalog
        .upsert_seasonal_index(&SeasonalIndexEntry {
            scope: scope.clone(),
            month: 3,
            index_value: 1.5,
            description: None,
        })
        .expect("写入季节指数失败");
    catalog
        .upsert_position_index(&PositionIndexEntry {
            scope,
            position_type: PositionType::First,
            index_value: 1.45,
            description: None,
        })
        .expect("写入位置指数失败");
}

fn seed_rate_card(env: &TestEnv) {
    env.state
        .rate_catalog_repo
        .upsert_rate_card(&RateCardEntry {
            channel_group: "AMB Baltics".to_string(),
            target_group: "A25-55".to_string(),
            gross_cpp: 18.4,
            channel_share: Some(0.8),
            pt_zone_share: Some(0.6),
            npt_zone_share: Some(0.4),
            description: Some("TV3".to_string()),
        })
        .expect("写入价目表失败");
}

fn new_item(tvc_id: Option<i64>) -> NewLineItem {
    NewLineItem {
        channel_group: "AMB Baltics".to_string(),
        target_group: "A25-55".to_string(),
        position_type: Some(PositionType::First),
        fields: LineItemPatch {
            tvc_id,
            trp: Some("120".to_string()),
            gross_cpp: Some("35,14 €".to_string()),
            ..LineItemPatch::default()
        },
    }
}

// ==========================================
// 新增
// ==========================================

#[tokio::test]
async fn test_add_line_item_resolves_catalog_indices() {
    println!("\n=== 测试：新增明细从指数目录取值 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    seed_catalog(&env);
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 17)));
    let tvc_id = env.seed_tvc(campaign_id, 15);

    let item = env
        .state
        .planner_api
        .add_line_item(&ctx(campaign_id), wave_id, new_item(Some(tvc_id)))
        .await
        .expect("新增明细失败");

    assert!(item.id > 0);
    assert_eq!(item.clip_duration, Some(15.0), "时长以 TVC 为准");
    assert_eq!(item.duration_index, Some(1.2));
    assert_eq!(item.seasonal_index, Some(1.5));
    assert_eq!(item.position_index, Some(1.45));
    assert_eq!(item.gross_cpp, Some(35.14));

    // 计价结果与引擎一致并已落库
    let config = env.state.planner_api.load_config().expect("读取配置失败");
    let expected = PricingEngine::new().price(&item, &config.pricing);
    assert_close(item.gross_price, expected.gross_price);
    assert!(item.gross_price > 0.0);

    let stored = env.load_item(item.id);
    assert_eq!(stored, item);
}

#[tokio::test]
async fn test_add_line_item_keeps_explicit_index_and_defaults_on_miss() {
    let env = TestEnv::new().expect("无法创建测试环境");
    seed_catalog(&env);
    let campaign_id = env.seed_campaign("Spring");
    // 七月无季节指数记录
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 7, 1)), Some(date(2024, 7, 14)));

    let mut request = new_item(None);
    request.fields.duration_index = Some("1,1".to_string());
    request.fields.clip_duration = Some("12".to_string());

    let item = env
        .state
        .planner_api
        .add_line_item(&ctx(campaign_id), wave_id, request)
        .await
        .expect("新增明细失败");

    assert_eq!(item.duration_index, Some(1.1), "显式值优先于目录");
    assert_eq!(item.seasonal_index, None, "目录未命中保持缺失，计价取默认");
    assert_eq!(item.position_index, Some(1.45));
}

#[tokio::test]
async fn test_add_line_item_prefills_blank_fields_from_rate_card() {
    println!("\n=== 测试：新增明细从价目表补齐基价与份额 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    seed_rate_card(&env);
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 17)));
    let api = &env.state.planner_api;

    let mut blank = new_item(None);
    blank.fields.gross_cpp = None;
    let item = api
        .add_line_item(&ctx(campaign_id), wave_id, blank)
        .await
        .expect("新增明细失败");

    assert_eq!(item.gross_cpp, Some(18.4));
    assert_eq!(item.channel_share, Some(0.8));
    assert_eq!(item.pt_zone_share, Some(0.6));
    assert_eq!(item.npt_zone_share, Some(0.4));
    assert!(item.gross_price > 0.0, "补齐基价后可计价");

    // 显式值优先，只补空白
    let mut explicit = new_item(None);
    explicit.fields.channel_share = Some("0.7".to_string());
    let item = api
        .add_line_item(&ctx(campaign_id), wave_id, explicit)
        .await
        .expect("新增明细失败");
    assert_eq!(item.gross_cpp, Some(35.14));
    assert_eq!(item.channel_share, Some(0.7));
    assert_eq!(item.pt_zone_share, Some(0.6));

    // 目标受众不匹配时不补齐
    let mut other = new_item(None);
    other.target_group = "W25-55".to_string();
    other.fields.gross_cpp = None;
    let item = api
        .add_line_item(&ctx(campaign_id), wave_id, other)
        .await
        .expect("新增明细失败");
    assert_eq!(item.gross_cpp, None);
    assert_eq!(item.channel_share, None);
    assert_close(item.gross_price, 0.0);
}

#[tokio::test]
async fn test_add_line_item_applies_wave_discounts() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 17)));
    let api = &env.state.planner_api;

    api.apply_discounts(&ctx(campaign_id), wave_id, 20.0, 10.0)
        .await
        .expect("保存折扣失败");

    let item = api
        .add_line_item(&ctx(campaign_id), wave_id, new_item(None))
        .await
        .expect("新增明细失败");

    assert_close(item.client_discount_percent, 20.0);
    assert_close(item.net_price, item.gross_price * 0.8);
    assert_close(item.net_net_price, item.gross_price * 0.72);
}

#[tokio::test]
async fn test_add_line_item_rejects_blank_channel_group() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 17)));

    let mut request = new_item(None);
    request.channel_group = "  ".to_string();

    let result = env
        .state
        .planner_api
        .add_line_item(&ctx(campaign_id), wave_id, request)
        .await;
    assert!(result.is_err());
}

// ==========================================
// 保存重算
// ==========================================

#[tokio::test]
async fn test_recompute_line_item_applies_patch() {
    println!("\n=== 测试：保存即重算 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 17)));
    let api = &env.state.planner_api;

    let item = api
        .add_line_item(&ctx(campaign_id), wave_id, new_item(None))
        .await
        .expect("新增明细失败");

    let patch = LineItemPatch {
        trp: Some("60".to_string()),
        ..LineItemPatch::default()
    };
    let updated = api
        .recompute_line_item(&ctx(campaign_id), item.id, patch)
        .await
        .expect("重算失败");

    assert_eq!(updated.trp, Some(60.0));
    assert_close(updated.gross_price, item.gross_price / 2.0);
    assert_eq!(env.load_item(item.id), updated);
}

#[tokio::test]
async fn test_recompute_unknown_line_item_fails() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");

    let result = env
        .state
        .planner_api
        .recompute_line_item(&ctx(campaign_id), 4242, LineItemPatch::default())
        .await;
    assert!(result.is_err());
}

// ==========================================
// 删除与级联
// ==========================================

#[tokio::test]
async fn test_delete_last_item_cascades_wave_by_default() {
    println!("\n=== 测试：删除最后一条明细级联删除波段 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 6)));
    let api = &env.state.planner_api;

    let first = env.seed_item(&reference_item(wave_id));
    let second = env.seed_item(&reference_item(wave_id));
    api.redistribute_trp(&ctx(campaign_id), wave_id, Some(30.0))
        .await
        .expect("分配失败");

    let outcome = api
        .delete_line_item(&ctx(campaign_id), first)
        .await
        .expect("删除失败");
    assert!(!outcome.wave_deleted, "仍有明细时不删除波段");

    let outcome = api
        .delete_line_item(&ctx(campaign_id), second)
        .await
        .expect("删除失败");
    assert!(outcome.wave_deleted);
    assert_eq!(outcome.wave_id, wave_id);

    assert!(env.state.wave_repo.find_wave(wave_id).expect("查询失败").is_none());
    let allocation = api.load_wave_allocation(wave_id).await.expect("读取失败");
    assert!(allocation.days.is_empty(), "日分配随波段级联删除");

    let logs = env
        .state
        .action_log_repo
        .find_by_wave_id(wave_id, 20)
        .expect("查询日志失败");
    assert!(logs.iter().any(|l| l.action_type == "WaveCascadeDelete"));
}

#[tokio::test]
async fn test_delete_last_item_keeps_wave_when_disabled() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.set_config(config_keys::CASCADE_DELETE_ON_LAST_ITEM, "false");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 3, 4)), Some(date(2024, 3, 6)));
    let only = env.seed_item(&reference_item(wave_id));

    let outcome = env
        .state
        .planner_api
        .delete_line_item(&ctx(campaign_id), only)
        .await
        .expect("删除失败");

    assert!(!outcome.wave_deleted);
    assert!(env.state.wave_repo.find_wave(wave_id).expect("查询失败").is_some());
}
