// ==========================================
// TRP 日分配集成测试
// ==========================================
// 测试范围:
// 1. 自动平均分配（明细 TRP 之和 / 指定总量）
// 2. 自动分配覆盖范围内的人工编辑，保留范围外日值
// 3. 单日人工编辑不归一化
// 4. 波段清零 / 活动清零
// 5. 活动视图：重叠波段并列
// 6. 日期缺失或倒置
// ==========================================


use test_helpers::*;
use tv_campaign_planner::config::config_keys;
use tv_campaign_planner::domain::trp_allocation::DailyTrpMap;
use tv_campaign_planner::domain::line_item::LineItem;

fn item_with_trp(wave_id: i64, trp: f64) -> LineItem {
    let mut item = LineItem::blank(wave_id, "AMB Baltics", "A25-55");
    item.trp = Some(trp);
    item
}

// ==========================================
// 自动分配
// ==========================================

#[tokio::test]
async fn test_redistribute_sums_line_item_trp() {
    println!("\n=== 测试：按明细 TRP 之和平均分配 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 10)));
    env.seed_item(&item_with_trp(wave_id, 60.0));
    env.seed_item(&item_with_trp(wave_id, 40.0));
    // 缺失 TRP 的明细不计入
    env.seed_item(&LineItem::blank(wave_id, "MG grupė", "A25-55"));

    let allocation = env
        .state
        .planner_api
        .redistribute_trp(&ctx(campaign_id), wave_id, None)
        .await
        .expect("自动分配失败");

    assert_eq!(allocation.days.len(), 10);
    assert!(allocation.days.values().all(|v| *v == 10.0));
    assert_close(allocation.total(), 100.0);
}

#[tokio::test]
async fn test_redistribute_keeps_rounding_drift() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 3)));

    let allocation = env
        .state
        .planner_api
        .redistribute_trp(&ctx(campaign_id), wave_id, Some(100.0))
        .await
        .expect("自动分配失败");

    assert!(allocation.days.values().all(|v| *v == 33.33));
    assert_close(allocation.total(), 99.99);
}

#[tokio::test]
async fn test_redistribute_respects_rounding_config() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.set_config(config_keys::TRP_ROUNDING_DECIMALS, "0");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 3)));

    let allocation = env
        .state
        .planner_api
        .redistribute_trp(&ctx(campaign_id), wave_id, Some(100.0))
        .await
        .expect("自动分配失败");

    assert!(allocation.days.values().all(|v| *v == 33.0));
}

#[tokio::test]
async fn test_redistribute_overwrites_in_range_edits_only() {
    println!("\n=== 测试：自动分配覆盖范围内编辑，保留范围外日值 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 5)));
    let api = &env.state.planner_api;

    api.set_trp_day(&ctx(campaign_id), wave_id, date(2024, 1, 2), "42")
        .await
        .expect("编辑失败");
    // 范围外日期（例如波段缩短前留下的）
    api.set_trp_day(&ctx(campaign_id), wave_id, date(2024, 1, 9), "7,5")
        .await
        .expect("范围外编辑应被接受");

    let allocation = api
        .redistribute_trp(&ctx(campaign_id), wave_id, Some(50.0))
        .await
        .expect("自动分配失败");

    assert_eq!(allocation.days.get(&date(2024, 1, 2)), Some(&10.0));
    assert_eq!(allocation.days.get(&date(2024, 1, 9)), Some(&7.5));
    assert_eq!(allocation.days.len(), 6);
}

#[tokio::test]
async fn test_redistribute_is_idempotent() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 2, 27)), Some(date(2024, 3, 2)));
    let api = &env.state.planner_api;

    let first = api
        .redistribute_trp(&ctx(campaign_id), wave_id, Some(25.0))
        .await
        .expect("第一次分配失败");
    let second = api
        .redistribute_trp(&ctx(campaign_id), wave_id, Some(25.0))
        .await
        .expect("第二次分配失败");

    // 2024 闰年：2/27..3/2 共 5 天
    assert_eq!(first.days.len(), 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_redistribute_skips_wave_without_valid_range() {
    println!("\n=== 测试：日期缺失或倒置时不写入 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let inverted = env.seed_wave(campaign_id, "Inverted", Some(date(2024, 1, 10)), Some(date(2024, 1, 1)));
    let open = env.seed_wave(campaign_id, "Open", Some(date(2024, 1, 1)), None);
    let api = &env.state.planner_api;

    for wave_id in [inverted, open] {
        let allocation = api
            .redistribute_trp(&ctx(campaign_id), wave_id, Some(100.0))
            .await
            .expect("应返回空分配而非报错");
        assert!(allocation.days.is_empty());
    }
}

// ==========================================
// 人工编辑
// ==========================================

#[tokio::test]
async fn test_manual_edit_does_not_renormalise() {
    println!("\n=== 测试：单日编辑不影响其他日期 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 4)));
    let api = &env.state.planner_api;

    api.redistribute_trp(&ctx(campaign_id), wave_id, Some(40.0))
        .await
        .expect("自动分配失败");
    api.set_trp_day(&ctx(campaign_id), wave_id, date(2024, 1, 3), "25")
        .await
        .expect("编辑失败");

    let allocation = api.load_wave_allocation(wave_id).await.expect("读取失败");
    assert_eq!(allocation.days.get(&date(2024, 1, 1)), Some(&10.0));
    assert_eq!(allocation.days.get(&date(2024, 1, 3)), Some(&25.0));
    assert_close(allocation.total(), 55.0);
}

#[tokio::test]
async fn test_manual_edit_rejects_unparseable_value() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 4)));

    let result = env
        .state
        .planner_api
        .set_trp_day(&ctx(campaign_id), wave_id, date(2024, 1, 2), "n/a")
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_save_allocation_writes_each_day() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 4)));

    let mut days = DailyTrpMap::new();
    days.insert(date(2024, 1, 1), 12.5);
    days.insert(date(2024, 1, 2), 0.0);
    days.insert(date(2024, 1, 4), 3.25);

    let written = env
        .state
        .planner_api
        .save_trp_allocation(&ctx(campaign_id), wave_id, &days)
        .await
        .expect("保存失败");
    assert_eq!(written, 3);

    let allocation = env
        .state
        .planner_api
        .load_wave_allocation(wave_id)
        .await
        .expect("读取失败");
    assert_eq!(allocation.days, days);
}

// ==========================================
// 清零
// ==========================================

#[tokio::test]
async fn test_clear_wave_zeroes_stored_and_range_days() {
    println!("\n=== 测试：波段清零 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let wave_id = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 3)));
    let api = &env.state.planner_api;

    api.set_trp_day(&ctx(campaign_id), wave_id, date(2024, 1, 2), "9")
        .await
        .expect("编辑失败");
    api.set_trp_day(&ctx(campaign_id), wave_id, date(2024, 1, 20), "4")
        .await
        .expect("编辑失败");

    let cleared = api
        .clear_wave_trp(&ctx(campaign_id), wave_id)
        .await
        .expect("清零失败");
    assert_eq!(cleared, 4, "范围内 3 天 + 范围外 1 天");

    let allocation = api.load_wave_allocation(wave_id).await.expect("读取失败");
    assert_eq!(allocation.days.len(), 4);
    assert!(allocation.days.values().all(|v| *v == 0.0));
}

#[tokio::test]
async fn test_clear_campaign_zeroes_every_wave() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let w1 = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 2)));
    let w2 = env.seed_wave(campaign_id, "W2", Some(date(2024, 1, 5)), Some(date(2024, 1, 7)));
    let api = &env.state.planner_api;

    api.redistribute_trp(&ctx(campaign_id), w1, Some(10.0))
        .await
        .expect("分配失败");
    api.redistribute_trp(&ctx(campaign_id), w2, Some(30.0))
        .await
        .expect("分配失败");

    let cleared = api
        .clear_campaign_trp(&ctx(campaign_id))
        .await
        .expect("活动清零失败");
    assert_eq!(cleared, 5);

    let view = api
        .load_campaign_allocation(campaign_id)
        .await
        .expect("读取活动视图失败");
    assert!(view.waves.iter().all(|w| w.total() == 0.0));
}

// ==========================================
// 活动视图
// ==========================================

#[tokio::test]
async fn test_campaign_view_lists_overlapping_waves_side_by_side() {
    println!("\n=== 测试：重叠波段并列展示 ===");
    let env = TestEnv::new().expect("无法创建测试环境");
    let campaign_id = env.seed_campaign("Spring");
    let w1 = env.seed_wave(campaign_id, "W1", Some(date(2024, 1, 1)), Some(date(2024, 1, 4)));
    let w2 = env.seed_wave(campaign_id, "W2", Some(date(2024, 1, 3)), Some(date(2024, 1, 6)));
    let api = &env.state.planner_api;

    api.redistribute_trp(&ctx(campaign_id), w1, Some(40.0))
        .await
        .expect("分配失败");
    api.redistribute_trp(&ctx(campaign_id), w2, Some(20.0))
        .await
        .expect("分配失败");

    let view = api
        .load_campaign_allocation(campaign_id)
        .await
        .expect("读取活动视图失败");

    assert_eq!(view.waves.len(), 2);
    assert_eq!(view.overlapping_days(), vec![date(2024, 1, 3), date(2024, 1, 4)]);

    let cells = &view.by_day[&date(2024, 1, 3)];
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].wave_name, "W1");
    assert_eq!(cells[1].wave_name, "W2");
    assert_close(view.total_for_day(date(2024, 1, 3)), 15.0);
    assert_close(view.total_for_day(date(2024, 1, 1)), 10.0);
}
