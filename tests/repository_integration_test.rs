// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 演示数据 → SQLite 读取 → 分析 API 完整链路
// ==========================================


use std::sync::Arc;
use steelworks_defect::api::{ApiError, DefectAnalysisApi};
use steelworks_defect::config::{config_keys, AppConfig, ConfigManager};
use steelworks_defect::domain::TrendClassification;
use steelworks_defect::engine::InspectionEventGateway;
use steelworks_defect::logging;
use steelworks_defect::repository::InspectionEventRepository;

fn seeded_api() -> (tempfile::NamedTempFile, String, DefectAnalysisApi) {
    let (temp_file, db_path) = test_helpers::create_seeded_db().expect("Failed to create test db");
    let repo = InspectionEventRepository::new(&db_path).expect("Failed to open repository");
    let api = DefectAnalysisApi::new(Arc::new(repo));
    (temp_file, db_path, api)
}

#[test]
fn test_seeded_trend_list_order_and_classes() {
    logging::init_test();
    let (_temp_file, _db_path, api) = seeded_api();

    let rows = api.get_defect_trend_list(false).unwrap();
    let summary: Vec<(&str, TrendClassification)> = rows
        .iter()
        .map(|r| (r.defect_code.as_str(), r.trend_classification))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("WELD", TrendClassification::RecurringCritical),
            ("SCALE", TrendClassification::RecurringHighFrequency),
            ("BURR", TrendClassification::IsolatedIncident),
            ("CRACK", TrendClassification::InsufficientData),
        ]
    );

    let weld = &rows[0];
    assert_eq!(weld.total_defects, 3);
    assert_eq!(weld.missing_periods, vec!["2026-W02".to_string()]);

    let scale = &rows[1];
    assert_eq!(scale.impacted_lot_count, 3);
    assert_eq!(scale.weeks_with_defects, 3);
    assert!(scale.missing_periods.is_empty());
}

#[test]
fn test_seeded_recurring_only() {
    let (_temp_file, _db_path, api) = seeded_api();
    let rows = api.get_defect_trend_list(true).unwrap();
    let codes: Vec<&str> = rows.iter().map(|r| r.defect_code.as_str()).collect();
    assert_eq!(codes, vec!["WELD", "SCALE"]);
}

#[test]
fn test_seeded_drilldown_from_database() {
    let (_temp_file, _db_path, api) = seeded_api();

    let detail = api.get_defect_drilldown("WELD").unwrap();
    assert_eq!(detail.records.len(), 2);
    assert_eq!(detail.records[0].lot_id, "LOT-20260115-001");
    assert_eq!(detail.records[0].inspector_name.as_deref(), Some("M. Patel"));
    assert_eq!(detail.records[0].disposition.as_deref(), Some("Hold for MRB"));
    assert!(detail.message.contains("2026-W02"));

    let scale = api.get_defect_drilldown("SCALE").unwrap();
    assert!(scale.message.contains("continuous weekly coverage"));

    let por = api.get_defect_drilldown("POR").unwrap();
    assert!(por.records.is_empty());

    assert!(matches!(
        api.get_defect_drilldown(""),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_defect_free_rows_are_fetched_but_excluded() {
    let (_temp_file, db_path, api) = seeded_api();
    let repo = InspectionEventRepository::new(&db_path).unwrap();

    let frame = repo.fetch_inspection_events().unwrap();
    assert_eq!(frame.len(), 10);
    assert_eq!(repo.count_events().unwrap(), 10);

    assert_eq!(
        api.list_defect_codes().unwrap(),
        vec!["BURR", "CRACK", "SCALE", "WELD"]
    );
}

#[test]
fn test_config_kv_drives_default_filter() {
    let (_temp_file, db_path, _api) = seeded_api();
    let manager = ConfigManager::new(&db_path).unwrap();

    let config = AppConfig::resolve(|_| None, Some(&manager));
    assert!(config.show_recurring_only);

    manager
        .set_global_config_value(config_keys::SHOW_RECURRING_ONLY, "false")
        .unwrap();
    let config = AppConfig::resolve(|_| None, Some(&manager));
    assert!(!config.show_recurring_only);

    // 环境变量优先
    let config = AppConfig::resolve(
        |key| (key == "SHOW_RECURRING_ONLY").then(|| "1".to_string()),
        Some(&manager),
    );
    assert!(config.show_recurring_only);
}
