// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取与默认值回退
// ==========================================

mod test_helpers;

use knit_sample_tracker::config::{config_keys, ConfigManager, WorkflowConfigReader};
use test_helpers::create_test_db;

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_on_empty_table() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_default_user_id().await.unwrap(), "admin");
    let catalog = config.get_process_catalog().await.unwrap();
    assert_eq!(catalog.first().map(String::as_str), Some("Button"));
    assert_eq!(catalog.last().map(String::as_str), Some("Other"));
    assert!(!config.get_compensate_on_partial_failure().await.unwrap());
}

#[tokio::test]
async fn test_values_persist_across_managers() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    ConfigManager::new(&db_path)
        .unwrap()
        .set_config_value(config_keys::COMPENSATE_ON_PARTIAL_FAILURE, "1")
        .unwrap();

    let reopened = ConfigManager::new(&db_path).unwrap();
    assert!(reopened.get_compensate_on_partial_failure().await.unwrap());
}

#[tokio::test]
async fn test_blank_user_falls_back_to_default() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_config_value(config_keys::DEFAULT_USER_ID, "   ")
        .unwrap();
    assert_eq!(config.get_default_user_id().await.unwrap(), "admin");
}

#[tokio::test]
async fn test_malformed_catalog_is_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_config_value(config_keys::PROCESS_CATALOG, "not json")
        .unwrap();
    assert!(config.get_process_catalog().await.is_err());
}
