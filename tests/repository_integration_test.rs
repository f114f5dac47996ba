// ==========================================
// Repository 集成测试
// ==========================================
// 测试目标: 基于临时 SQLite 文件验证各仓储的 CRUD 行为
// ==========================================

mod test_helpers;

use knit_sample_tracker::domain::{
    ColorMatching, KnittingDetail, PanelMeasurement, ProcessRecord, Sample, Totals,
};
use knit_sample_tracker::repository::{
    ColorMatchingRepository, ColorMatchingRepositoryImpl, KnittingRepository,
    KnittingRepositoryImpl, ProcessRepository, ProcessRepositoryImpl, RepositoryError,
    SampleRepository, SampleRepositoryImpl,
};
use std::collections::BTreeMap;
use test_helpers::create_test_db;

fn measurement(weight: f64, time: f64, machine: &str) -> PanelMeasurement {
    PanelMeasurement {
        weight,
        time,
        machine_no: machine.to_string(),
    }
}

#[tokio::test]
async fn test_sample_lifecycle() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = SampleRepositoryImpl::new(&db_path).unwrap();

    repo.create(Sample::new(80, Some("ART-80".into()))).await.unwrap();
    repo.create(Sample::new(74, None)).await.unwrap();

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.iter().map(|s| s.rsn).collect::<Vec<_>>(), vec![74, 80]);

    let updated = repo.update_totals(74, Totals::new(12.5, 3.0)).await.unwrap();
    assert_eq!(updated.total, Totals::new(12.5, 3.0));

    let err = repo.update_totals(999, Totals::default()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_repositories_on_separate_connections_share_file() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let samples = SampleRepositoryImpl::new(&db_path).unwrap();
    let processes = ProcessRepositoryImpl::new(&db_path).unwrap();

    samples.create(Sample::new(74, None)).await.unwrap();
    processes
        .create(ProcessRecord {
            rsn: 74,
            process_name: "Linking".into(),
            employee_id: "E01".into(),
            yarn_used: "Wool".into(),
            yarn_cost: 8.0,
            material2: String::new(),
            material2_cost: 0.0,
            manpower_cost: 2.0,
            user_id: "u1".into(),
        })
        .await
        .unwrap();

    assert_eq!(processes.find_by_rsn(74).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_knitting_upsert_overwrites_whole_record() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    SampleRepositoryImpl::new(&db_path)
        .unwrap()
        .create(Sample::new(74, None))
        .await
        .unwrap();
    let repo = KnittingRepositoryImpl::new(&db_path).unwrap();

    let mut panels = BTreeMap::new();
    panels.insert("Front".to_string(), measurement(120.0, 30.0, "K1"));
    panels.insert("Back".to_string(), measurement(100.0, 25.0, "K2"));
    repo.upsert(KnittingDetail {
        rsn: 74,
        size: "M".into(),
        panels,
        user_id: "u1".into(),
    })
    .await
    .unwrap();

    let mut panels = BTreeMap::new();
    panels.insert("Front".to_string(), measurement(90.0, 20.0, "K3"));
    repo.upsert(KnittingDetail {
        rsn: 74,
        size: "L".into(),
        panels,
        user_id: "u2".into(),
    })
    .await
    .unwrap();

    let stored = repo.find_by_rsn(74).await.unwrap().unwrap();
    assert_eq!(stored.size, "L");
    assert_eq!(stored.user_id, "u2");
    assert_eq!(stored.panels.len(), 1);
    assert_eq!(stored.total(), Totals::new(90.0, 20.0));
}

#[tokio::test]
async fn test_stored_total_is_recomputed_on_read() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    {
        let c = conn.lock().unwrap();
        c.execute(
            "INSERT INTO sample (rsn, created_at, updated_at) VALUES (74, '2024-01-01 00:00:00', '2024-01-01 00:00:00')",
            [],
        )
        .unwrap();
        c.execute(
            r#"INSERT INTO knitting_detail (rsn, size, record_json, total_weight, total_time, user_id, updated_at)
               VALUES (74, 'S', ?1, 999, 999, 'legacy', '2024-01-01 00:00:00')"#,
            [r#"{"RSN":"74","Size":"S","Front":{"Weight":"5","Time":1,"MachineNo":"K1"},"Total":{"Weight":999,"Time":999},"userId":"legacy","note":"x"}"#],
        )
        .unwrap();
    }

    let repo = KnittingRepositoryImpl::from_connection(conn);
    let detail = repo.find_by_rsn(74).await.unwrap().unwrap();
    assert_eq!(detail.rsn, 74);
    assert_eq!(detail.panels.len(), 1);
    assert_eq!(detail.total(), Totals::new(5.0, 1.0));
    assert_eq!(detail.user_id, "legacy");
}

#[tokio::test]
async fn test_color_matching_delete_by_rsn_is_scoped() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let samples = SampleRepositoryImpl::new(&db_path).unwrap();
    samples.create(Sample::new(74, None)).await.unwrap();
    samples.create(Sample::new(75, None)).await.unwrap();

    let repo = ColorMatchingRepositoryImpl::new(&db_path).unwrap();
    for (id, rsn) in [("F74NAYM", 74), ("B74NAYM", 74), ("F75NAYM", 75)] {
        repo.create(ColorMatching {
            color_id: id.into(),
            rsn,
            matching_name: "Navy".into(),
            panel: "Front".into(),
            user_id: "u1".into(),
        })
        .await
        .unwrap();
    }

    assert_eq!(repo.delete_by_rsn(74).await.unwrap(), 2);
    assert!(repo.find_by_rsn(74).await.unwrap().is_empty());
    assert_eq!(repo.find_by_rsn(75).await.unwrap().len(), 1);
    assert_eq!(repo.delete_by_rsn(74).await.unwrap(), 0);
}

#[tokio::test]
async fn test_color_matching_requires_existing_sample() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ColorMatchingRepositoryImpl::new(&db_path).unwrap();
    let err = repo
        .create(ColorMatching {
            color_id: "F1NAYM".into(),
            rsn: 1,
            matching_name: "Navy".into(),
            panel: "Front".into(),
            user_id: "u1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
}
