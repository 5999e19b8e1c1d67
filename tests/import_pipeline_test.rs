// ==========================================
// Import pipeline integration tests
// ==========================================
// CSV upload -> mapping -> matching -> manual resolution -> preview ->
// transactional commit, running against a real SQLite database
// ==========================================

mod test_helpers;

use panel_load_calc::config::MatchingConfig;
use panel_load_calc::domain::types::{ImportStep, MatchState, VoltageType};
use panel_load_calc::engine::matching::ManualEntry;
use panel_load_calc::importer::csv_reader::read_csv;
use panel_load_calc::importer::error::ImportError;
use panel_load_calc::importer::session::ImportSession;
use panel_load_calc::repository::line_item_repo::LineItemRepository;
use panel_load_calc::repository::parts_repo::PartsRepository;

/// Seed three catalog parts the fixture CSV can match exactly.
fn seed_catalog(parts: &PartsRepository) {
    let siemens = parts.upsert_manufacturer("Siemens").unwrap();
    let acme = parts.upsert_manufacturer("Acme").unwrap();
    parts.create_part("P-1", siemens, Some("Contactor")).unwrap();
    parts.create_part("P-2", siemens, Some("Relay")).unwrap();
    parts.create_part("P-3", acme, Some("Breaker")).unwrap();
}

/// 10 data rows: 3 catalog hits, 2 destined for manual entry, 5 misses.
const FIXTURE_CSV: &str = "\
Part No,Desc,Mfr,Quantity
P-1,Contactor,Siemens,2
P-2,Relay,Siemens,1
P-3,Breaker,Acme,4
M-1,Custom PSU,,1
M-2,Custom Fan,,3
U-1,Unknown,,1
U-2,Unknown,,1
U-3,Unknown,,1
U-4,Unknown,,1
U-5,Unknown,,1
";

fn mapped_session() -> ImportSession {
    let parsed = read_csv(FIXTURE_CSV.as_bytes()).unwrap();
    let mut session = ImportSession::new();
    session.load_rows(parsed.headers, parsed.rows).unwrap();
    session.set_mapping("part_number", Some("Part No")).unwrap();
    session.set_mapping("description", Some("Desc")).unwrap();
    session.set_mapping("manufacturer", Some("Mfr")).unwrap();
    session.set_mapping("qty", Some("Quantity")).unwrap();
    session
}

#[tokio::test]
async fn test_mapping_gate_blocks_until_required_fields_mapped() {
    let parsed = read_csv(FIXTURE_CSV.as_bytes()).unwrap();
    let mut session = ImportSession::new();
    session.load_rows(parsed.headers, parsed.rows).unwrap();
    assert_eq!(session.step(), ImportStep::Mapping);

    session.set_mapping("part_number", Some("Part No")).unwrap();
    assert!(matches!(
        session.advance_to_matching(),
        Err(ImportError::MissingRequiredMapping(f)) if f == "description"
    ));

    session.set_mapping("description", Some("Desc")).unwrap();
    session.advance_to_matching().unwrap();
    assert_eq!(session.step(), ImportStep::Matching);
}

#[tokio::test]
async fn test_commit_inserts_exactly_matched_plus_manual_rows() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let parts = PartsRepository::new(&db_path).unwrap();
    let items_repo = LineItemRepository::new(&db_path).unwrap();
    seed_catalog(&parts);

    let project_id = items_repo.create_project("Import Target", None).unwrap();
    let table_id = items_repo
        .create_voltage_table(project_id, None, VoltageType::Vac120Single, 0)
        .unwrap();

    let config = MatchingConfig::default();
    let snapshot = parts.catalog_snapshot().unwrap();

    let mut session = mapped_session();
    session.advance_to_matching().unwrap();
    session.run_matching(&config, &snapshot, None).await.unwrap();
    assert_eq!(session.step(), ImportStep::Preview);

    let matched = session
        .match_results()
        .iter()
        .filter(|r| r.state == MatchState::Matched)
        .count();
    assert_eq!(matched, 3);

    // Operator resolves rows 3 and 4 by hand
    for (row_index, watts) in [(3, 75.0), (4, 40.0)] {
        session
            .set_manual_entry(
                row_index,
                ManualEntry {
                    part_number: format!("CUSTOM-{}", row_index),
                    manufacturer: None,
                    description: None,
                    wattage: Some(watts),
                    amperage: None,
                    heat_dissipation_btu: None,
                },
                &config,
            )
            .unwrap();
    }

    let preview = session.preview().unwrap();
    assert_eq!(preview.len(), 5);

    let inserted = session.commit(Some(table_id), &items_repo).await.unwrap();
    assert_eq!(inserted, 5);
    assert_eq!(session.step(), ImportStep::Complete);

    let line_items = items_repo.list_line_items(table_id).unwrap();
    assert_eq!(line_items.len(), 5);

    // Caller row order preserved through sort_order
    for (i, item) in line_items.iter().enumerate() {
        assert_eq!(item.sort_order, i as i64);
    }

    // Matched rows link a part; manual rows carry number and override
    assert!(line_items[0].part_id.is_some());
    assert_eq!(line_items[0].qty, 2);
    assert!(line_items[2].part_id.is_some());
    assert_eq!(line_items[2].qty, 4);

    let manual = &line_items[3];
    assert_eq!(manual.part_id, None);
    assert_eq!(manual.manual_part_number.as_deref(), Some("CUSTOM-3"));
    assert_eq!(manual.wattage_override, Some(75.0));
}

#[tokio::test]
async fn test_skipped_rows_never_reach_the_write() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let parts = PartsRepository::new(&db_path).unwrap();
    let items_repo = LineItemRepository::new(&db_path).unwrap();
    seed_catalog(&parts);

    let project_id = items_repo.create_project("Import Target", None).unwrap();
    let table_id = items_repo
        .create_voltage_table(project_id, None, VoltageType::Dc, 0)
        .unwrap();

    let config = MatchingConfig::default();
    let snapshot = parts.catalog_snapshot().unwrap();

    let mut session = mapped_session();
    session.advance_to_matching().unwrap();
    session.run_matching(&config, &snapshot, None).await.unwrap();

    // Skip one of the matched rows
    session.skip_row(0).unwrap();

    let inserted = session.commit(Some(table_id), &items_repo).await.unwrap();
    assert_eq!(inserted, 2);

    let line_items = items_repo.list_line_items(table_id).unwrap();
    assert!(line_items
        .iter()
        .all(|i| i.description.as_deref() != Some("Contactor")));
}

#[tokio::test]
async fn test_commit_without_target_table_is_rejected() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let parts = PartsRepository::new(&db_path).unwrap();
    let items_repo = LineItemRepository::new(&db_path).unwrap();
    seed_catalog(&parts);

    let config = MatchingConfig::default();
    let snapshot = parts.catalog_snapshot().unwrap();

    let mut session = mapped_session();
    session.advance_to_matching().unwrap();
    session.run_matching(&config, &snapshot, None).await.unwrap();

    assert!(matches!(
        session.commit(None, &items_repo).await,
        Err(ImportError::NoTargetTable)
    ));
    // Nothing was written
    assert_eq!(test_helpers::count_rows(&db_path, "line_items").unwrap(), 0);
}

#[tokio::test]
async fn test_commit_with_zero_eligible_rows_is_rejected() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let parts = PartsRepository::new(&db_path).unwrap();
    let items_repo = LineItemRepository::new(&db_path).unwrap();
    // Empty catalog: every row comes back unmatched

    let project_id = items_repo.create_project("Import Target", None).unwrap();
    let table_id = items_repo
        .create_voltage_table(project_id, None, VoltageType::Dc, 0)
        .unwrap();

    let config = MatchingConfig::default();
    let snapshot = parts.catalog_snapshot().unwrap();

    let mut session = mapped_session();
    session.advance_to_matching().unwrap();
    session.run_matching(&config, &snapshot, None).await.unwrap();

    assert!(matches!(
        session.commit(Some(table_id), &items_repo).await,
        Err(ImportError::NoEligibleRows)
    ));
    assert_eq!(test_helpers::count_rows(&db_path, "line_items").unwrap(), 0);
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let mut session = ImportSession::new();
    assert!(matches!(
        session.load_rows(vec!["A".to_string()], Vec::new()),
        Err(ImportError::EmptyFile)
    ));
    assert_eq!(session.step(), ImportStep::Upload);
}

#[tokio::test]
async fn test_reset_returns_to_upload_stage() {
    let mut session = mapped_session();
    session.advance_to_matching().unwrap();
    session.reset();
    assert_eq!(session.step(), ImportStep::Upload);
    assert!(session.rows().is_empty());
    assert!(session.match_results().is_empty());
}
