use super::*;
use crate::error::ProcessorError;
use crate::models::{ArchiveReference, SkipReason, UnitOutcome};

fn reference(name: &str) -> ArchiveReference {
    ArchiveReference {
        name: name.to_string(),
        path: PathBuf::from(name),
    }
}

fn run_single(name: &str, archive: Vec<u8>) -> crate::error::Result<UnitOutcome<crate::models::ArchiveSummary>> {
    let temp_dir = TempDir::new().unwrap();
    let mut store = MemoryStore::new();
    store.insert(name, archive);
    let mut processor = processor_for(store, &temp_dir);
    processor.process_archive(&reference(name))
}

#[test]
fn test_unresolved_period_is_skipped() {
    let archive = build_archive(&[("dados.csv", &statement_csv(&[("EVENTOS", "1,00")]))]);
    let outcome = run_single("sem_padrao.zip", archive).unwrap();
    assert_eq!(outcome, UnitOutcome::Skipped(SkipReason::UnresolvedPeriod));
}

#[test]
fn test_archive_without_data_file_is_skipped() {
    let archive = build_archive(&[("leiame.pdf", b"%PDF-1.4"), ("dados/", b"")]);
    let outcome = run_single("1T2024.zip", archive).unwrap();
    assert_eq!(outcome, UnitOutcome::Skipped(SkipReason::NoDataFile));
}

#[test]
fn test_first_supported_entry_is_used() {
    let archive = build_archive(&[
        ("leiame.pdf", b"%PDF-1.4"),
        ("1T2024.csv", &statement_csv(&[("EVENTOS", "1,00")])),
        ("1T2024_extra.csv", &statement_csv(&[("EVENTOS", "2,00"), ("EVENTOS", "3,00")])),
    ]);
    let outcome = run_single("1T2024.zip", archive).unwrap();
    let UnitOutcome::Produced(summary) = outcome else {
        panic!("Expected records, got {:?}", outcome);
    };
    assert_eq!(summary.data_file, "1T2024.csv");
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.period.quarter, 1);
    assert_eq!(summary.period.year, 2024);
}

#[test]
fn test_unreadable_data_file_is_skipped() {
    let archive = build_archive(&[("1T2024.xlsx", b"not really a workbook")]);
    let outcome = run_single("1T2024.zip", archive).unwrap();
    assert_eq!(
        outcome,
        UnitOutcome::Skipped(SkipReason::Unreadable {
            file: "1T2024.xlsx".to_string()
        })
    );
}

#[test]
fn test_header_only_data_file_is_skipped() {
    let archive = build_archive(&[("1T2024.csv", format!("{}\n", STATEMENT_HEADER).as_bytes())]);
    let outcome = run_single("1T2024.zip", archive).unwrap();
    assert_eq!(
        outcome,
        UnitOutcome::Skipped(SkipReason::EmptyFrame {
            file: "1T2024.csv".to_string()
        })
    );
}

#[test]
fn test_missing_description_column_is_skipped() {
    let archive = build_archive(&[("1T2024.csv", b"CONTA;VL_SALDO_FINAL\nEVENTOS;1,00\n")]);
    let outcome = run_single("1T2024.zip", archive).unwrap();
    assert_eq!(
        outcome,
        UnitOutcome::Skipped(SkipReason::MissingDescriptionColumn)
    );
}

#[test]
fn test_comma_utf8_file_inside_archive() {
    let contents = "REG_ANS,DESCRICAO,VL_SALDO_FINAL\n123,\"EVENTOS/SINISTROS CONHECIDOS\",\"1.000,50\"\n";
    let archive = build_archive(&[("4T2023.csv", contents.as_bytes())]);
    let outcome = run_single("4T2023.zip", archive).unwrap();
    let UnitOutcome::Produced(summary) = outcome else {
        panic!("Expected records, got {:?}", outcome);
    };
    assert_eq!(summary.rows, 1);
}

#[test]
fn test_corrupt_container_is_fatal() {
    let result = run_single("1T2024.zip", b"definitely not a zip".to_vec());
    assert!(matches!(
        result,
        Err(ProcessorError::ArchiveFailed { .. })
    ));
}

#[test]
fn test_directory_and_unsupported_entries_are_passed_over() {
    let archive = build_archive(&[
        ("dados/", b""),
        ("dados/leiame.pdf", b"%PDF-1.4"),
        ("dados/1T2024.csv", &statement_csv(&[("EVENTOS", "1,00")])),
    ]);
    let outcome = run_single("1T2024.zip", archive).unwrap();
    let UnitOutcome::Produced(summary) = outcome else {
        panic!("Expected records, got {:?}", outcome);
    };
    assert_eq!(summary.data_file, "dados/1T2024.csv");
    assert_eq!(summary.rows, 1);
}

#[test]
fn test_ragged_rows_keep_their_values() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = MemoryStore::new();
    store.insert(
        "1T2024.zip",
        build_archive(&[("1T2024.csv", b"DESCRICAO;VL_SALDO_FINAL\nEVENTOS;500\nRECEITAS\n")]),
    );
    let mut processor = processor_for(store, &temp_dir);
    let stats = processor.process().unwrap();
    assert_eq!(stats.total_rows, 1);

    let (_, rows) = read_output(&output_path(&temp_dir));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][4], "EVENTOS");
    assert_eq!(rows[0][5].parse::<f64>().unwrap(), 500.0);
}
