//! Full consolidation runs against a raw store on disk

use ans_processor::constants::OUTPUT_HEADER;
use ans_processor::{ArchiveProcessor, ProcessorConfig, ProcessorError};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn write_archive(dir: &Path, name: &str, entries: &[(&str, &[u8])]) {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        for (entry, contents) in entries {
            zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();
    }
    fs::write(dir.join(name), buf).unwrap();
}

/// Latin-1 encoding of a string made of Latin-1 characters
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (header, rows)
}

struct Workspace {
    _temp_dir: TempDir,
    raw_dir: std::path::PathBuf,
    output: std::path::PathBuf,
}

fn workspace() -> Workspace {
    let temp_dir = TempDir::new().unwrap();
    let raw_dir = temp_dir.path().join("raw");
    fs::create_dir_all(&raw_dir).unwrap();
    let output = temp_dir.path().join("processed").join("demonstracoes.csv");
    Workspace {
        _temp_dir: temp_dir,
        raw_dir,
        output,
    }
}

fn config(ws: &Workspace) -> ProcessorConfig {
    ProcessorConfig::default()
        .with_raw_dir(&ws.raw_dir)
        .with_output_path(&ws.output)
}

#[test]
fn test_mixed_encodings_consolidate_into_one_table() {
    let ws = workspace();

    let first = latin1(
        "DATA;REG_ANS;CD_CONTA_CONTABIL;DESCRICAO;VL_SALDO_FINAL\n\
         2024-03-31;419761;41;EVENTOS INDENIZÁVEIS LÍQUIDOS / SINISTROS RETIDOS;1.234.567,89\n\
         2024-03-31;419761;31;CONTRAPRESTAÇÕES EFETIVAS;9.999,00\n\
         2024-03-31;326305;411;Eventos conhecidos ou avisados;-12,50\n",
    );
    write_archive(&ws.raw_dir, "1T2024.zip", &[("1T2024.csv", &first)]);

    let second = "DATA,REG_ANS,DESCRICAO,VALOR\n\
                  2024-06-30,419761,\"PROVISÃO DE EVENTOS, OCORRIDOS\",\"2.000,00\"\n";
    write_archive(&ws.raw_dir, "2T2024.zip", &[("2T2024.csv", second.as_bytes())]);

    // Not an archive; must be ignored by the walk.
    fs::write(ws.raw_dir.join("Relatorio_cadop.csv"), b"REG_ANS;RAZAO_SOCIAL\n").unwrap();

    let mut processor = ArchiveProcessor::new(config(&ws)).unwrap();
    let stats = processor.process().unwrap();

    assert_eq!(stats.archives_found, 2);
    assert_eq!(stats.archives_processed, 2);
    assert_eq!(stats.total_rows, 3);

    let (header, rows) = read_rows(&ws.output);
    assert_eq!(header, OUTPUT_HEADER.to_vec());
    assert_eq!(rows.len(), 3);

    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][2], "2024-03-31");
    assert_eq!(&rows[0][3], "419761");
    assert_eq!(
        &rows[0][4],
        "EVENTOS INDENIZÁVEIS LÍQUIDOS / SINISTROS RETIDOS"
    );
    assert_eq!(rows[0][5].parse::<f64>().unwrap(), 1234567.89);

    assert_eq!(&rows[1][4], "Eventos conhecidos ou avisados");
    assert_eq!(rows[1][5].parse::<f64>().unwrap(), -12.5);

    assert_eq!(&rows[2][0], "2");
    assert_eq!(&rows[2][4], "PROVISÃO DE EVENTOS, OCORRIDOS");
    assert_eq!(rows[2][5].parse::<f64>().unwrap(), 2000.0);
}

#[test]
fn test_rerun_replaces_previous_output() {
    let ws = workspace();
    write_archive(
        &ws.raw_dir,
        "3T2023.zip",
        &[("3T2023.csv", b"DESCRICAO;VL_SALDO_FINAL\nEVENTOS;10,00\n")],
    );

    ArchiveProcessor::new(config(&ws)).unwrap().process().unwrap();
    ArchiveProcessor::new(config(&ws)).unwrap().process().unwrap();

    let (_, rows) = read_rows(&ws.output);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "2023");
    assert_eq!(&rows[0][2], "");
    assert_eq!(&rows[0][3], "");
}

#[test]
fn test_skipped_archives_do_not_stop_the_run() {
    let ws = workspace();
    write_archive(&ws.raw_dir, "1T2023.zip", &[("leiame.pdf", b"%PDF")]);
    write_archive(
        &ws.raw_dir,
        "2T2023.zip",
        &[("2T2023.csv", b"CONTA;VL_SALDO_FINAL\nEVENTOS;1,00\n")],
    );
    write_archive(
        &ws.raw_dir,
        "3T2023.zip",
        &[("3T2023.txt", b"DESCRICAO;VL_SALDO_FINAL\nRECEITAS;1,00\n")],
    );
    write_archive(
        &ws.raw_dir,
        "4T2023.zip",
        &[("4T2023.txt", b"DESCRICAO;VL_SALDO_FINAL\nSINISTROS;4,00\n")],
    );

    let stats = ArchiveProcessor::new(config(&ws)).unwrap().process().unwrap();
    assert_eq!(stats.archives_skipped, 3);
    assert_eq!(stats.archives_processed, 1);

    let (_, rows) = read_rows(&ws.output);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "4");
}

#[test]
fn test_empty_raw_store_is_fatal() {
    let ws = workspace();
    let result = ArchiveProcessor::new(config(&ws)).unwrap().process();
    assert!(matches!(result, Err(ProcessorError::NoArchives { .. })));
}

#[test]
fn test_missing_raw_store_is_fatal() {
    let ws = workspace();
    let config = config(&ws).with_raw_dir(ws.raw_dir.join("absent"));
    let result = ArchiveProcessor::new(config).unwrap().process();
    assert!(matches!(result, Err(ProcessorError::NoArchives { .. })));
}
