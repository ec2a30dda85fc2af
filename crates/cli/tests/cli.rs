use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;

use clap::Parser;
use stockcast_cli::{Cli, run};

const SALES_CSV: &str = "\
Fecha pedido,Tipo de producto,Unidades
2023-01-05,Caja,1500
2023-02-05,Caja,1600
2023-03-05,Caja,1700
2023-01-06,Tornillo,40
2023-02-06,Tornillo,8
2023-03-06,Tornillo,55
2023-01-07,Martillo,900
2023-02-07,Martillo,1100
2023-03-07,Martillo,950
2024-01-05,Caja,1800
2024-02-05,Caja,1900
2024-01-06,Tornillo,60
2024-02-06,Tornillo,5
2024-01-07,Martillo,1000
2024-02-07,Martillo,980
";

fn invoke(dir: &Path, args: &[&str], stdin: &str) -> anyhow::Result<String> {
    let file = dir.join("ventas.csv");
    fs::write(&file, SALES_CSV)?;

    let report_dir = dir.join("reports");
    let mut argv = vec![
        "stockcast".to_string(),
        file.display().to_string(),
        "--report-dir".to_string(),
        report_dir.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));

    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    run(cli, stdin.as_bytes(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn summary_reports_low_stock_count() {
    let dir = tempfile::tempdir().unwrap();
    let out = invoke(dir.path(), &["summary"], "").unwrap();
    assert!(out.contains("rows: 15 (train 12, holdout 3)"), "{out}");
    assert!(out.contains("8 products with low stock"), "{out}");
}

#[test]
fn summary_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = invoke(dir.path(), &["summary", "--json"], "").unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["rows"], 15);
    assert_eq!(value["categories"], 3);
    assert!(value["evaluation"]["mse"].as_f64().unwrap() >= 0.0);
}

#[test]
fn report_writes_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = invoke(dir.path(), &["report"], "").unwrap();
    assert!(dir.path().join("reports/reporte_ventas_mensuales.csv").exists());
    assert!(dir.path().join("reports/reporte_stock_bajo.csv").exists());
    assert!(out.contains("Tornillo"), "{out}");
}

#[test]
fn forecast_unknown_category_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = invoke(dir.path(), &["forecast", "Escalera"], "").unwrap_err();
    assert!(err.to_string().contains("Escalera"), "{err}");
}

#[test]
fn forecast_prints_twelve_months() {
    let dir = tempfile::tempdir().unwrap();
    let out = invoke(dir.path(), &["forecast", "Caja", "--json"], "").unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["label"], "Caja");
    assert_eq!(value["year"], 2024);
    assert_eq!(value["months"].as_array().unwrap().len(), 12);
}

#[test]
fn forecast_without_category_covers_best_sellers() {
    let dir = tempfile::tempdir().unwrap();
    let out = invoke(dir.path(), &["forecast", "--json"], "").unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let labels: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["Caja", "Martillo", "Tornillo"]);

    let text = invoke(dir.path(), &["forecast", "--top-selling", "2"], "").unwrap();
    assert!(text.starts_with("Caja 2024\n"), "{text}");
    assert!(text.contains("\n\nMartillo 2024\n"), "{text}");
    assert!(!text.contains("Tornillo"), "{text}");
}

#[test]
fn ask_resolves_misheard_product() {
    let dir = tempfile::tempdir().unwrap();
    let out = invoke(
        dir.path(),
        &["ask", "cuántas", "unidades", "quedan", "del", "producto", "Tornilo"],
        "",
    )
    .unwrap();
    assert!(out.starts_with("Tornillo: 5 row(s)"), "{out}");
}

#[test]
fn listen_answers_each_line_until_input_ends() {
    let dir = tempfile::tempdir().unwrap();
    let stdin = "productos se vendieron en total\n\nqué hora es\n";
    let out = invoke(dir.path(), &["listen"], stdin).unwrap();
    assert_eq!(
        out,
        "total units sold: 13598\naudio not understood\nquestion not recognized\n"
    );
}

struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("recognizer pipe broke"))
    }
}

#[test]
fn listen_stops_when_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("ventas.csv");
    fs::write(&file, SALES_CSV).unwrap();
    let cli = Cli::try_parse_from(["stockcast", file.to_str().unwrap(), "listen"]).unwrap();

    let mut out = Vec::new();
    run(cli, BufReader::new(BrokenPipe), &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("ventas.csv");
    let cli = Cli::try_parse_from(["stockcast", missing.to_str().unwrap(), "summary"]).unwrap();
    let err = run(cli, "".as_bytes(), &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("failed to load"), "{err}");
}
