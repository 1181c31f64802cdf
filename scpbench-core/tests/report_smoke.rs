use scpbench_core::{
    logfile::log_file_name, BenchConfig, Generation, ReportBuilder, Suite, SuiteCatalog,
};
use std::fs;
use std::path::Path;

fn write_log(dir: &Path, cfg: &BenchConfig, suite: &Suite, samples: &[(f64, u64, u64)]) {
    let mut text = format!("{}\n{}\n2026-01-01 00:00:00\n", suite.label(), samples.len());
    for (t, ct, raw) in samples {
        text.push_str(&format!("TIME:{t}\nCIPHERTEXT_BYTES:{ct}\nRAW_BYTES:{raw}\n"));
    }
    fs::write(dir.join(log_file_name(&cfg.log_prefix, suite, &cfg.log_extension)), text).unwrap();
}

fn three_aead_config(dir: &Path) -> BenchConfig {
    BenchConfig {
        log_dir: dir.to_path_buf(),
        payload_mb: 100.0,
        suites: SuiteCatalog {
            standard: vec![],
            aead: vec!["cipher-a".into(), "cipher-b".into(), "cipher-c".into()],
            chunked_families: vec![],
            chunk_lengths: vec![],
        },
        ..Default::default()
    }
}

#[test]
fn aggregates_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = three_aead_config(dir.path());
    // Single-sample logs with times 10s, 5s, 20s at payload 100 MB
    write_log(dir.path(), &cfg, &Suite::aead("cipher-a"), &[(10.0, 105_000_000, 100_000_000)]);
    write_log(dir.path(), &cfg, &Suite::aead("cipher-b"), &[(5.0, 102_000_000, 100_000_000)]);
    write_log(dir.path(), &cfg, &Suite::aead("cipher-c"), &[(20.0, 110_000_000, 100_000_000)]);

    let report = ReportBuilder::new(&cfg, Generation::Prefixed.schema()).assemble().unwrap();
    assert_eq!(report.labels, vec!["cipher-a", "cipher-b", "cipher-c"]);
    assert_eq!(report.throughput_mbps, vec![10.0, 20.0, 5.0]);
    assert_eq!(report.ciphertext_mb, vec![105.0, 102.0, 110.0]);
    assert_eq!(report.raw_mb, vec![100.0, 100.0, 100.0]);
    assert!(report.failures.is_empty());
}

#[test]
fn failed_suite_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = three_aead_config(dir.path());
    write_log(dir.path(), &cfg, &Suite::aead("cipher-a"), &[(10.0, 1, 1)]);
    // cipher-b's log is structurally broken: one dangling record line
    let broken = dir.path().join(log_file_name(
        &cfg.log_prefix,
        &Suite::aead("cipher-b"),
        &cfg.log_extension,
    ));
    fs::write(&broken, "cipher-b\n1\ndate\nTIME:1\n").unwrap();
    write_log(dir.path(), &cfg, &Suite::aead("cipher-c"), &[(20.0, 2, 2)]);

    let report = ReportBuilder::new(&cfg, Generation::Prefixed.schema()).assemble().unwrap();
    assert_eq!(report.labels, vec!["cipher-a", "cipher-c"]);
    assert_eq!(report.throughput_mbps, vec![10.0, 5.0]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].label, "cipher-b");
    assert_eq!(report.failures[0].kind, "malformed-log");
}

#[test]
fn missing_log_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = three_aead_config(dir.path());
    write_log(dir.path(), &cfg, &Suite::aead("cipher-a"), &[(4.0, 1, 1)]);
    write_log(dir.path(), &cfg, &Suite::aead("cipher-c"), &[(2.0, 1, 1)]);
    // cipher-b's log was never written

    let report = ReportBuilder::new(&cfg, Generation::Prefixed.schema()).assemble().unwrap();
    assert_eq!(report.labels, vec!["cipher-a", "cipher-c"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "io");
}

#[test]
fn cross_wired_log_is_a_label_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = three_aead_config(dir.path());
    write_log(dir.path(), &cfg, &Suite::aead("cipher-a"), &[(4.0, 1, 1)]);
    write_log(dir.path(), &cfg, &Suite::aead("cipher-c"), &[(2.0, 1, 1)]);
    // cipher-b's file holds cipher-a's content
    let a = dir.path().join(log_file_name(&cfg.log_prefix, &Suite::aead("cipher-a"), &cfg.log_extension));
    let b = dir.path().join(log_file_name(&cfg.log_prefix, &Suite::aead("cipher-b"), &cfg.log_extension));
    fs::copy(&a, &b).unwrap();

    let report = ReportBuilder::new(&cfg, Generation::Prefixed.schema()).assemble().unwrap();
    assert_eq!(report.labels, vec!["cipher-a", "cipher-c"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "label-mismatch");
}

#[test]
fn chart_labels_truncate_vendor_tags() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = three_aead_config(dir.path());
    cfg.suites.aead = vec!["chacha20-poly1305@openssh.com".into()];
    write_log(
        dir.path(),
        &cfg,
        &Suite::aead("chacha20-poly1305@openssh.com"),
        &[(1.0, 1, 1)],
    );

    let report = ReportBuilder::new(&cfg, Generation::Prefixed.schema()).assemble().unwrap();
    // Truncation is presentation-only; the log header carried the full name
    assert_eq!(report.labels, vec!["chacha20-poly1305@"]);
}

#[test]
fn report_serializes_for_the_plotting_consumer() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = three_aead_config(dir.path());
    write_log(dir.path(), &cfg, &Suite::aead("cipher-a"), &[(10.0, 1_000_000, 1_000_000)]);
    write_log(dir.path(), &cfg, &Suite::aead("cipher-b"), &[(5.0, 1_000_000, 1_000_000)]);
    write_log(dir.path(), &cfg, &Suite::aead("cipher-c"), &[(20.0, 1_000_000, 1_000_000)]);

    let report = ReportBuilder::new(&cfg, Generation::Prefixed.schema()).assemble().unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["labels"].as_array().unwrap().len(), 3);
    assert_eq!(json["throughput_mbps"][0], 10.0);
}
