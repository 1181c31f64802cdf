//! External transfer invocation: one timed scp-style copy per sample,
//! plus the ssh-style remote artifact removal.

use scpbench_core::{BenchConfig, Error, RecordSchema, Result, Suite};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

/// Measured outcome of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferOutcome {
    pub elapsed_secs: f64,
    pub ciphertext_bytes: u64,
    pub raw_bytes: u64,
}

/// Argument vector for the transfer program: compression off, explicit
/// cipher (and MAC for standard suites), identity, port, payload, and a
/// `user@host:` destination with no remote path.
pub fn transfer_args(cfg: &BenchConfig, suite: &Suite, payload: &Path) -> Vec<String> {
    let mut args = vec![
        "-o".to_string(),
        "Compression no".to_string(),
        "-c".to_string(),
        suite.cipher_name().to_string(),
    ];
    if let Some(mac) = suite.mac_name() {
        args.push("-o".to_string());
        args.push(format!("MACs {mac}"));
    }
    args.push("-i".to_string());
    args.push(cfg.identity_file.display().to_string());
    args.push("-P".to_string());
    args.push(cfg.port.to_string());
    args.push(payload.display().to_string());
    args.push(cfg.destination());
    args
}

/// Pull the byte counts out of the transfer tool's reporting channel
/// (its stdout). Missing or garbled counts mean the tool did not behave
/// like a transfer, so the sample cannot be trusted.
pub fn scrape_byte_counts(stdout: &str, schema: &RecordSchema) -> Result<(u64, u64)> {
    let mut ciphertext = None;
    let mut raw = None;
    for line in stdout.lines() {
        if let Some(v) = line.strip_prefix(schema.ciphertext_prefix) {
            ciphertext = Some(v.trim().parse::<u64>().map_err(|_| {
                Error::external(format!("unparseable ciphertext byte report: {line:?}"))
            })?);
        } else if let Some(v) = line.strip_prefix(schema.raw_prefix) {
            raw = Some(v.trim().parse::<u64>().map_err(|_| {
                Error::external(format!("unparseable raw byte report: {line:?}"))
            })?);
        }
    }
    match (ciphertext, raw) {
        (Some(ct), Some(r)) => Ok((ct, r)),
        _ => Err(Error::external("transfer reported no byte counts")),
    }
}

/// Run one timed transfer. Blocks until the external process exits; a
/// non-zero status (or an expired watchdog) fails the sample.
pub async fn run_one_sample(
    cfg: &BenchConfig,
    suite: &Suite,
    payload: &Path,
    schema: &RecordSchema,
) -> Result<TransferOutcome> {
    let args = transfer_args(cfg, suite, payload);
    let mut command = Command::new(&cfg.transfer_program);
    command.args(&args).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    command.kill_on_drop(true);

    let started = Instant::now();
    let output = match cfg.sample_timeout_secs {
        Some(secs) => timeout(Duration::from_secs(secs), command.output())
            .await
            .map_err(|_| Error::external(format!("transfer timed out after {secs}s")))?,
        None => command.output().await,
    }
    .map_err(|e| Error::external(format!("failed to launch {}: {e}", cfg.transfer_program)))?;
    let elapsed_secs = started.elapsed().as_secs_f64();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::external(format!(
            "{} exited with {}: {}",
            cfg.transfer_program,
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let (ciphertext_bytes, raw_bytes) = scrape_byte_counts(&stdout, schema)?;
    Ok(TransferOutcome { elapsed_secs, ciphertext_bytes, raw_bytes })
}

/// Remove the transferred payload from the remote account's default
/// directory. Non-fatal by contract; callers log and continue.
pub async fn cleanup_remote(cfg: &BenchConfig) -> Result<()> {
    let remote_file = cfg
        .payload_file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::cleanup("payload file name is not valid UTF-8"))?;
    let status = Command::new(&cfg.remote_shell_program)
        .args([
            "-i",
            &cfg.identity_file.display().to_string(),
            "-p",
            &cfg.port.to_string(),
            &format!("{}@{}", cfg.user, cfg.host),
            &format!("rm -f {remote_file}"),
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| Error::cleanup(format!("failed to launch {}: {e}", cfg.remote_shell_program)))?;
    if !status.success() {
        return Err(Error::cleanup(format!("remote rm exited with {status}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scpbench_core::Generation;

    #[test]
    fn args_for_standard_suite_carry_the_mac() {
        let cfg = BenchConfig {
            identity_file: "./id_rsa_bench".into(),
            port: 22221,
            user: "bench".into(),
            host: "localhost".into(),
            ..Default::default()
        };
        let suite = Suite::standard("aes128-ctr", "hmac-sha1");
        let args = transfer_args(&cfg, &suite, Path::new("payload"));
        assert_eq!(
            args,
            vec![
                "-o",
                "Compression no",
                "-c",
                "aes128-ctr",
                "-o",
                "MACs hmac-sha1",
                "-i",
                "./id_rsa_bench",
                "-P",
                "22221",
                "payload",
                "bench@localhost:"
            ]
        );
    }

    #[test]
    fn args_for_combined_suite_have_no_mac_option() {
        let cfg = BenchConfig::default();
        let suite = Suite::aead("chacha20-poly1305@openssh.com");
        let args = transfer_args(&cfg, &suite, Path::new("payload"));
        assert!(!args.iter().any(|a| a.starts_with("MACs")));
        assert!(args.contains(&"chacha20-poly1305@openssh.com".to_string()));
    }

    #[test]
    fn byte_counts_are_scraped_from_stdout() {
        let schema = Generation::Prefixed.schema();
        let out = "noise\nCIPHERTEXT_BYTES:1050\nRAW_BYTES:1000\nmore noise\n";
        assert_eq!(scrape_byte_counts(out, &schema).unwrap(), (1050, 1000));
    }

    #[test]
    fn missing_byte_counts_fail_the_sample() {
        let schema = Generation::Prefixed.schema();
        let err = scrape_byte_counts("all quiet\n", &schema).unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)));
        let err = scrape_byte_counts("CIPHERTEXT_BYTES:10\n", &schema).unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_an_external_tool_failure() {
        let cfg = BenchConfig { transfer_program: "false".into(), ..Default::default() };
        let suite = Suite::aead("cipher-a");
        let err = run_one_sample(&cfg, &suite, Path::new("payload"), &Generation::Prefixed.schema())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)), "unexpected error: {err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_tool_is_an_external_tool_failure() {
        // Exits 0 but never reports byte counts
        let cfg = BenchConfig { transfer_program: "true".into(), ..Default::default() };
        let suite = Suite::aead("cipher-a");
        let err = run_one_sample(&cfg, &suite, Path::new("payload"), &Generation::Prefixed.schema())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)));
    }
}
