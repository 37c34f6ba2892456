use std::fs;
use std::process::Command;

const BINARY: &str = env!("CARGO_BIN_EXE_news-sentiment");

#[test]
fn help_displays_overview() {
    let output = Command::new(BINARY)
        .arg("--help")
        .output()
        .expect("invoke news-sentiment --help");

    assert!(output.status.success(), "help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Financial news sentiment analyzer"),
        "expected overview text in help output"
    );
    for subcommand in ["analyze", "resolve", "render"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn analyze_without_inputs_reports_invalid_input() {
    let output = Command::new(BINARY)
        .args(["analyze", "--log-level", "off"])
        .env_remove("NEWSAPI_API_KEY")
        .output()
        .expect("invoke news-sentiment analyze");

    assert!(output.status.success(), "input errors are recovered, not fatal");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("enter at least a ticker or a company name"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn inverted_dates_show_a_warning() {
    let output = Command::new(BINARY)
        .args([
            "analyze",
            "--ticker",
            "AAPL",
            "--from",
            "2025-01-22",
            "--to",
            "2025-01-01",
            "--log-level",
            "off",
        ])
        .output()
        .expect("invoke news-sentiment analyze");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning:"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("2025-01-22"), "unexpected stderr: {stderr}");
}

#[test]
fn render_replays_a_saved_table() {
    let dir = std::env::temp_dir().join(format!("news-sentiment-smoke-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("sentiment_by_date.csv");
    fs::write(
        &path,
        "Date,Negative,Neutral,Positive\n2025-01-20,0,0,1\n2025-01-21,1,0,1\n",
    )
    .expect("write csv fixture");

    let output = Command::new(BINARY)
        .args(["render", "--log-level", "off", "--width", "40", "--height", "10"])
        .arg(&path)
        .output()
        .expect("invoke news-sentiment render");

    let _ = fs::remove_dir_all(&dir);
    assert!(output.status.success(), "render should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2025-01-21"), "missing row in output: {stdout}");
    assert!(
        stdout.contains("Total articles analyzed: 3"),
        "missing total in output: {stdout}"
    );
}
