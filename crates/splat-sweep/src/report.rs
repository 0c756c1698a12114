//! Extraction of the `(gates, area, delay)` triple from the tool's
//! free-text self-report.

use splat_core::{ErrorInfo, Metrics, SplatError};

/// Parses the tool's one-line area/timing summary out of captured output.
///
/// Fails with a `Tool` error when `status` is non-zero (no metrics exist in
/// that case and the caller must not record a row). Otherwise scans for the
/// single line carrying all three of the literal tokens `Gates`, `Area` and
/// `Delay`. The line may be wrapped in terminal-control escape sequences and
/// uses arbitrary whitespace around its `label = value` fields; numeric
/// tokens may carry trailing control garbage which is stripped before
/// conversion.
pub fn parse_report(status: i32, text: &str) -> Result<Metrics, SplatError> {
    if status != 0 {
        return Err(SplatError::Tool(
            ErrorInfo::new("splat_sweep.report_status", "tool reported failure")
                .with_context("status", status.to_string()),
        ));
    }

    let line = text
        .lines()
        .find(|line| line.contains("Gates") && line.contains("Area") && line.contains("Delay"))
        .ok_or_else(|| {
            SplatError::MetricFormat(
                ErrorInfo::new("splat_sweep.summary_missing", "no summary line in report")
                    .with_hint("expected a line containing Gates, Area and Delay"),
            )
        })?;

    // ANSI color sequences look like "\x1b[1m"; splitting on ESC and on the
    // terminating 'm' (which no label or numeric token contains) reduces
    // them to ignorable fragments.
    let tokens: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == '=' || c == 'm' || c == '\u{1b}')
        .filter(|tok| !tok.is_empty())
        .collect();

    let gates: u64 = labeled_value(&tokens, "Gates", line)?
        .parse()
        .map_err(|_| format_error(line, "Gates"))?;
    let area: f64 = labeled_value(&tokens, "Area", line)?
        .parse()
        .map_err(|_| format_error(line, "Area"))?;
    let delay: f64 = labeled_value(&tokens, "Delay", line)?
        .parse()
        .map_err(|_| format_error(line, "Delay"))?;

    Ok(Metrics { gates, area, delay })
}

/// Returns the numeric prefix of the token following `label`.
fn labeled_value<'a>(
    tokens: &[&'a str],
    label: &str,
    line: &str,
) -> Result<&'a str, SplatError> {
    let idx = tokens
        .iter()
        .position(|tok| *tok == label)
        .ok_or_else(|| format_error(line, label))?;
    let raw = tokens.get(idx + 1).ok_or_else(|| format_error(line, label))?;
    let numeric_len = raw
        .find(|c: char| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '+'))
        .unwrap_or(raw.len());
    if numeric_len == 0 {
        return Err(format_error(line, label));
    }
    Ok(&raw[..numeric_len])
}

fn format_error(line: &str, label: &str) -> SplatError {
    SplatError::MetricFormat(
        ErrorInfo::new("splat_sweep.summary_unparsable", "summary field unparsable")
            .with_context("line", line.to_string())
            .with_context("field", label.to_string()),
    )
}
