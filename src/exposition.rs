//! Line checks for the Prometheus text exposition format
//!
//! `prometheus-parse` skips lines it cannot read, reads `\w+` metric names
//! only, and splits label blocks on `,` and `=` without honouring quotes or
//! escapes. Every line is checked here first and rewritten into a form it
//! reads back unchanged: comments are dropped, label values other than `le`
//! and `quantile` are hex-encoded and `decode_label_value` restores them.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use crate::error::{ProbeError, ProbeResult};
use crate::family::MetricKind;

/// Labels `prometheus-parse` reads as numbers for histograms and summaries
const NUMERIC_LABELS: [&str; 2] = ["le", "quantile"];

/// Check every line of `text` and rewrite it for `prometheus-parse`
///
/// # Errors
/// Returns `ProbeError::Parse` naming the first malformed line.
pub(crate) fn normalize(text: &str) -> ProbeResult<Vec<String>> {
    let mut types: HashMap<&str, MetricKind> = HashMap::new();
    let mut lines = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let normalized = normalize_line(line, &mut types)
            .map_err(|reason| ProbeError::Parse(format!("line {}: {}", index + 1, reason)))?;
        lines.extend(normalized);
    }

    Ok(lines)
}

/// Restore a label value rewritten by `normalize`
pub(crate) fn decode_label_value(name: &str, raw: &str) -> ProbeResult<String> {
    if NUMERIC_LABELS.contains(&name) {
        return Ok(raw.to_string());
    }

    let corrupt = || ProbeError::Parse(format!("corrupt value for label '{}'", name));
    let bytes = (0..raw.len())
        .step_by(2)
        .map(|i| raw.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(corrupt)?;

    String::from_utf8(bytes).map_err(|_| corrupt())
}

fn normalize_line<'a>(
    line: &'a str,
    types: &mut HashMap<&'a str, MetricKind>,
) -> Result<Option<String>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    match line.strip_prefix('#') {
        Some(comment) => normalize_comment(comment, types),
        None => normalize_sample(line, types).map(Some),
    }
}

fn normalize_comment<'a>(
    comment: &'a str,
    types: &mut HashMap<&'a str, MetricKind>,
) -> Result<Option<String>, String> {
    let mut tokens = comment.split_whitespace();

    match tokens.next() {
        Some("HELP") => {
            let name = tokens.next().ok_or("HELP line without a metric name")?;
            check_metric_name(name)?;
            Ok(None)
        }
        Some("TYPE") => {
            let name = tokens.next().ok_or("TYPE line without a metric name")?;
            check_metric_name(name)?;
            let type_name = tokens
                .next()
                .ok_or_else(|| format!("TYPE line for '{}' without a type", name))?;
            let kind = parse_kind(type_name)
                .ok_or_else(|| format!("unknown metric type '{}' for '{}'", type_name, name))?;
            if let Some(extra) = tokens.next() {
                return Err(format!("unexpected text '{}' after TYPE line", extra));
            }

            types.insert(name, kind);
            Ok(Some(format!("# TYPE {} {}", name, kind)))
        }
        _ => Ok(None),
    }
}

fn normalize_sample(line: &str, types: &HashMap<&str, MetricKind>) -> Result<String, String> {
    let mut cursor = Cursor::new(line);

    let name = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    if name.is_empty() {
        return Err(format!("expected a metric name at '{}'", line));
    }
    check_metric_name(name)?;

    cursor.skip_blanks();
    let labels = if cursor.eat('{') {
        scan_labels(&mut cursor)?
    } else {
        Vec::new()
    };

    cursor.skip_blanks();
    let value = cursor.take_while(|c| !c.is_whitespace());
    if value.is_empty() {
        return Err(format!("missing value for metric '{}'", name));
    }
    if value.parse::<f64>().is_err() {
        return Err(format!("invalid value '{}' for metric '{}'", value, name));
    }

    cursor.skip_blanks();
    let timestamp = cursor.take_while(|c| !c.is_whitespace());
    if !timestamp.is_empty() {
        let in_range = timestamp
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .is_some();
        if !in_range {
            return Err(format!("invalid timestamp '{}' for metric '{}'", timestamp, name));
        }
    }

    cursor.skip_blanks();
    if !cursor.is_empty() {
        return Err(format!("unexpected text '{}' after sample", cursor.rest));
    }

    check_numeric_labels(name, &labels, types)?;

    Ok(render_sample(name, &labels, value, timestamp))
}

fn check_metric_name(name: &str) -> Result<(), String> {
    if name.contains(':') {
        return Err(format!("metric name '{}' contains ':', which is not supported", name));
    }

    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid metric name '{}'", name));
    }

    Ok(())
}

fn parse_kind(type_name: &str) -> Option<MetricKind> {
    match type_name.to_ascii_lowercase().as_str() {
        "counter" => Some(MetricKind::Counter),
        "gauge" => Some(MetricKind::Gauge),
        "untyped" => Some(MetricKind::Untyped),
        "histogram" => Some(MetricKind::Histogram),
        "summary" => Some(MetricKind::Summary),
        _ => None,
    }
}

/// Scan `name="value",...}` after the opening brace
fn scan_labels(cursor: &mut Cursor<'_>) -> Result<Vec<(String, String)>, String> {
    let mut labels = Vec::new();

    loop {
        cursor.skip_blanks();
        if cursor.eat('}') {
            return Ok(labels);
        }

        let name = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(format!("invalid label name at '{}'", cursor.rest));
        }

        cursor.skip_blanks();
        if !cursor.eat('=') {
            return Err(format!("expected '=' after label '{}'", name));
        }
        cursor.skip_blanks();
        if !cursor.eat('"') {
            return Err(format!("expected a quoted value for label '{}'", name));
        }
        let value = scan_quoted(cursor)
            .ok_or_else(|| format!("unterminated or badly escaped value for label '{}'", name))?;
        labels.push((name.to_string(), value));

        cursor.skip_blanks();
        if cursor.eat(',') {
            continue;
        }
        if cursor.eat('}') {
            return Ok(labels);
        }
        return Err(format!("expected ',' or '}}' after label '{}'", name));
    }
}

/// Read a quoted value up to its closing quote, resolving `\\`, `\"`, `\n`
fn scan_quoted(cursor: &mut Cursor<'_>) -> Option<String> {
    let rest = cursor.rest;
    let mut value = String::new();
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                cursor.rest = &rest[i + 1..];
                return Some(value);
            }
            '\\' => match chars.next()?.1 {
                '\\' => value.push('\\'),
                '"' => value.push('"'),
                'n' => value.push('\n'),
                _ => return None,
            },
            c => value.push(c),
        }
    }

    None
}

fn check_numeric_labels(
    name: &str,
    labels: &[(String, String)],
    types: &HashMap<&str, MetricKind>,
) -> Result<(), String> {
    for (label, value) in labels {
        if NUMERIC_LABELS.contains(&label.as_str())
            && value.contains(|c: char| matches!(c, ',' | '=' | '"' | '\\' | '}'))
        {
            return Err(format!("unsupported value '{}' for label '{}'", value, label));
        }
    }

    let required = match name.strip_suffix("_bucket") {
        Some(base) if types.get(base) == Some(&MetricKind::Histogram) => Some("le"),
        _ if types.get(name) == Some(&MetricKind::Summary) => Some("quantile"),
        _ => None,
    };

    if let Some(required) = required {
        let numeric = labels
            .iter()
            .find(|(label, _)| label == required)
            .map_or(false, |(_, value)| value.parse::<f64>().is_ok());
        if !numeric {
            return Err(format!("'{}' needs a numeric '{}' label", name, required));
        }
    }

    Ok(())
}

fn render_sample(name: &str, labels: &[(String, String)], value: &str, timestamp: &str) -> String {
    let mut out = name.to_string();

    if !labels.is_empty() {
        let rendered: Vec<String> = labels
            .iter()
            .map(|(label, value)| format!("{}=\"{}\"", label, encode_label_value(label, value)))
            .collect();
        out.push('{');
        out.push_str(&rendered.join(","));
        out.push('}');
    }

    out.push(' ');
    out.push_str(value);
    if !timestamp.is_empty() {
        out.push(' ');
        out.push_str(timestamp);
    }

    out
}

fn encode_label_value(name: &str, value: &str) -> String {
    if NUMERIC_LABELS.contains(&name) {
        value.to_string()
    } else {
        value.bytes().map(|b| format!("{:02x}", b)).collect()
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_blanks(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\t']);
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest;
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        self.rest = tail;
        head
    }
}
