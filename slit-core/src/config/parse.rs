//! Minimal TOML parser for the timing table
//!
//! Handles only the subset needed by `machine.toml`. It allocates nothing,
//! so it runs on the target at boot.
//!
//! Supported:
//! - `[section]` headers (only `[timing]` is read, others are skipped)
//! - `key = integer` pairs, with optional `_` digit separators
//! - Comments (`# ...`), including trailing comments
//!
//! Keys missing from the file keep their default value.

use super::timings::MachineTimings;

/// Parse error, with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed `[section]` header
    InvalidSection { line: usize },
    /// Line is not `key = value`
    InvalidLine { line: usize },
    /// Key is not a known timing
    UnknownKey { line: usize },
    /// Value is not a non-negative integer that fits in `u32`
    InvalidValue { line: usize },
}

/// Parse the `[timing]` table of a machine configuration
pub fn parse_timings(input: &str) -> Result<MachineTimings, ParseError> {
    let mut timings = MachineTimings::default();
    let mut in_timing = false;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            in_timing = name == "timing";
            continue;
        }

        if !in_timing {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ParseError::InvalidLine { line: line_no })?;
        let value = parse_u32(value.trim()).ok_or(ParseError::InvalidValue { line: line_no })?;

        let slot = field_mut(&mut timings, key.trim())
            .ok_or(ParseError::UnknownKey { line: line_no })?;
        *slot = value;
    }

    Ok(timings)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') {
        return None;
    }
    let mut value: u32 = 0;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10)?;
        value = value.checked_mul(10)?.checked_add(digit)?;
    }
    Some(value)
}

fn field_mut<'a>(timings: &'a mut MachineTimings, key: &str) -> Option<&'a mut u32> {
    let field = match key {
        "paper_timeout_ms" => &mut timings.paper_timeout_ms,
        "plastic_timeout_ms" => &mut timings.plastic_timeout_ms,
        "top_open_ms" => &mut timings.top_open_ms,
        "top_close_ms" => &mut timings.top_close_ms,
        "metal_down_ms" => &mut timings.metal_down_ms,
        "metal_up_ms" => &mut timings.metal_up_ms,
        "plastic_down_ms" => &mut timings.plastic_down_ms,
        "plastic_up_ms" => &mut timings.plastic_up_ms,
        "pulse_ms" => &mut timings.pulse_ms,
        "debounce_ms" => &mut timings.debounce_ms,
        _ => return None,
    };
    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_timings(""), Ok(MachineTimings::default()));
    }

    #[test]
    fn test_parse_timing_table() {
        let input = r#"
# Sorting bin
[board]
name = "pico"

[timing]
paper_timeout_ms = 8_000   # slower paper
plastic_timeout_ms = 2500
pulse_ms=120
"#;
        let timings = parse_timings(input).unwrap();
        assert_eq!(timings.paper_timeout_ms, 8_000);
        assert_eq!(timings.plastic_timeout_ms, 2_500);
        assert_eq!(timings.pulse_ms, 120);
        // Untouched keys keep defaults
        assert_eq!(timings.top_close_ms, 600);
        assert_eq!(timings.debounce_ms, 400);
    }

    #[test]
    fn test_other_sections_are_skipped() {
        let input = "[board]\nunknown = \"x\"\n[timing]\ntop_open_ms = 450\n[later]\nfoo = bar\n";
        let timings = parse_timings(input).unwrap();
        assert_eq!(timings.top_open_ms, 450);
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let input = "[timing]\n\nspin_rpm = 3\n";
        assert_eq!(parse_timings(input), Err(ParseError::UnknownKey { line: 3 }));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_timings("[timing]\npulse_ms = \"150\"\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_timings("[timing]\npulse_ms = -5\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_timings("[timing]\npulse_ms = 99999999999\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_timings("[timing]\npulse_ms = _1\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse_timings("[timing\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
        assert_eq!(
            parse_timings("[]\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
        assert_eq!(
            parse_timings("[timing]\npulse_ms 150\n"),
            Err(ParseError::InvalidLine { line: 2 })
        );
    }
}
