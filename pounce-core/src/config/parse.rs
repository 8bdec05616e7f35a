//! Minimal TOML reader for gimbal configuration
//!
//! Handles the subset used by `gimbal.toml`:
//! - `[sweep]` and `[servo]` section headers
//! - `key = value` pairs with integer or string values
//! - Comments (`# ...`), including trailing ones
//!
//! Unknown keys are skipped so older firmware can read newer files. The
//! build script checks the same file with a full TOML parser, which
//! rejects them.

use super::hardware::GimbalConfig;
use super::types::{ConfigError, TerminationPolicy};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (1-based line)
    InvalidSection { line: usize },
    /// Value has the wrong type or is out of range for its field
    InvalidValue { line: usize },
    /// Line is neither a header, a comment nor `key = value`
    MalformedLine { line: usize },
}

impl ParseError {
    /// Line the error was found on
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidSection { line }
            | ParseError::InvalidValue { line }
            | ParseError::MalformedLine { line } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sweep,
    Servo,
}

/// Parse TOML text on top of the defaults
///
/// Missing keys keep their default value. The result is not validated.
pub fn parse_config(input: &str) -> Result<GimbalConfig, ParseError> {
    let mut config = GimbalConfig::default();
    let mut section = Section::Root;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line, line_no)?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::MalformedLine { line: line_no })?;
        let bad = ParseError::InvalidValue { line: line_no };

        match section {
            Section::Sweep => {
                let sweep = &mut config.sweep;
                match key {
                    "vertical_span_deg" => sweep.vertical_span_deg = parse_int(value, bad)?,
                    "horizontal_span_deg" => sweep.horizontal_span_deg = parse_int(value, bad)?,
                    "step_delay_base_ms" => sweep.step_delay_base_ms = parse_int(value, bad)?,
                    "step_delay_jitter_ms" => sweep.step_delay_jitter_ms = parse_int(value, bad)?,
                    "pause_base_ms" => sweep.pause_base_ms = parse_int(value, bad)?,
                    "pause_jitter_ms" => sweep.pause_jitter_ms = parse_int(value, bad)?,
                    "foreshortening_divisor" => {
                        sweep.foreshortening_divisor = parse_int(value, bad)?
                    }
                    "termination" => sweep.termination = parse_termination(value, bad)?,
                    _ => {}
                }
            }
            Section::Servo => {
                let servo = &mut config.servo;
                match key {
                    "min_pulse_us" => servo.min_pulse_us = parse_int(value, bad)?,
                    "max_pulse_us" => servo.max_pulse_us = parse_int(value, bad)?,
                    "period_us" => servo.period_us = parse_int(value, bad)?,
                    _ => {}
                }
            }
            Section::Root => {}
        }
    }

    Ok(config)
}

/// Parse and validate
pub fn load_config(input: &str) -> Result<GimbalConfig, ConfigError> {
    let config = parse_config(input)?;
    config.validate()?;
    Ok(config)
}

fn parse_section_header(line: &str, line_no: usize) -> Result<Section, ParseError> {
    let err = ParseError::InvalidSection { line: line_no };
    let inner = line
        .strip_prefix('[')
        .and_then(|s| s.split('#').next())
        .map(str::trim)
        .and_then(|s| s.strip_suffix(']'))
        .ok_or(err)?;

    match inner.trim() {
        "sweep" => Ok(Section::Sweep),
        "servo" => Ok(Section::Servo),
        _ => Err(err),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip trailing comments outside of quotes
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int<T: core::str::FromStr>(value: &str, err: ParseError) -> Result<T, ParseError> {
    strip_separators(value).as_str().parse().map_err(|_| err)
}

fn parse_termination(value: &str, err: ParseError) -> Result<TerminationPolicy, ParseError> {
    match parse_string(value) {
        "conjunctive" => Ok(TerminationPolicy::Conjunctive),
        "independent" => Ok(TerminationPolicy::Independent),
        _ => Err(err),
    }
}

/// Drop TOML digit separators (`20_000`)
fn strip_separators(value: &str) -> heapless::String<16> {
    let mut out = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        // Overlong input leaves an empty buffer that fails to parse
        if out.push(c).is_err() {
            out.clear();
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SweepConfig;

    const SAMPLE: &str = r#"
# Laser gimbal configuration

[sweep]
vertical_span_deg = 60      # narrower than default
horizontal_span_deg = 150
step_delay_base_ms = 40
step_delay_jitter_ms = 0
pause_base_ms = 500
pause_jitter_ms = 1_500
foreshortening_divisor = 8
termination = "independent"

[servo]
min_pulse_us = 500
max_pulse_us = 2500
period_us = 20_000
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.sweep.vertical_span_deg, 60);
        assert_eq!(config.sweep.horizontal_span_deg, 150);
        assert_eq!(config.sweep.step_delay_base_ms, 40);
        assert_eq!(config.sweep.step_delay_jitter_ms, 0);
        assert_eq!(config.sweep.pause_base_ms, 500);
        assert_eq!(config.sweep.pause_jitter_ms, 1500);
        assert_eq!(config.sweep.foreshortening_divisor, 8);
        assert_eq!(config.sweep.termination, TerminationPolicy::Independent);
        assert_eq!(config.servo.min_pulse_us, 500);
        assert_eq!(config.servo.max_pulse_us, 2500);
        assert_eq!(config.servo.period_us, 20_000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, GimbalConfig::default());
        assert_eq!(config.sweep, SweepConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[sweep]\nhorizontal_span_deg = 90\n").unwrap();
        assert_eq!(config.sweep.horizontal_span_deg, 90);
        assert_eq!(config.sweep.vertical_span_deg, 90);
        assert_eq!(config.sweep.step_delay_base_ms, 75);
    }

    #[test]
    fn test_keys_outside_the_schema_are_skipped() {
        // Not a field of SweepConfig; the build rejects it, the reader skips it
        let config = parse_config("[sweep]\nindependent_axes = true\n").unwrap();
        assert_eq!(config.sweep.termination, TerminationPolicy::Conjunctive);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let config = parse_config("[sweep]\nlaser_colour = \"red\"\n").unwrap();
        assert_eq!(config, GimbalConfig::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = parse_config("[sweep]\n\n[stepper]\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidSection { line: 3 });
    }

    #[test]
    fn test_bad_values() {
        // Negative into u8
        let err = parse_config("[sweep]\nvertical_span_deg = -5\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidValue { line: 2 });

        // Overflows u8
        let err = parse_config("[sweep]\nhorizontal_span_deg = 300\n").unwrap_err();
        assert_eq!(err.line(), 2);

        let err = parse_config("[sweep]\ntermination = \"whenever\"\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_line() {
        let err = parse_config("[servo]\nperiod_us\n").unwrap_err();
        assert_eq!(err, ParseError::MalformedLine { line: 2 });
    }

    #[test]
    fn test_load_validates() {
        let err = load_config("[sweep]\nvertical_span_deg = 120\n").unwrap_err();
        assert_eq!(err, ConfigError::VerticalSpanTooLarge(120));

        let err = load_config("[oops]\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Parse(ParseError::InvalidSection { line: 1 })
        );

        assert!(load_config(SAMPLE).is_ok());
    }

    #[test]
    fn test_key_value_comments() {
        assert_eq!(parse_key_value("a = 1 # one"), Some(("a", "1")));
        assert_eq!(
            parse_key_value("a = \"x # y\""),
            Some(("a", "\"x # y\""))
        );
        assert_eq!(parse_key_value("a ="), None);
        assert_eq!(parse_key_value("= 3"), None);
    }

    #[cfg(feature = "serde")]
    mod against_toml {
        use super::*;

        fn strict(input: &str) -> Result<GimbalConfig, toml::de::Error> {
            toml::from_str(input)
        }

        #[test]
        fn test_sample_reads_the_same() {
            assert_eq!(parse_config(SAMPLE).unwrap(), strict(SAMPLE).unwrap());
        }

        #[test]
        fn test_shipped_file_reads_the_same() {
            let text = include_str!("../../../pounce-firmware/gimbal.toml");
            assert_eq!(parse_config(text).unwrap(), strict(text).unwrap());
        }

        #[test]
        fn test_every_termination_key_is_accepted_by_both() {
            for text in [
                "[sweep]\ntermination = \"conjunctive\"\n",
                "[sweep]\ntermination = \"independent\"\n",
            ] {
                assert_eq!(parse_config(text).unwrap(), strict(text).unwrap());
            }
        }

        #[test]
        fn test_keys_outside_the_schema_fail_the_build() {
            let text = "[sweep]\nindependent_axes = true\n";
            assert!(strict(text).is_err());
            assert_eq!(parse_config(text).unwrap(), GimbalConfig::default());
        }
    }
}
