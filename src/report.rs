use std::io::Write;
use std::num::NonZeroUsize;

use log::debug;
use serde::Serialize;

use crate::base32;
use crate::dump::{Radix, dump_blocks};
use crate::error::DecodeError;
use crate::strkey::{VersionFields, encode_key, length_congruence_report, split_key};

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub block_size: NonZeroUsize,
    pub verify_checksum: bool,
}

/// How far a diagnostic pass got before stopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Decoded,
    Failed(DecodeError),
}

fn write_dump<W: Write>(
    out: &mut W,
    title: &str,
    bytes: &[u8],
    options: &ReportOptions,
    radix: Radix,
) -> anyhow::Result<()> {
    writeln!(out, "{title}:")?;
    for line in dump_blocks(bytes, options.block_size, radix) {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

// Renders like a Go byte slice: `[48 63 12]`.
fn byte_list(bytes: &[u8], render: impl Fn(u8) -> String) -> String {
    let items: Vec<String> = bytes.iter().map(|&b| render(b)).collect();
    format!("[{}]", items.join(" "))
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Prints what each alphabet symbol decodes to when it leads a two-symbol
/// block, showing its five bits in the top of the byte.
pub fn write_alphabet_table<W: Write>(out: &mut W) -> anyhow::Result<()> {
    for &symbol in base32::ALPHABET {
        let pair = format!("{}A", symbol as char);
        let decoded = base32::decode(&pair)?;
        writeln!(
            out,
            "{} => {}",
            symbol as char,
            byte_list(&decoded, |b| format!("{b:5b}"))
        )?;
    }
    Ok(())
}

pub fn write_report<W: Write>(
    out: &mut W,
    input: &str,
    options: &ReportOptions,
) -> anyhow::Result<Outcome> {
    let congruence = length_congruence_report(input);
    writeln!(out, "Input: {input}")?;
    writeln!(out, "Len: {}", input.len())?;
    writeln!(out, "Congruent 1 mod 8: {}", congruence.mod8_is_1)?;
    writeln!(out, "Congruent 3 mod 8: {}", congruence.mod8_is_3)?;
    writeln!(out, "Congruent 6 mod 8: {}", congruence.mod8_is_6)?;

    write_dump(out, "Encoded (hex)", input.as_bytes(), options, Radix::Hex)?;
    write_dump(out, "Encoded (binary)", input.as_bytes(), options, Radix::Binary)?;

    let decoded = match base32::decode(input) {
        Ok(decoded) => decoded,
        Err(e) => {
            writeln!(out, "Error decoding: {e}")?;
            return Ok(Outcome::Failed(e));
        }
    };
    debug!("decoded {} symbols into {} bytes", input.len(), decoded.len());

    writeln!(
        out,
        "Decoded: {} (len {})",
        byte_list(&decoded, |b| b.to_string()),
        decoded.len()
    )?;
    write_dump(out, "Decoded (hex)", &decoded, options, Radix::Hex)?;
    write_dump(out, "Decoded (binary)", &decoded, options, Radix::Binary)?;

    let key = match split_key(&decoded) {
        Ok(key) => key,
        Err(e) => {
            writeln!(out, "Invalid length")?;
            return Ok(Outcome::Failed(e));
        }
    };

    let VersionFields { type_code, flags } = key.version_fields();
    writeln!(out, "Version: {type_code} << 3 | {flags}")?;
    write_dump(out, "Payload", key.payload, options, Radix::Hex)?;
    writeln!(out, "Checksum: {:x}", key.checksum)?;

    if options.verify_checksum {
        writeln!(out, "Checksum expected: {:x}", key.expected_checksum())?;
        writeln!(out, "Checksum valid: {}", key.checksum_matches())?;
        writeln!(out, "Canonical: {}", encode_key(key.version, key.payload))?;
    }

    Ok(Outcome::Decoded)
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    input: &'a str,
    len: usize,
    congruent_1_mod_8: bool,
    congruent_3_mod_8: bool,
    congruent_6_mod_8: bool,
    decoded: String,
    decoded_len: usize,
    version: VersionFields,
    payload: String,
    checksum: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum_valid: Option<bool>,
}

#[derive(Debug, Serialize)]
struct JsonFailure<'a> {
    input: &'a str,
    error: String,
}

fn write_json_failure<W: Write>(
    out: &mut W,
    input: &str,
    e: DecodeError,
) -> anyhow::Result<Outcome> {
    let failure = JsonFailure {
        input,
        error: e.to_string(),
    };
    serde_json::to_writer_pretty(&mut *out, &failure)?;
    writeln!(out)?;
    Ok(Outcome::Failed(e))
}

pub fn write_json_report<W: Write>(
    out: &mut W,
    input: &str,
    options: &ReportOptions,
) -> anyhow::Result<Outcome> {
    let decoded = match base32::decode(input) {
        Ok(decoded) => decoded,
        Err(e) => return write_json_failure(out, input, e),
    };
    let key = match split_key(&decoded) {
        Ok(key) => key,
        Err(e) => return write_json_failure(out, input, e),
    };

    let congruence = length_congruence_report(input);
    let report = JsonReport {
        input,
        len: input.len(),
        congruent_1_mod_8: congruence.mod8_is_1,
        congruent_3_mod_8: congruence.mod8_is_3,
        congruent_6_mod_8: congruence.mod8_is_6,
        decoded: hex_string(&decoded),
        decoded_len: decoded.len(),
        version: key.version_fields(),
        payload: hex_string(key.payload),
        checksum: key.checksum,
        checksum_valid: options.verify_checksum.then(|| key.checksum_matches()),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(Outcome::Decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::DEFAULT_BLOCK_SIZE;
    use crate::fixtures::{SAMPLE_KEY, SAMPLE_REPORT};

    const DEFAULTS: ReportOptions = ReportOptions {
        block_size: DEFAULT_BLOCK_SIZE,
        verify_checksum: false,
    };

    fn render(input: &str, options: &ReportOptions) -> (String, Outcome) {
        let mut out = Vec::new();
        let outcome = write_report(&mut out, input, options).unwrap();
        (String::from_utf8(out).unwrap(), outcome)
    }

    #[test]
    fn test_sample_report_matches_line_for_line() {
        let (text, outcome) = render(SAMPLE_KEY, &DEFAULTS);
        assert_eq!(outcome, Outcome::Decoded);
        assert_eq!(text, SAMPLE_REPORT);
    }

    #[test]
    fn test_verify_checksum_appends_lines() {
        let options = ReportOptions {
            verify_checksum: true,
            ..DEFAULTS
        };
        let (text, _) = render(SAMPLE_KEY, &options);
        assert!(text.starts_with(SAMPLE_REPORT));
        assert_eq!(
            &text[SAMPLE_REPORT.len()..],
            format!("Checksum expected: d9c8\nChecksum valid: true\nCanonical: {SAMPLE_KEY}\n")
        );
    }

    #[test]
    fn test_canonical_form_repairs_checksum() {
        let options = ReportOptions {
            verify_checksum: true,
            ..DEFAULTS
        };
        // Last symbol changed, which only touches the checksum's high byte.
        let tampered = format!("{}A", &SAMPLE_KEY[..SAMPLE_KEY.len() - 1]);
        let (text, outcome) = render(&tampered, &options);
        assert_eq!(outcome, Outcome::Decoded);
        assert!(text.contains("Checksum valid: false\n"));
        assert!(text.ends_with(&format!("Canonical: {SAMPLE_KEY}\n")));
    }

    #[test]
    fn test_decode_error_stops_after_encoded_dumps() {
        let (text, outcome) = render("GA=Q", &DEFAULTS);
        assert!(matches!(
            outcome,
            Outcome::Failed(DecodeError::InvalidCharacter { position: 2, .. })
        ));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("Error decoding: illegal base32 data at input byte 2"));
        assert!(!text.contains("Decoded:"));
    }

    #[test]
    fn test_too_short_stops_after_decoded_dumps() {
        let (text, outcome) = render("GAAA", &DEFAULTS);
        assert_eq!(outcome, Outcome::Failed(DecodeError::TooShort { length: 2 }));
        assert!(text.contains("Decoded: [48 0] (len 2)\n"));
        assert!(text.ends_with("Invalid length\n"));
        assert!(!text.contains("Version:"));
    }

    #[test]
    fn test_congruence_lines_for_short_input() {
        let (text, outcome) = render("GAAAAAAAA", &DEFAULTS);
        assert_eq!(outcome, Outcome::Failed(DecodeError::InvalidLength { length: 9 }));
        assert!(text.contains("Congruent 1 mod 8: true\n"));
        assert!(text.contains("Congruent 3 mod 8: false\n"));
        assert!(text.contains("Encoded (hex):\n  47 41 41 41 41 41 41 41\n  41\n"));
    }

    #[test]
    fn test_block_size_option() {
        let options = ReportOptions {
            block_size: NonZeroUsize::new(16).unwrap(),
            ..DEFAULTS
        };
        let (text, _) = render(SAMPLE_KEY, &options);
        assert!(text.contains(
            "Payload:\n  3f 0c 34 bf 93 ad 0d 99 71 d0 4c cc 90 f7 05 51\n"
        ));
    }

    #[test]
    fn test_alphabet_table() {
        let mut out = Vec::new();
        write_alphabet_table(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 32);
        assert_eq!(lines[0], "A => [    0]");
        assert_eq!(lines[1], "B => [ 1000]");
        assert_eq!(lines[6], "G => [110000]");
        assert_eq!(lines[31], "7 => [11111000]");
    }

    #[test]
    fn test_json_report() {
        let options = ReportOptions {
            verify_checksum: true,
            ..DEFAULTS
        };
        let mut out = Vec::new();
        let outcome = write_json_report(&mut out, SAMPLE_KEY, &options).unwrap();
        assert_eq!(outcome, Outcome::Decoded);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["len"], 56);
        assert_eq!(value["decoded_len"], 35);
        assert_eq!(value["version"]["type_code"], 6);
        assert_eq!(value["version"]["flags"], 0);
        assert_eq!(value["checksum"], 0xd9c8);
        assert_eq!(value["checksum_valid"], true);
        assert_eq!(value["payload"].as_str().map(str::len), Some(64));
    }

    #[test]
    fn test_json_failure() {
        let mut out = Vec::new();
        let outcome = write_json_report(&mut out, "GAAA", &DEFAULTS).unwrap();
        assert_eq!(outcome, Outcome::Failed(DecodeError::TooShort { length: 2 }));

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["input"], "GAAA");
        assert!(value.get("checksum").is_none());
    }

    #[test]
    fn test_json_failure_on_bad_character() {
        let mut out = Vec::new();
        let outcome = write_json_report(&mut out, "GA=Q", &DEFAULTS).unwrap();
        assert_eq!(
            outcome,
            Outcome::Failed(DecodeError::InvalidCharacter { position: 2, byte: b'=' })
        );

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["input"], "GA=Q");
        assert_eq!(value["error"], "illegal base32 data at input byte 2 (0x3d)");
        assert!(value.get("decoded").is_none());
    }
}
