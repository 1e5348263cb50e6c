// Ed25519 account key; decodes to version 6 << 3 with a 32-byte payload.
pub const SAMPLE_KEY: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";

// Full text report for `SAMPLE_KEY` with default options.
pub const SAMPLE_REPORT: &str = include_str!("../testdata/sample_report.txt");
