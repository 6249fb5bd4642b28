//! Result output, plain text or JSON

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Outcome of a successful credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub authenticated: bool,
    pub bind_dn: String,
    /// `None` when the group search was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

/// Writes progress and results in the selected format.
///
/// Text output is written as each step completes. JSON output is written
/// once, by [`Printer::finish`].
pub struct Printer<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn authenticated(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Authentication successful!")?;
        }
        Ok(())
    }

    pub fn groups(&mut self, groups: &[String]) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Groups:")?;
            for group in groups {
                writeln!(self.out, " - {}", group)?;
            }
        }
        Ok(())
    }

    pub fn finish(&mut self, report: &CheckReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.out, report)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(groups: Option<Vec<String>>) -> CheckReport {
        CheckReport {
            authenticated: true,
            bind_dn: "uid=alice,dc=example".to_string(),
            groups,
        }
    }

    #[test]
    fn test_text_output() {
        let mut printer = Printer::new(OutputFormat::Text, Vec::new());
        printer.authenticated().unwrap();
        printer
            .groups(&["admins".to_string(), "developers".to_string()])
            .unwrap();
        printer
            .finish(&report(Some(vec!["admins".into(), "developers".into()])))
            .unwrap();

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(
            text,
            "Authentication successful!\nGroups:\n - admins\n - developers\n"
        );
    }

    #[test]
    fn test_json_output_only_on_finish() {
        let mut printer = Printer::new(OutputFormat::Json, Vec::new());
        printer.authenticated().unwrap();
        printer.groups(&["admins".to_string()]).unwrap();
        printer
            .finish(&report(Some(vec!["admins".into()])))
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&printer.into_inner()).unwrap();
        assert_eq!(value["authenticated"], true);
        assert_eq!(value["bind_dn"], "uid=alice,dc=example");
        assert_eq!(value["groups"][0], "admins");
    }

    #[test]
    fn test_json_omits_skipped_groups() {
        let mut printer = Printer::new(OutputFormat::Json, Vec::new());
        printer.finish(&report(None)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&printer.into_inner()).unwrap();
        assert!(value.get("groups").is_none());
    }
}
