//! Console and log-file output for the command line.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Style};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use vhdltest_core::{ConsoleLine, OutputSink, Tone};

/// Writes report lines to stdout and, optionally, to a log file.
///
/// The log always receives every line, uncoloured, even when the console is
/// silenced.
pub struct ConsoleSink {
    silent: bool,
    verbose: bool,
    colorize: bool,
    log: Option<BufWriter<File>>,
    errors: usize,
}

impl ConsoleSink {
    pub fn new(silent: bool, verbose: bool, log_path: Option<&Path>) -> Result<Self> {
        let log = match log_path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Unable to create log file {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };
        Ok(Self {
            silent,
            verbose,
            colorize: supports_color::on_cached(supports_color::Stream::Stdout).is_some(),
            log,
            errors: 0,
        })
    }

    /// Number of errors reported so far.
    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn exit_code(&self) -> u8 {
        if self.errors > 0 {
            1
        } else {
            0
        }
    }

    /// Flush the log file, if any.
    pub fn flush(&mut self) {
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.flush() {
                tracing::warn!(error = %e, "failed to flush log file");
            }
        }
    }

    fn style(tone: Tone) -> Style {
        match tone {
            Tone::Text => Style::new(),
            Tone::Info => Style::new().white(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red(),
            Tone::Success => Style::new().green(),
        }
    }

    fn render(&self, line: &ConsoleLine) -> String {
        if !self.colorize {
            return line.plain();
        }
        line.spans
            .iter()
            .map(|span| span.text.style(Self::style(span.tone)).to_string())
            .collect()
    }

    fn log_line(&mut self, text: &str) {
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = writeln!(log, "{text}") {
                tracing::warn!(error = %e, "failed to write log file");
            }
        }
    }
}

impl OutputSink for ConsoleSink {
    fn write_line(&mut self, line: &ConsoleLine) {
        if !self.silent {
            println!("{}", self.render(line));
        }
        self.log_line(&line.plain());
    }

    fn write_verbose(&mut self, text: &str) {
        if self.verbose {
            self.write_text(text);
        }
    }

    fn write_error(&mut self, text: &str) {
        self.errors += 1;
        self.write_line(&ConsoleLine::toned(Tone::Error, text));
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_receives_plain_text_when_silent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("output.log");

        let mut sink = ConsoleSink::new(true, false, Some(&path)).expect("sink");
        sink.write_line(
            &ConsoleLine::toned(Tone::Success, "Passed").push(Tone::Text, " half_adder_pass_tb"),
        );
        sink.write_verbose("hidden");
        sink.write_error("Error: boom");
        assert_eq!(sink.errors(), 1);
        assert_eq!(sink.exit_code(), 1);
        drop(sink);

        let log = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(log, "Passed half_adder_pass_tb\nError: boom\n");
    }

    #[test]
    fn test_verbose_lines_are_logged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("output.log");

        let mut sink = ConsoleSink::new(true, true, Some(&path)).expect("sink");
        sink.write_verbose("  Run Directory: /work");
        assert_eq!(sink.exit_code(), 0);
        drop(sink);

        let log = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(log, "  Run Directory: /work\n");
    }

    #[test]
    fn test_log_in_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("output.log");
        assert!(ConsoleSink::new(false, false, Some(&path)).is_err());
    }
}
