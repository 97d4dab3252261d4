//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod alternatives {
    use std::io::{self, Write};

    const HEADER: &str = "trajectory_type,delta_v_total_m_s,delta_v1_m_s,delta_v2_m_s,delta_v3_m_s,transfer_time_s,fuel_efficiency,optimization_score,optimal";

    /// Write the alternatives CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row describing one scored transfer alternative.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub trajectory_type: &'a str,
        pub delta_v_total_m_s: f64,
        pub delta_v1_m_s: f64,
        pub delta_v2_m_s: f64,
        pub delta_v3_m_s: Option<f64>,
        pub transfer_time_s: f64,
        pub fuel_efficiency: f64,
        pub optimization_score: f64,
        pub optimal: bool,
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the header ordering. A missing third
        /// burn is written as an empty field.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let dv3 = self
                .delta_v3_m_s
                .map(|dv| format!("{dv:.6}"))
                .unwrap_or_default();
            writeln!(
                writer,
                "{},{:.6},{:.6},{:.6},{},{:.3},{:.6},{:.6},{}",
                self.trajectory_type,
                self.delta_v_total_m_s,
                self.delta_v1_m_s,
                self.delta_v2_m_s,
                dv3,
                self.transfer_time_s,
                self.fuel_efficiency,
                self.optimization_score,
                if self.optimal { "true" } else { "false" },
            )
        }
    }
}

pub mod report {
    use chrono::{SecondsFormat, Utc};
    use serde::Serialize;
    use std::io::{self, Write};

    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize> {
        generated_utc: String,
        kind: &'a str,
        payload: &'a T,
    }

    /// Write a pretty-printed JSON report wrapping `payload` with a kind tag and timestamp.
    pub fn write_report<T: Serialize>(
        writer: &mut dyn Write,
        kind: &str,
        payload: &T,
    ) -> io::Result<()> {
        let envelope = Envelope {
            generated_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            kind,
            payload,
        };
        serde_json::to_writer_pretty(&mut *writer, &envelope)?;
        writeln!(writer)
    }
}
