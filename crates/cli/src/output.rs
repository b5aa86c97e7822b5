//! Console report.

use std::io::{self, Write};

use anyhow::Result;

use restorrent_core::RestoreReport;

/// Print `report` to stdout, as JSON or as plain text.
pub fn print_report(report: &RestoreReport, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, report)?;
        writeln!(out)?;
    } else {
        write_text(&mut out, report)?;
    }

    Ok(())
}

fn write_text(out: &mut impl Write, report: &RestoreReport) -> io::Result<()> {
    for restored in &report.restored {
        let note = if restored.duplicate { ", already present" } else { "" };
        writeln!(
            out,
            "{} (id {}{})",
            restored.candidate.torrent_name, restored.torrent_id, note
        )?;
        for file in &restored.selected_files {
            writeln!(out, "  {}", file)?;
        }
    }

    if !report.unavailable.is_empty() {
        writeln!(out, "unavailable:")?;
        for unavailable in &report.unavailable {
            writeln!(
                out,
                "  {} ({})",
                unavailable.candidate.torrent_name, unavailable.reason
            )?;
        }
    }

    Ok(())
}
