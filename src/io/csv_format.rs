//! CSV format handling for ledger rows and reconciliation reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - Conversion from CSV records to raw rows
//! - Detail report serialization (one line per outcome)
//! - Summary report serialization (one line per count)
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{CanonicalRecord, CellValue, RawRow, ReconciliationResult};
use serde::Serialize;
use std::io::Write;

/// Header of the detail report
pub const DETAIL_HEADER: [&str; 14] = [
    "categoria",
    "sistema_fila",
    "sistema_fecha",
    "sistema_referencia",
    "sistema_descripcion",
    "sistema_debito",
    "sistema_credito",
    "banco_fila",
    "banco_fecha",
    "banco_referencia",
    "banco_descripcion",
    "banco_debito",
    "banco_credito",
    "diferencia",
];

/// Category labels used in both reports
pub mod category {
    pub const EXACT: &str = "exacta";
    pub const APPROXIMATE: &str = "aproximada";
    pub const UNMATCHED: &str = "sin_coincidencia";
    pub const UNUSED_BANK: &str = "banco_no_utilizado";
}

/// One line of the summary report
///
/// The field names double as the report header.
#[derive(Debug, Serialize)]
struct SummaryLine<'a> {
    categoria: &'a str,
    cantidad: String,
}

/// Build a raw row from a CSV record and the file's header
///
/// Fields are paired with headers by position. A record shorter than the
/// header yields `Empty` cells for the missing columns; extra fields are
/// dropped.
pub fn raw_row_from_fields<'a, I>(headers: &[String], fields: I) -> RawRow
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();
    headers
        .iter()
        .map(|header| {
            let cell = fields
                .next()
                .map(CellValue::from_field)
                .unwrap_or(CellValue::Empty);
            (header.clone(), cell)
        })
        .collect()
}

/// Write every outcome of a run, one line each
///
/// Lines are grouped by category: exact, approximate, unmatched, unused bank.
/// Row numbers are 1-based positions in the data rows of each ledger.
pub fn write_report_csv(
    result: &ReconciliationResult,
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(DETAIL_HEADER)
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut rows = Vec::with_capacity(
        result.total_matches() + result.unmatched.len() + result.unused_bank_records.len(),
    );
    for m in &result.exact_matches {
        rows.push(report_line(
            category::EXACT,
            Some((m.system_index, &m.system)),
            Some((m.bank_index, &m.bank)),
            String::new(),
        ));
    }
    for m in &result.approximate_matches {
        rows.push(report_line(
            category::APPROXIMATE,
            Some((m.system_index, &m.system)),
            Some((m.bank_index, &m.bank)),
            m.difference.to_string(),
        ));
    }
    for u in &result.unmatched {
        rows.push(report_line(
            category::UNMATCHED,
            Some((u.index, &u.record)),
            None,
            String::new(),
        ));
    }
    for u in &result.unused_bank_records {
        rows.push(report_line(
            category::UNUSED_BANK,
            None,
            Some((u.index, &u.record)),
            String::new(),
        ));
    }

    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| format!("Failed to write report record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the summary counts of a run
pub fn write_summary_csv(
    result: &ReconciliationResult,
    output: &mut dyn Write,
) -> Result<(), String> {
    let summary = result.summary();
    let mut writer = csv::Writer::from_writer(output);

    let lines = [
        (category::EXACT, summary.exact.to_string()),
        (category::APPROXIMATE, summary.approximate.to_string()),
        (category::UNMATCHED, summary.unmatched.to_string()),
        (category::UNUSED_BANK, summary.unused_bank.to_string()),
        ("total_sistema", summary.total_system.to_string()),
        ("total_banco", summary.total_bank.to_string()),
        ("total_coincidencias", summary.total_matches.to_string()),
        ("porcentaje_conciliado", summary.match_rate.to_string()),
        ("margen_tolerancia", summary.tolerance.to_string()),
    ];
    for (categoria, cantidad) in lines {
        writer
            .serialize(SummaryLine { categoria, cantidad })
            .map_err(|e| format!("Failed to write summary record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

fn report_line(
    category: &str,
    system: Option<(usize, &CanonicalRecord)>,
    bank: Option<(usize, &CanonicalRecord)>,
    difference: String,
) -> Vec<String> {
    let mut line = Vec::with_capacity(DETAIL_HEADER.len());
    line.push(category.to_string());
    push_side(&mut line, system);
    push_side(&mut line, bank);
    line.push(difference);
    line
}

fn push_side(line: &mut Vec<String>, side: Option<(usize, &CanonicalRecord)>) {
    match side {
        Some((index, record)) => {
            line.push((index + 1).to_string());
            line.push(record.date.clone());
            line.push(record.reference.clone());
            line.push(record.description.clone());
            line.push(record.debit.clone());
            line.push(record.credit.clone());
        }
        None => line.extend(std::iter::repeat(String::new()).take(6)),
    }
}
