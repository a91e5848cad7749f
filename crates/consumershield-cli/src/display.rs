//! Terminal rendering for strategies and the case archive.

use std::io::{self, Write};

use consumershield_core::{SavedCase, StrategyRecord, SupportedLanguage};

const COMPLAINT_PREVIEW_CHARS: usize = 60;

// ── Public API ──

/// Print a strategy as a vertical card grouped by section.
pub fn print_strategy_card(record: &StrategyRecord) -> io::Result<()> {
    write_strategy_card(&mut io::stdout().lock(), record)
}

/// Print one line per saved case, newest first.
pub fn print_case_list(cases: &[SavedCase]) -> io::Result<()> {
    write_case_list(&mut io::stdout().lock(), cases)
}

pub fn print_languages() -> io::Result<()> {
    let mut out = io::stdout().lock();
    for lang in SupportedLanguage::ALL {
        if lang.is_base() {
            writeln!(out, "{lang} (original)")?;
        } else {
            writeln!(out, "{lang}")?;
        }
    }
    Ok(())
}

// ── Card rendering ──

pub fn write_strategy_card(out: &mut impl Write, record: &StrategyRecord) -> io::Result<()> {
    let ground = &record.legal_ground;
    let precedent = &record.precedent;
    let risk = &record.risk_analysis;
    let comp = &record.compensation;

    writeln!(out, "=== Section {} ===", or_na(ground.short_section()))?;
    if let Some(term) = ground.term.as_deref().filter(|t| !t.is_empty()) {
        writeln!(out, "{term}")?;
    }
    writeln!(out)?;

    writeln!(out, "Legal Ground")?;
    row(out, "section", or_na(&ground.section))?;
    row(out, "quote", or_default(&ground.quote, "No quote available"))?;
    writeln!(out)?;

    writeln!(out, "Precedent")?;
    row(out, "case", or_na(&precedent.case_name))?;
    row(
        out,
        "summary",
        or_default(&precedent.summary, "No summary available"),
    )?;
    row(out, "strength", &format!("{}%", precedent.strength_score))?;
    writeln!(out)?;

    writeln!(out, "Opposing Counsel")?;
    row(out, "risk level", risk.risk_level.as_str())?;
    let args = risk.counter_arguments_for_display();
    writeln!(out, "  counter-arguments ({}):", args.len())?;
    for arg in args {
        writeln!(out, "    - {arg}")?;
    }
    row(out, "mitigation", or_na(&risk.mitigation_strategy))?;
    writeln!(out)?;

    writeln!(out, "Compensation")?;
    row(out, "total", or_na(&comp.total))?;
    for item in &comp.calculation {
        write!(out, "    {:<30} {:>14}", item.label, item.amount)?;
        if !item.note.is_empty() {
            write!(out, "  ({})", item.note)?;
        }
        writeln!(out)?;
    }
    if !comp.breakdown.is_empty() {
        writeln!(out, "  {}", comp.breakdown)?;
    }
    writeln!(out)?;

    Ok(())
}

pub fn write_case_list(out: &mut impl Write, cases: &[SavedCase]) -> io::Result<()> {
    if cases.is_empty() {
        writeln!(out, "No saved cases.")?;
        return Ok(());
    }
    for case in cases {
        writeln!(
            out,
            "{}  {}  {:<10} {}",
            case.id,
            format_timestamp(case.timestamp),
            or_na(case.result.legal_ground.short_section()),
            preview(&case.complaint)
        )?;
    }
    Ok(())
}

// ── Helpers ──

fn row(out: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {:<26} {}", label, value)
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn or_na(value: &str) -> &str {
    or_default(value, "N/A")
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

fn preview(complaint: &str) -> String {
    let flat = complaint.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > COMPLAINT_PREVIEW_CHARS {
        let cut: String = flat.chars().take(COMPLAINT_PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
