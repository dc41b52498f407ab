//! Standalone printable HTML document.
//!
//! Each page of the report becomes a `<section>` followed by a forced page
//! break in print media, so printing the file from a browser produces one
//! PDF page (or more) per dimension. Styles are embedded; the file has no
//! external assets.

use super::html::render_markdown;
use super::split::split_pages;
use std::fmt::Write as _;

/// Title used when the report has no level-1 heading.
pub const DEFAULT_TITLE: &str = "Informe de Diagnòstic Talent D'Anchiano";

const REPORT_CSS: &str = r#"
:root { --ink: #1e293b; --muted: #64748b; --accent: #312e81; --line: #e2e8f0; }
* { box-sizing: border-box; }
body { margin: 0; background: #f8fafc; color: var(--ink); font: 15px/1.6 system-ui, -apple-system, "Segoe UI", sans-serif; }
.report { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }
.report-page { background: #fff; border: 1px solid var(--line); border-radius: 1.5rem; padding: 3rem; margin-bottom: 2rem; }
.report-page-number { color: var(--muted); font-size: .75rem; letter-spacing: .15em; text-transform: uppercase; }
.report-h1 { font-size: 1.9rem; font-weight: 800; color: var(--accent); margin: 2.5rem 0 1.5rem; padding-bottom: .5rem; border-bottom: 2px solid #e0e7ff; }
.report-h2 { font-size: 1.5rem; font-weight: 700; color: #3730a3; margin: 2rem 0 1rem; padding-bottom: .5rem; border-bottom: 1px solid var(--line); }
.report-h3 { font-size: 1.25rem; font-weight: 700; margin: 1.5rem 0 .75rem; }
.report-strong { font-weight: 700; color: #4338ca; }
.report-paragraph { margin: 0 0 1rem; color: #334155; }
.report-numbered { margin: 0 0 .5rem .5rem; font-weight: 500; }
.report-list { margin: 0 0 1rem 1.5rem; padding: 0; }
.report-item { margin-bottom: .25rem; color: #334155; list-style: disc; }
.report-table-wrap { overflow-x: auto; margin: 2rem 0; border: 1px solid var(--line); border-radius: 1rem; }
.report-table { width: 100%; border-collapse: collapse; }
.report-head-row { background: #eef2ff; }
.report-th { padding: 1rem 1.5rem; text-align: left; font-size: .75rem; font-weight: 800; color: var(--accent); text-transform: uppercase; letter-spacing: .1em; border-right: 1px solid #e0e7ff; }
.report-td { padding: 1rem 1.5rem; font-size: .875rem; vertical-align: top; border-top: 1px solid var(--line); border-right: 1px solid #f1f5f9; }
.report-th:last-child, .report-td:last-child { border-right: 0; }
.swot-label-row { background: #f8fafc; font-weight: 700; }
.swot-icon { display: inline-block; width: 1.25rem; }
.swot-strength { background: #ecfdf5; border-left: 4px solid #10b981; color: #065f46; }
.swot-opportunity { background: #eff6ff; border-left: 4px solid #3b82f6; color: #1e40af; }
.swot-weakness { background: #fff7ed; border-left: 4px solid #f97316; color: #9a3412; }
.swot-threat { background: #fef2f2; border-left: 4px solid #ef4444; color: #991b1b; }
.severity-critical { background: #fee2e2; color: #991b1b; font-weight: 800; }
.severity-notable { background: #fef9c3; color: #854d0e; font-weight: 700; }
.severity-irrelevant { background: #f1f5f9; color: var(--muted); }
.cell-lead { margin-bottom: .25rem; }
.cell-item { margin-bottom: .35rem; }
.cell-label { font-weight: 700; }
.cell-desc { color: var(--muted); }
.cell-bullet { margin-bottom: .25rem; }
@media print {
  body { background: #fff; }
  .report { max-width: none; padding: 0; }
  .report-page { border: 0; border-radius: 0; padding: 0; margin: 0; break-after: page; page-break-after: always; }
  .report-page:last-child { break-after: auto; page-break-after: auto; }
  .report-table-wrap { overflow: visible; break-inside: avoid; }
}
"#;

/// Render a whole report as a printable HTML document.
pub fn render_document(report: &str) -> String {
    let pages = split_pages(report);
    let total = pages.len();

    let mut body = String::new();
    for (i, page) in pages.iter().enumerate() {
        let _ = write!(
            body,
            "<section class=\"report-page\" data-page=\"{n}\">\n<div class=\"report-page-number\">Pàgina {n} de {total}</div>\n{}\n</section>\n",
            render_markdown(page),
            n = i + 1,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="ca">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<main class="report">
{body}</main>
</body>
</html>
"#,
        title = escape_text(&document_title(report)),
        css = REPORT_CSS,
    )
}

/// Text of the first level-1 heading, stripped of bold markup.
pub fn document_title(report: &str) -> String {
    report
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.replace("**", "").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
