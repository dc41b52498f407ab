//! Report exports: Markdown, LaTeX, Python script and printable HTML.
//!
//! Every exporter is a pure function of the report text. The LaTeX export is
//! lossy: headings and bold survive, table structure does not.

use crate::error::ReportError;
use crate::pipeline::postprocess::clean_report;
use crate::report::render_document;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// A downloadable artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Latex,
    Python,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Markdown,
        ExportFormat::Latex,
        ExportFormat::Python,
        ExportFormat::Html,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "diagnostic-anchiano.md",
            ExportFormat::Latex => "diagnostic-anchiano.tex",
            ExportFormat::Python => "diagnosi_anchiano.py",
            ExportFormat::Html => "diagnostic-anchiano.html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Latex => "application/x-tex",
            ExportFormat::Python => "text/x-python",
            ExportFormat::Html => "text/html",
        }
    }

    /// Render `report` in this format.
    pub fn render(&self, report: &str) -> String {
        match self {
            ExportFormat::Markdown => to_markdown(report),
            ExportFormat::Latex => to_latex(report),
            ExportFormat::Python => to_python_script(report),
            ExportFormat::Html => render_document(&clean_report(report)),
        }
    }

    /// Parse a comma-separated list such as `md,tex`. Duplicates are dropped.
    pub fn parse_list(list: &str) -> Result<Vec<ExportFormat>, ReportError> {
        let mut formats = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let format: ExportFormat = item.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(ReportError::InvalidConfig(
                "at least one export format is required".into(),
            ));
        }
        Ok(formats)
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "tex" | "latex" => Ok(ExportFormat::Latex),
            "py" | "python" => Ok(ExportFormat::Python),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(ReportError::InvalidConfig(format!(
                "unknown export format '{other}' (expected md, tex, py or html)"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Latex => "tex",
            ExportFormat::Python => "py",
            ExportFormat::Html => "html",
        };
        f.write_str(s)
    }
}

/// One rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

impl Export {
    pub fn new(format: ExportFormat, report: &str) -> Self {
        Self {
            format,
            file_name: format.file_name(),
            mime_type: format.mime_type(),
            contents: format.render(report),
        }
    }
}

// ── Markdown ─────────────────────────────────────────────────────────────

/// The report, byte for byte.
pub fn to_markdown(report: &str) -> String {
    report.to_string()
}

// ── LaTeX ────────────────────────────────────────────────────────────────

const LATEX_PREAMBLE: &str = r"\documentclass{article}
\usepackage[utf8]{inputenc}
\usepackage[catalan]{babel}
\usepackage{booktabs}
\usepackage{geometry}
\usepackage{longtable}
\geometry{a4paper, margin=1in}
\title{Informe de Diagnòstic Talent D'Anchiano}
\author{Analista IA}
\date{\today}
\begin{document}
\maketitle
";

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Wrap the report in a fixed article preamble.
pub fn to_latex(report: &str) -> String {
    let body = report.lines().map(latex_line).collect::<Vec<_>>().join("\n");
    format!("{LATEX_PREAMBLE}\n{body}\n\n\\end{{document}}\n")
}

fn latex_line(line: &str) -> String {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    let command = match hashes {
        1 => Some("section*"),
        2 => Some("subsection*"),
        3.. => Some("subsubsection*"),
        _ => None,
    };

    match command {
        Some(cmd) => format!("\\{cmd}{{{}}}", latex_text(line[hashes..].trim())),
        None => latex_text(line),
    }
}

fn latex_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            '#' | '%' | '&' | '_' | '$' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '|' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    RE_BOLD.replace_all(&escaped, r"\textbf{$1}").into_owned()
}

// ── Python ───────────────────────────────────────────────────────────────

/// A script that prints the report, e.g. for a notebook cell.
pub fn to_python_script(report: &str) -> String {
    let literal = report.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "# Diagnòstic D'Anchiano - Google Colab\n\
         report_data = \"\"\"\n{literal}\n\"\"\"\n\
         def show_report():\n    print(report_data)\n\n\
         if __name__ == \"__main__\":\n    show_report()\n"
    )
}

// ── Writing ──────────────────────────────────────────────────────────────

/// Write every requested format into `dir`, returning the written paths.
///
/// The directory is created if needed. Each file is written atomically
/// (temp file + rename), so an interrupted run never leaves a truncated
/// export behind.
pub async fn write_exports(
    report: &str,
    dir: impl AsRef<Path>,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, ReportError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let export = Export::new(format, report);
        let path = dir.join(export.file_name);
        write_atomic(&path, &export.contents).await?;
        debug!("Wrote {} ({} bytes)", path.display(), export.contents.len());
        written.push(path);
    }

    info!("Wrote {} export(s) to {}", written.len(), dir.display());
    Ok(written)
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), ReportError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "# Informe\n## Competències\n**Lideratge**: 8/10 & creixent\n| A | B |\n[[PAGE_BREAK]]\n# Valors";

    #[test]
    fn markdown_is_verbatim() {
        assert_eq!(to_markdown(REPORT), REPORT);
    }

    #[test]
    fn latex_headings_bold_and_pipes() {
        let tex = to_latex(REPORT);
        assert!(tex.starts_with("\\documentclass{article}"));
        assert!(tex.contains("\\usepackage[catalan]{babel}"));
        assert!(tex.contains("\\section*{Informe}"));
        assert!(tex.contains("\\subsection*{Competències}"));
        assert!(tex.contains("\\textbf{Lideratge}: 8/10 \\& creixent"));
        assert!(tex.contains("  A   B  "));
        assert!(tex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn latex_escapes_inline_hash() {
        assert_eq!(latex_line("Punt #3"), "Punt \\#3");
        assert_eq!(latex_line("#### Detall"), "\\subsubsection*{Detall}");
    }

    #[test]
    fn latex_escapes_special_characters() {
        assert_eq!(
            latex_line(r"{a} ~b^2 \c 50% x_y"),
            r"\{a\} \textasciitilde{}b\textasciicircum{}2 \textbackslash{}c 50\% x\_y"
        );
        assert_eq!(latex_line("# **Nota** {final}"), r"\section*{\textbf{Nota} \{final\}}");
    }

    #[test]
    fn python_script_escapes_backslashes() {
        let py = to_python_script("C:\\x \"y\"");
        assert!(py.contains("report_data = \"\"\"\nC:\\\\x \\\"y\\\"\n\"\"\""));
    }

    #[test]
    fn python_script_escapes_quotes() {
        let py = to_python_script("Diu \"hola\"");
        assert!(py.starts_with("# Diagnòstic D'Anchiano - Google Colab\n"));
        assert!(py.contains("report_data = \"\"\"\nDiu \\\"hola\\\"\n\"\"\""));
        assert!(py.contains("def show_report():\n    print(report_data)"));
        assert!(py.ends_with("if __name__ == \"__main__\":\n    show_report()\n"));
    }

    #[test]
    fn parse_format_list() {
        let formats = ExportFormat::parse_list("md, tex,md,HTML").unwrap();
        assert_eq!(
            formats,
            vec![ExportFormat::Markdown, ExportFormat::Latex, ExportFormat::Html]
        );
        assert!(ExportFormat::parse_list("pdf").is_err());
        assert!(ExportFormat::parse_list(" , ").is_err());
    }

    #[test]
    fn export_metadata() {
        let e = Export::new(ExportFormat::Python, "x");
        assert_eq!(e.file_name, "diagnosi_anchiano.py");
        assert_eq!(e.mime_type, "text/x-python");
        assert_eq!(ExportFormat::Latex.to_string(), "tex");
    }

    #[test]
    fn write_exports_to_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("informes");
        let paths = tokio_test::block_on(write_exports(REPORT, &out, &ExportFormat::ALL)).unwrap();

        assert_eq!(paths.len(), 4);
        for p in &paths {
            assert!(p.exists(), "missing {}", p.display());
        }
        let md = std::fs::read_to_string(out.join("diagnostic-anchiano.md")).unwrap();
        assert_eq!(md, REPORT);
        assert!(!out.join("diagnostic-anchiano.md.tmp").exists());
    }
}
