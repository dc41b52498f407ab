//! Line classification: page text → ordered [`Block`] sequence.
//!
//! Each line lands in exactly one block. Pipe-prefixed lines are buffered
//! until the run ends and become a single [`Block::Table`]; every other line
//! is classified on its own, in this order: blank, heading, numbered line,
//! bullet item, raw HTML, bold run, paragraph.

use super::table::TableBlock;
use once_cell::sync::Lazy;
use regex::Regex;

/// `1. `, `12. ` at the start of a line.
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());

/// A classified unit of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// `#`, `##` or `###` heading; deeper levels are paragraphs.
    Heading { level: u8, text: &'a str },
    /// Line opening with a `**bold**` span; emitted without a paragraph wrapper.
    BoldRun(&'a str),
    /// Numeral-prefixed line, numeral included.
    OrderedItem(&'a str),
    /// `- ` line, marker excluded.
    UnorderedItem(&'a str),
    Paragraph(&'a str),
    Table(TableBlock),
    /// Line that already is HTML.
    Raw(&'a str),
    Blank,
}

/// Classify every line of a page.
pub fn parse_blocks(page: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut table: Vec<&str> = Vec::new();

    for line in page.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('|') {
            table.push(trimmed);
            continue;
        }
        if !table.is_empty() {
            blocks.push(Block::Table(TableBlock::parse(&table)));
            table.clear();
        }
        blocks.push(classify_line(line));
    }
    if !table.is_empty() {
        blocks.push(Block::Table(TableBlock::parse(&table)));
    }
    blocks
}

/// Classify a single non-table line.
pub fn classify_line(line: &str) -> Block<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Block::Blank;
    }
    if let Some(heading) = heading(line) {
        return heading;
    }
    if RE_NUMBERED.is_match(line) {
        return Block::OrderedItem(trimmed);
    }
    if let Some(item) = line.strip_prefix("- ") {
        return Block::UnorderedItem(item.trim());
    }
    if trimmed.starts_with('<') {
        return Block::Raw(trimmed);
    }
    if trimmed.starts_with("**") {
        return Block::BoldRun(trimmed);
    }
    Block::Paragraph(trimmed)
}

fn heading(line: &str) -> Option<Block<'_>> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| {
            line.strip_prefix(prefix).map(|text| Block::Heading {
                level,
                text: text.trim(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_up_to_level_three() {
        assert_eq!(
            classify_line("# Informe"),
            Block::Heading { level: 1, text: "Informe" }
        );
        assert_eq!(
            classify_line("### Objectiu 1: Comunicació"),
            Block::Heading { level: 3, text: "Objectiu 1: Comunicació" }
        );
        assert_eq!(classify_line("#### Massa profund"), Block::Paragraph("#### Massa profund"));
        assert_eq!(classify_line("#Sense espai"), Block::Paragraph("#Sense espai"));
    }

    #[test]
    fn numbered_line_keeps_numeral() {
        assert_eq!(classify_line("1. First step"), Block::OrderedItem("1. First step"));
        assert_eq!(classify_line("12. Pas"), Block::OrderedItem("12. Pas"));
        assert_eq!(classify_line("1.5 punts"), Block::Paragraph("1.5 punts"));
    }

    #[test]
    fn bullets_raw_and_bold_runs() {
        assert_eq!(
            classify_line("- **S (Específic)**: Curs"),
            Block::UnorderedItem("**S (Específic)**: Curs")
        );
        assert_eq!(classify_line("  - sagnat"), Block::Paragraph("- sagnat"));
        assert_eq!(classify_line("<hr/>"), Block::Raw("<hr/>"));
        assert_eq!(
            classify_line("**MODEL GRUP:** ideal"),
            Block::BoldRun("**MODEL GRUP:** ideal")
        );
        assert_eq!(classify_line("   "), Block::Blank);
    }

    #[test]
    fn table_run_closes_on_first_non_pipe_line() {
        let page = "Intro\n| A | B |\n| --- | --- |\n| 1 | 2 |\nDesprés\n| C |";
        let blocks = parse_blocks(page);
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], Block::Paragraph("Intro"));
        match &blocks[1] {
            Block::Table(t) => {
                assert_eq!(t.header.as_deref(), Some(&["A".to_string(), "B".to_string()][..]));
                assert_eq!(t.rows.len(), 1);
            }
            other => panic!("expected table, got {other:?}"),
        }
        assert_eq!(blocks[2], Block::Paragraph("Després"));
        assert!(matches!(blocks[3], Block::Table(_)));
    }

    #[test]
    fn indented_pipe_lines_are_table_rows() {
        let blocks = parse_blocks("   | x | y |\n   | 1 | 2 |");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Table(_)));
    }
}
