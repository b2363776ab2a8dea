//! IX-004: Column-aligned table grammar.
//!
//! CLI listings right-pad each column to a fixed width, so the header row's
//! word offsets describe the layout of every following row. Splitting a row
//! into cells is delegated to a [`ColumnGrammar`] so a different grammar can
//! replace the offset-based one without touching the record model.

use regex::Regex;
use std::sync::LazyLock;

static HEADER_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("static regex"));

static CELL_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}|\t").expect("static regex"));

/// A header column: its label and starting character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub offset: usize,
}

/// Column layout taken from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    pub columns: Vec<Column>,
}

impl TableHeader {
    /// Detect a header row: at least two words accepted by `is_known`.
    /// Unknown words still become columns so they delimit their neighbours.
    pub fn detect(line: &str, is_known: impl Fn(&str) -> bool) -> Option<Self> {
        let columns: Vec<Column> = HEADER_WORD
            .find_iter(line)
            .map(|m| Column {
                label: m.as_str().to_string(),
                offset: line[..m.start()].chars().count(),
            })
            .collect();

        let known = columns.iter().filter(|c| is_known(&c.label)).count();
        if known >= 2 {
            Some(Self { columns })
        } else {
            None
        }
    }

    /// Smallest offset after the first column. Rows shorter than this never
    /// reach a second cell and are treated as wrapped continuation lines.
    pub fn min_data_width(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.offset)
            .filter(|&o| o > 0)
            .min()
            .unwrap_or(0)
    }
}

/// Splits a data row into exactly one cell per header column.
pub trait ColumnGrammar {
    /// Returns `None` when this grammar cannot account for the row.
    fn split(&self, line: &str, header: &TableHeader) -> Option<Vec<String>>;
}

/// Cells separated by runs of two or more spaces (or tabs).
///
/// Only accepted when the row yields exactly as many cells as the header has
/// columns. Rows that line up with the header are claimed by
/// [`FixedWidth::ALIGNED`] first, so a double space inside a cell cannot shift
/// an aligned row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Delimited;

impl ColumnGrammar for Delimited {
    fn split(&self, line: &str, header: &TableHeader) -> Option<Vec<String>> {
        let cells: Vec<String> = CELL_GAP
            .split(line.trim())
            .map(|c| c.trim().to_string())
            .collect();
        (cells.len() == header.columns.len()).then_some(cells)
    }
}

/// Cells sliced at the header's character offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidth {
    /// Reject rows whose text crosses a column boundary
    pub require_alignment: bool,
}

impl FixedWidth {
    pub const ALIGNED: Self = Self {
        require_alignment: true,
    };
    pub const LOOSE: Self = Self {
        require_alignment: false,
    };
}

/// Every column boundary inside the row is preceded by whitespace.
fn is_aligned(chars: &[char], header: &TableHeader) -> bool {
    header
        .columns
        .iter()
        .map(|c| c.offset)
        .filter(|&o| o > 0 && o < chars.len())
        .all(|o| chars[o - 1].is_whitespace())
}

impl ColumnGrammar for FixedWidth {
    fn split(&self, line: &str, header: &TableHeader) -> Option<Vec<String>> {
        let chars: Vec<char> = line.trim_end().chars().collect();
        if chars.len() < header.min_data_width() {
            return None;
        }
        if self.require_alignment && !is_aligned(&chars, header) {
            return None;
        }

        let cells = header
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let start = col.offset.min(chars.len());
                let end = header
                    .columns
                    .get(i + 1)
                    .map_or(chars.len(), |next| next.offset.min(chars.len()));
                chars[start..end.max(start)]
                    .iter()
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .collect();
        Some(cells)
    }
}

/// Try each grammar in order; the first that accepts the row wins.
pub fn split_row(line: &str, header: &TableHeader, grammars: &[&dyn ColumnGrammar]) -> Option<Vec<String>> {
    grammars.iter().find_map(|g| g.split(line, header))
}

/// The grammars used for CLI listings: aligned fixed width, then delimited
/// for hand-typed rows, then fixed width regardless of alignment.
pub fn default_grammars() -> [&'static dyn ColumnGrammar; 3] {
    [&FixedWidth::ALIGNED, &Delimited, &FixedWidth::LOOSE]
}

/// A rule line under a header (`----`, `====`, box-drawing dashes).
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| matches!(c, '-' | '=' | '─' | '━') || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(label: &str) -> bool {
        matches!(
            label.to_ascii_lowercase().as_str(),
            "name" | "id" | "version" | "available" | "source"
        )
    }

    fn header(line: &str) -> TableHeader {
        TableHeader::detect(line, known).unwrap()
    }

    #[test]
    fn test_ix004_detect_offsets() {
        let h = header("Name    Id          Version");
        let offsets: Vec<_> = h.columns.iter().map(|c| (c.label.as_str(), c.offset)).collect();
        assert_eq!(offsets, vec![("Name", 0), ("Id", 8), ("Version", 20)]);
    }

    #[test]
    fn test_ix004_detect_requires_two_known() {
        assert!(TableHeader::detect("Name  Description", known).is_none());
        assert!(TableHeader::detect("not json {not a table", known).is_none());
    }

    #[test]
    fn test_ix004_unknown_columns_kept() {
        let h = header("Name   Match   Id");
        assert_eq!(h.columns.len(), 3);
        assert_eq!(h.columns[1].label, "Match");
    }

    #[test]
    fn test_ix004_offsets_count_chars() {
        let h = header("Näme    Id      Version");
        assert_eq!(h.columns[1].label, "Id");
        assert_eq!(h.columns[1].offset, 8);
    }

    #[test]
    fn test_ix004_delimited_split() {
        let h = header("Name    Id          Version");
        let cells = Delimited.split("Notepad++  npp.install  8.5", &h).unwrap();
        assert_eq!(cells, vec!["Notepad++", "npp.install", "8.5"]);
    }

    #[test]
    fn test_ix004_delimited_rejects_short_row() {
        let h = header("Name    Id          Version     Available");
        assert!(Delimited.split("Foo     foo.id      1.0", &h).is_none());
    }

    #[test]
    fn test_ix004_fixed_width_blank_cell() {
        let h = header("Name    Id          Version     Available Source");
        let line = "Foo Bar foo.bar     1.0                   winget";
        let cells = FixedWidth::LOOSE.split(line, &h).unwrap();
        assert_eq!(cells, vec!["Foo Bar", "foo.bar", "1.0", "", "winget"]);
    }

    #[test]
    fn test_ix004_fixed_width_short_line_skipped() {
        let h = header("Name    Id          Version");
        assert!(FixedWidth::LOOSE.split("wrap", &h).is_none());
    }

    #[test]
    fn test_ix004_split_row_falls_back() {
        let h = header("Name    Id          Version     Available");
        let line = "Foo     foo.id      1.0";
        let cells = split_row(line, &h, &default_grammars()).unwrap();
        assert_eq!(cells, vec!["Foo", "foo.id", "1.0", ""]);
    }

    #[test]
    fn test_ix004_aligned_row_with_inner_gap() {
        let h = header("Name              Id        Version   Available  Source");
        let line = "Foo  Bar          foo.bar   1.0                  winget";
        let cells = split_row(line, &h, &default_grammars()).unwrap();
        assert_eq!(cells, vec!["Foo  Bar", "foo.bar", "1.0", "", "winget"]);
    }

    #[test]
    fn test_ix004_aligned_rejects_crossing_text() {
        let h = header("Name    Id          Version");
        assert!(FixedWidth::ALIGNED.split("Notepad++  npp.install  8.5", &h).is_none());
        let cells = split_row("Notepad++  npp.install  8.5", &h, &default_grammars()).unwrap();
        assert_eq!(cells, vec!["Notepad++", "npp.install", "8.5"]);
    }

    #[test]
    fn test_ix004_loose_fallback_when_unaligned() {
        let h = header("Name      Id        Version   Source");
        let line = "Some Tool ARP\\Tool\\x 1.2";
        let cells = split_row(line, &h, &default_grammars()).unwrap();
        assert_eq!(cells[0], "Some Tool");
        assert_eq!(cells[3], "");
    }

    #[test]
    fn test_ix004_separator() {
        assert!(is_separator("--------------------------"));
        assert!(is_separator("===== ====="));
        assert!(!is_separator(""));
        assert!(!is_separator("Name - Id"));
    }
}
