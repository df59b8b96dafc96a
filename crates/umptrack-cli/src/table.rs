//! Plain-text boxed tables for the report views.

use std::fmt;

use umptrack_core::models::{LeagueSummary, LedgerEntry, UnpaidGame};
use umptrack_core::utils::{format_date, format_fee, format_flag, format_mileage, truncate_string};

/// Longest cell text before truncation
const MAX_CELL_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

struct ColFmt {
    label: String,
    align: Align,
    width: usize,
    cells: Vec<String>,
}

impl ColFmt {
    fn new(label: &str, align: Align) -> Self {
        Self {
            label: label.to_string(),
            align,
            width: label.chars().count(),
            cells: Vec::new(),
        }
    }

    fn push(&mut self, text: String) {
        let text = truncate_string(&text, MAX_CELL_WIDTH);
        self.width = self.width.max(text.chars().count());
        self.cells.push(text);
    }

    fn write_cell(&self, f: &mut fmt::Formatter, text: &str, align: Align) -> fmt::Result {
        let pad = " ".repeat(self.width.saturating_sub(text.chars().count()));
        match align {
            Align::Left => write!(f, " {}{} ", text, pad),
            Align::Right => write!(f, " {}{} ", pad, text),
        }
    }
}

/// A titled table built column by column.
pub struct TextTable {
    title: String,
    columns: Vec<ColFmt>,
}

impl TextTable {
    pub fn new(title: &str, columns: &[(&str, Align)]) -> Self {
        Self {
            title: title.to_string(),
            columns: columns
                .iter()
                .map(|(label, align)| ColFmt::new(label, *align))
                .collect(),
        }
    }

    /// Append a row; missing cells are left blank, extra cells dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        let mut cells = cells.into_iter();
        for col in &mut self.columns {
            col.push(cells.next().unwrap_or_default());
        }
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    fn inner_width(&self) -> usize {
        self.columns.iter().map(|c| c.width + 3).sum::<usize>().saturating_sub(1)
    }

    /// Header row when `idx` is `None`, otherwise data row `idx`
    fn write_row(&self, f: &mut fmt::Formatter, idx: Option<usize>, stretch: usize) -> fmt::Result {
        let last = self.columns.len().saturating_sub(1);
        write!(f, "{}", VLINE)?;
        for (i, col) in self.columns.iter().enumerate() {
            let (text, align) = match idx {
                Some(row) => (col.cells[row].as_str(), col.align),
                None => (col.label.as_str(), Align::Left),
            };
            col.write_cell(f, text, align)?;
            if i == last {
                write!(f, "{}", " ".repeat(stretch))?;
            }
            write!(f, "{}", VLINE)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner_width().max(self.title.chars().count() + 2);
        // the last column absorbs any extra width a long title needs
        let last = self.columns.len().saturating_sub(1);
        let stretch = inner - self.inner_width();

        // upper border and title
        writeln!(f, "{}{}{}", ULCORNER, HLINE.repeat(inner), URCORNER)?;
        let title_pad = inner - self.title.chars().count();
        let left = title_pad / 2;
        writeln!(
            f,
            "{}{}{}{}{}",
            VLINE,
            " ".repeat(left),
            self.title,
            " ".repeat(title_pad - left),
            VLINE
        )?;

        let lines: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let extra = if i == last { stretch } else { 0 };
                HLINE.repeat(c.width + 2 + extra)
            })
            .collect();

        writeln!(f, "{}{}{}", RTJOIN, lines.join(LOJOIN), LTJOIN)?;
        self.write_row(f, None, stretch)?;
        writeln!(f, "{}{}{}", RTJOIN, lines.join(CROSS), LTJOIN)?;
        for idx in 0..self.rows() {
            self.write_row(f, Some(idx), stretch)?;
        }
        write!(f, "{}{}{}", DLCORNER, lines.join(HIJOIN), DRCORNER)
    }
}

pub fn season_summary(title: &str, rows: &[LeagueSummary]) -> TextTable {
    let mut table = TextTable::new(
        title,
        &[
            ("League", Align::Left),
            ("Games", Align::Right),
            ("Owed", Align::Right),
            ("Paid", Align::Right),
            ("Mileage", Align::Right),
        ],
    );
    for row in rows {
        table.push_row(vec![
            row.league.clone(),
            row.games.to_string(),
            format_fee(row.owed),
            format_fee(row.paid),
            format_mileage(row.mileage),
        ]);
    }
    table
}

pub fn unpaid_games(rows: &[UnpaidGame]) -> TextTable {
    let mut table = TextTable::new(
        "Unpaid Games",
        &[
            ("ID", Align::Right),
            ("Date", Align::Left),
            ("Site", Align::Left),
            ("League", Align::Left),
            ("Assignor", Align::Left),
            ("Game Fee", Align::Right),
            ("Paid", Align::Left),
        ],
    );
    for row in rows {
        table.push_row(vec![
            row.id.to_string(),
            format_date(row.date),
            row.site.clone(),
            row.league.clone(),
            row.assignor.clone(),
            format_fee(row.fee),
            format_flag(row.paid).to_string(),
        ]);
    }
    table
}

pub fn master_ledger(rows: &[LedgerEntry]) -> TextTable {
    let mut table = TextTable::new(
        "Master Ledger",
        &[
            ("ID", Align::Right),
            ("Date", Align::Left),
            ("Site", Align::Left),
            ("Assignor", Align::Left),
            ("Fee", Align::Right),
            ("Paid", Align::Left),
            ("Vol", Align::Left),
        ],
    );
    for row in rows {
        table.push_row(vec![
            row.id.to_string(),
            format_date(row.date),
            row.site.clone(),
            row.assignor.clone(),
            format_fee(row.fee),
            format_flag(row.paid).to_string(),
            format_flag(row.volunteer).to_string(),
        ]);
    }
    table
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_rows_are_aligned() {
        let mut table = TextTable::new("Totals", &[("Name", Align::Left), ("N", Align::Right)]);
        table.push_row(vec!["alpha".to_string(), "7".to_string()]);
        table.push_row(vec!["b".to_string(), "123".to_string()]);
        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 8);
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
        assert!(lines[1].contains("Totals"));
        assert_eq!(lines[5], "│ alpha │   7 │");
        assert_eq!(lines[6], "│ b     │ 123 │");
    }

    #[test]
    fn test_long_title_widens_last_column() {
        let mut table = TextTable::new("A Much Longer Title", &[("X", Align::Left)]);
        table.push_row(vec!["1".to_string()]);
        let rendered = table.to_string();
        let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = TextTable::new("T", &[("A", Align::Left), ("B", Align::Left)]);
        table.push_row(vec!["only".to_string()]);
        assert_eq!(table.rows(), 1);
        assert!(table.to_string().contains("│ only │   │"));
    }

    #[test]
    fn test_unpaid_table_contents() {
        let rows = vec![UnpaidGame {
            id: 3,
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            site: "Sevier Park".to_string(),
            league: "MTABA".to_string(),
            assignor: "4 Star".to_string(),
            fee: 90,
            paid: false,
        }];
        let rendered = unpaid_games(&rows).to_string();
        assert!(rendered.contains("Unpaid Games"));
        assert!(rendered.contains("2026-04-02"));
        assert!(rendered.contains("$90"));
    }
}
