pub mod client;
pub mod parse;
pub mod template;

/// Raw worksheet contents as returned by the Sheets values API: a row-major
/// grid of formatted cell strings. Trailing empty cells are not padded by the
/// API, so all accessors are range-checked.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    rows: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Zero-based cell access. Returns `None` when the cell is outside the
    /// grid, `Some("")` when the cell exists but is blank.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn has_row(&self, row: usize) -> bool {
        row < self.rows.len()
    }
}

/// Zero-based grid position of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// Parse an A1-style cell address ("AS13") into a zero-based `CellRef`.
pub fn parse_a1(cell: &str) -> Option<CellRef> {
    let cell = cell.trim();
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || digits.is_empty() {
        return None;
    }

    let mut col: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some(CellRef {
        row: row - 1,
        col: col - 1,
    })
}
