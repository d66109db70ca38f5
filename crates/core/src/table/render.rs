// Plain-text grid rendering for tables and statistics

/// A labelled text grid: one index column on the left, then right-aligned data columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGrid {
    header: Vec<String>,
    index: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl TextGrid {
    pub fn new(index: Vec<String>) -> Self {
        Self {
            header: Vec::new(),
            index,
            columns: Vec::new(),
        }
    }

    /// Append a column; cells beyond the index length are ignored
    pub fn push_column(&mut self, name: impl Into<String>, cells: Vec<String>) {
        self.header.push(name.into());
        self.columns.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl std::fmt::Display for TextGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.columns.is_empty() {
            return write!(f, "Empty table\nColumns: []\nIndex: []");
        }

        let index_width = self.index.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .header
            .iter()
            .zip(&self.columns)
            .map(|(name, cells)| {
                cells
                    .iter()
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, &width) in self.header.iter().zip(&widths) {
            write!(f, "  {:>width$}", name)?;
        }

        for (row, label) in self.index.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", label)?;
            for (cells, &width) in self.columns.iter().zip(&widths) {
                let cell = cells.get(row).map(String::as_str).unwrap_or("");
                write!(f, "  {:>width$}", cell)?;
            }
        }

        Ok(())
    }
}

/// Render a float the way it round-trips through text: `3.0`, `0.25`, `NaN`
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Render a statistic with six fixed decimals
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", value)
    }
}
