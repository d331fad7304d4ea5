use crate::table::{DataRow, DataTable};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::io::{self, Read};

/// Read a table from CSV.
///
/// The header holds a corner cell followed by the category labels; the
/// corner cell, when not blank, becomes the table's subname. Every record is
/// a row name followed by one value per label. Blank and missing cells read
/// as 0.
pub fn read_table<R: Read>(input: R, title: &str) -> Result<DataTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let Some((corner, labels)) = headers.split_first() else {
        return Err(anyhow!("CSV header must name at least one label"));
    };
    if labels.is_empty() {
        return Err(anyhow!("CSV header must name at least one label after the corner cell"));
    }

    let mut table = DataTable::new(title);
    if !corner.is_empty() {
        table.set_subname(corner.as_str());
    }

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.context("Failed to read CSV record")?;
        let mut fields = record.iter();
        let name = fields.next().unwrap_or_default();

        if record.len() > headers.len() {
            return Err(anyhow!(
                "Row {} has {} columns, expected at most {}",
                row_idx + 1,
                record.len(),
                headers.len()
            ));
        }

        let mut row = DataRow::new(name);
        for label in labels {
            let value = match fields.next().filter(|cell| !cell.is_empty()) {
                Some(cell) => cell.parse::<f64>().with_context(|| {
                    format!(
                        "Failed to parse value '{}' as number in column '{}' at row {}",
                        cell,
                        label,
                        row_idx + 1
                    )
                })?,
                None => 0.0,
            };
            row.add_value(label.as_str(), value);
        }
        table.add_row(row);
    }

    if table.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(table)
}

pub fn read_table_from_stdin(title: &str) -> Result<DataTable> {
    read_table(io::stdin().lock(), title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table_from_string(content: &str) -> Result<DataTable> {
        read_table(Cursor::new(content), "test")
    }

    #[test]
    fn test_read_basic_table() {
        let table = table_from_string("region,Jan,Feb,Mar\nnorth,1,2,3\nsouth,4,5,6").unwrap();
        assert_eq!(table.name(), "test");
        assert_eq!(table.subname(), Some("region"));
        assert_eq!(table.labels(), &["Jan", "Feb", "Mar"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].name(), "north");
        assert_eq!(table.rows()[1].values().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_blank_corner_has_no_subname() {
        let table = table_from_string(",a,b\nr,1,2").unwrap();
        assert_eq!(table.subname(), None);
    }

    #[test]
    fn test_blank_and_missing_cells_read_as_zero() {
        let table = table_from_string("x,a,b,c\nfirst,1,,3\nsecond,4").unwrap();
        assert_eq!(table.rows()[0].values().collect::<Vec<_>>(), vec![1.0, 0.0, 3.0]);
        assert_eq!(table.rows()[1].values().collect::<Vec<_>>(), vec![4.0, 0.0, 0.0]);
        assert_eq!(table.labels(), &["a", "b", "c"]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let table = table_from_string("x, a , b\n r , 1.5 , -2").unwrap();
        assert_eq!(table.rows()[0].name(), "r");
        assert_eq!(table.rows()[0].value_of("a"), 1.5);
        assert_eq!(table.rows()[0].value_of("b"), -2.0);
    }

    #[test]
    fn test_unicode_labels() {
        let table = table_from_string("x,température\nr,20.5").unwrap();
        assert_eq!(table.labels(), &["température"]);
    }

    #[test]
    fn test_non_numeric_value() {
        let result = table_from_string("x,a\nr,not_a_number");
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to parse"));
        assert!(message.contains("column 'a'"));
    }

    #[test]
    fn test_too_many_columns() {
        let result = table_from_string("x,a\nr,1,2");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("expected at most 2"));
    }

    #[test]
    fn test_header_without_labels() {
        let result = table_from_string("x\nr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least one label"));
    }

    #[test]
    fn test_no_data_rows() {
        let result = table_from_string("x,a,b\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least one data row"));
    }
}
