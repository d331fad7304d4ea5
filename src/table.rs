// Data rows and tables handed to the renderers

use indexmap::IndexMap;
use tracing::trace;

/// Labels longer than this are shortened for axis ticks
pub const MAX_SHORT_LABEL_LENGTH: usize = 30;

/// One named series of labeled values.
///
/// Label order is insertion order and becomes the category order of the
/// x-axis once the row is part of a [`DataTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    name: String,
    values: IndexMap<String, f64>,
    show_mean_value: bool,
    show_point: bool,
}

impl DataRow {
    pub fn new(name: impl Into<String>) -> Self {
        DataRow {
            name: name.into(),
            values: IndexMap::new(),
            show_mean_value: false,
            show_point: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a value, or overwrite it in place if the label already exists
    pub fn add_value(&mut self, label: impl Into<String>, value: f64) {
        let label = label.into();
        match self.values.get_mut(&label) {
            Some(existing) => *existing = value,
            None => {
                self.values.insert(label, value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.values.get_index(index).map(|(label, _)| label.as_str())
    }

    /// Label truncated to 30 characters plus `...` when longer
    pub fn short_label(&self, index: usize) -> Option<String> {
        self.label(index).map(shorten_label)
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get_index(index).map(|(_, value)| *value)
    }

    /// Value stored under `label`, 0.0 when the label is unknown
    pub fn value_of(&self, label: &str) -> f64 {
        self.values.get(label).copied().unwrap_or(0.0)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(label, value)| (label.as_str(), *value))
    }

    /// Largest value, never below 0
    pub fn max_value(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }

    pub fn mean_value(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values().sum::<f64>() / self.values.len() as f64
    }

    pub fn show_mean_value(&self) -> bool {
        self.show_mean_value
    }

    pub fn set_show_mean_value(&mut self, show: bool) {
        self.show_mean_value = show;
    }

    /// Whether line charts mark each value of this row with a point
    pub fn show_point(&self) -> bool {
        self.show_point
    }

    pub fn set_show_point(&mut self, show: bool) {
        self.show_point = show;
    }

    /// Rebuild the value map so its labels follow `order` exactly.
    /// Labels missing from the row are filled with 0.0.
    fn conform_to(&mut self, order: &[String]) {
        let mut conformed = IndexMap::with_capacity(order.len());
        for label in order {
            conformed.insert(label.clone(), self.value_of(label));
        }
        self.values = conformed;
    }
}

/// Truncate a label to [`MAX_SHORT_LABEL_LENGTH`] characters, adding `...`
pub fn shorten_label(label: &str) -> String {
    if label.chars().count() > MAX_SHORT_LABEL_LENGTH {
        let mut short: String = label.chars().take(MAX_SHORT_LABEL_LENGTH).collect();
        short.push_str("...");
        short
    } else {
        label.to_string()
    }
}

/// An ordered collection of rows sharing one label set.
///
/// Every row of a table carries the same labels in the same order. The
/// invariant is enforced by [`DataTable::add_row`], the only way to insert
/// rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    name: String,
    subname: Option<String>,
    unit_label: Option<String>,
    show_in_chart: bool,
    show_in_table: bool,
    labels: Vec<String>,
    rows: Vec<DataRow>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        DataTable {
            name: name.into(),
            subname: None,
            unit_label: None,
            show_in_chart: true,
            show_in_table: true,
            labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Title of the table, drawn above charts
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn subname(&self) -> Option<&str> {
        self.subname.as_deref()
    }

    pub fn set_subname(&mut self, subname: impl Into<String>) {
        self.subname = Some(subname.into());
    }

    /// Unit drawn beneath the chart, if any
    pub fn unit_label(&self) -> Option<&str> {
        self.unit_label.as_deref()
    }

    pub fn set_unit_label(&mut self, unit_label: impl Into<String>) {
        self.unit_label = Some(unit_label.into());
    }

    pub fn show_in_chart(&self) -> bool {
        self.show_in_chart
    }

    pub fn set_show_in_chart(&mut self, show: bool) {
        self.show_in_chart = show;
    }

    pub fn show_in_table(&self) -> bool {
        self.show_in_table
    }

    pub fn set_show_in_table(&mut self, show: bool) {
        self.show_in_table = show;
    }

    /// Append a row and widen the table to the union of all labels.
    ///
    /// Labels the table has not seen yet are appended to the label order and
    /// back-filled with 0.0 into every existing row. The new row receives 0.0
    /// for each established label it lacks and is reordered to the table's
    /// label order.
    pub fn add_row(&mut self, mut row: DataRow) {
        let unseen: Vec<String> = row
            .labels()
            .filter(|label| !self.labels.iter().any(|known| known.as_str() == *label))
            .map(str::to_string)
            .collect();

        if !unseen.is_empty() {
            trace!(count = unseen.len(), row = row.name(), "widening table labels");
            self.labels.extend(unseen);
            for existing in &mut self.rows {
                existing.conform_to(&self.labels);
            }
        }

        row.conform_to(&self.labels);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Shared label order of every row
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Global maximum over all rows, never below 0
    pub fn max_value(&self) -> f64 {
        self.rows.iter().map(DataRow::max_value).fold(0.0, f64::max)
    }

    /// Mean of the row means
    pub fn mean_value(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().map(DataRow::mean_value).sum::<f64>() / self.rows.len() as f64
    }

    pub fn show_all_mean_values(&mut self, show: bool) {
        for row in &mut self.rows {
            row.set_show_mean_value(show);
        }
    }

    /// Toggle the mean line of a single row. Returns false for an unknown index.
    pub fn show_mean_value(&mut self, index: usize, show: bool) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.set_show_mean_value(show);
                true
            }
            None => false,
        }
    }

    /// Swap rows and labels.
    ///
    /// Each label becomes a row named after it, holding the original rows'
    /// values at that label keyed by the original row names. Metadata carries
    /// over. An empty table is returned unchanged.
    pub fn transposed(&self) -> DataTable {
        if self.rows.is_empty() {
            return self.clone();
        }

        let mut transposed = DataTable {
            name: self.name.clone(),
            subname: self.subname.clone(),
            unit_label: self.unit_label.clone(),
            show_in_chart: self.show_in_chart,
            show_in_table: self.show_in_table,
            labels: Vec::new(),
            rows: Vec::new(),
        };

        for (index, label) in self.labels.iter().enumerate() {
            let mut row = DataRow::new(label.clone());
            for original in &self.rows {
                row.add_value(original.name(), original.value(index).unwrap_or(0.0));
            }
            transposed.add_row(row);
        }

        transposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, values: &[(&str, f64)]) -> DataRow {
        let mut row = DataRow::new(name);
        for (label, value) in values {
            row.add_value(*label, *value);
        }
        row
    }

    #[test]
    fn test_add_value_overwrites_existing_label() {
        let mut r = row("2007", &[("Jan", 1.0), ("Feb", 2.0)]);
        r.add_value("Jan", 5.0);
        assert_eq!(r.len(), 2);
        assert_eq!(r.label(0), Some("Jan"));
        assert_eq!(r.value(0), Some(5.0));
    }

    #[test]
    fn test_value_of_unknown_label_is_zero() {
        let r = row("a", &[("x", 3.0)]);
        assert_eq!(r.value_of("x"), 3.0);
        assert_eq!(r.value_of("y"), 0.0);
    }

    #[test]
    fn test_short_label_truncation() {
        let thirty = "a".repeat(30);
        let thirty_one = "b".repeat(31);
        let r = row("r", &[(thirty.as_str(), 1.0), (thirty_one.as_str(), 2.0)]);

        assert_eq!(r.short_label(0).unwrap(), thirty);
        assert_eq!(r.short_label(1).unwrap(), format!("{}...", "b".repeat(30)));
    }

    #[test]
    fn test_short_label_counts_characters_not_bytes() {
        let umlauts = "ä".repeat(30);
        assert_eq!(shorten_label(&umlauts), umlauts);
    }

    #[test]
    fn test_row_statistics() {
        let r = row("r", &[("a", 2.0), ("b", 4.0), ("c", 9.0)]);
        assert_eq!(r.max_value(), 9.0);
        assert_eq!(r.mean_value(), 5.0);
        assert_eq!(DataRow::new("empty").mean_value(), 0.0);
    }

    #[test]
    fn test_max_value_floors_at_zero() {
        let r = row("neg", &[("a", -3.0)]);
        assert_eq!(r.max_value(), 0.0);
    }

    #[test]
    fn test_new_label_backfills_existing_rows() {
        let mut table = DataTable::new("t");
        table.add_row(row("first", &[("a", 1.0)]));
        table.add_row(row("second", &[("a", 2.0), ("b", 3.0)]));

        let first = &table.rows()[0];
        assert_eq!(first.len(), 2);
        assert_eq!(first.label(1), Some("b"));
        assert_eq!(first.value(1), Some(0.0));
    }

    #[test]
    fn test_missing_label_backfills_new_row_only() {
        let mut table = DataTable::new("t");
        table.add_row(row("first", &[("a", 1.0), ("b", 2.0)]));
        table.add_row(row("second", &[("a", 7.0)]));

        assert_eq!(table.rows()[0].value_of("b"), 2.0);
        let second = &table.rows()[1];
        assert_eq!(second.len(), 2);
        assert_eq!(second.value_of("b"), 0.0);
    }

    #[test]
    fn test_new_row_follows_table_label_order() {
        let mut table = DataTable::new("t");
        table.add_row(row("first", &[("a", 1.0), ("b", 2.0)]));
        table.add_row(row("second", &[("c", 3.0), ("b", 4.0), ("a", 5.0)]));

        for r in table.rows() {
            let labels: Vec<&str> = r.labels().collect();
            assert_eq!(labels, vec!["a", "b", "c"]);
        }
        assert_eq!(table.rows()[1].value(0), Some(5.0));
        assert_eq!(table.labels(), &["a", "b", "c"]);
    }

    #[test]
    fn test_table_statistics() {
        let mut table = DataTable::new("t");
        table.add_row(row("r1", &[("a", 2.0), ("b", 4.0)]));
        table.add_row(row("r2", &[("a", 10.0), ("b", 0.0)]));
        assert_eq!(table.max_value(), 10.0);
        assert_eq!(table.mean_value(), 4.0);
    }

    #[test]
    fn test_mean_flags() {
        let mut table = DataTable::new("t");
        table.add_row(row("r1", &[("a", 1.0)]));
        table.add_row(row("r2", &[("a", 1.0)]));

        table.show_all_mean_values(true);
        assert!(table.rows().iter().all(DataRow::show_mean_value));

        assert!(table.show_mean_value(1, false));
        assert!(!table.rows()[1].show_mean_value());
        assert!(!table.show_mean_value(5, true));
    }

    #[test]
    fn test_transpose_swaps_rows_and_labels() {
        let mut table = DataTable::new("t");
        table.set_subname("year");
        table.add_row(row("2007", &[("Jan", 1.0), ("Feb", 2.0), ("Mar", 3.0)]));
        table.add_row(row("2008", &[("Jan", 4.0), ("Feb", 5.0), ("Mar", 6.0)]));

        let transposed = table.transposed();
        assert_eq!(transposed.len(), 3);
        assert_eq!(transposed.labels(), &["2007", "2008"]);
        assert_eq!(transposed.rows()[1].name(), "Feb");
        assert_eq!(transposed.rows()[1].value_of("2008"), 5.0);
        assert_eq!(transposed.subname(), Some("year"));
        assert_eq!(transposed.name(), "t");
    }

    #[test]
    fn test_transpose_round_trip() {
        let mut table = DataTable::new("t");
        table.add_row(row("x", &[("a", 1.0), ("b", 2.0)]));
        table.add_row(row("y", &[("a", 3.0), ("b", 4.0)]));
        table.add_row(row("z", &[("a", 5.0), ("b", 6.0)]));

        let round_trip = table.transposed().transposed();
        assert_eq!(round_trip.len(), table.len());
        for (original, restored) in table.rows().iter().zip(round_trip.rows()) {
            assert_eq!(original.name(), restored.name());
            let a: Vec<(&str, f64)> = original.iter().collect();
            let b: Vec<(&str, f64)> = restored.iter().collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_transpose_empty_table_is_unchanged() {
        let mut table = DataTable::new("empty");
        table.set_unit_label("kg");
        assert_eq!(table.transposed(), table);
    }
}
