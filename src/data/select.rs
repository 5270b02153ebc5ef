use std::collections::BTreeMap;

use super::model::{CellValue, Table};
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Names of numeric columns in table order, minus anything in `exclude`.
pub fn numeric_columns(table: &Table, exclude: &[&str]) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.is_numeric() && !exclude.contains(&c.name()))
        .map(|c| c.name().to_string())
        .collect()
}

/// Reduced table holding only `names`, in the given order.
pub fn project(table: &Table, names: &[String]) -> Result<Table, PlotError> {
    let columns = names
        .iter()
        .map(|name| {
            table
                .column(name)
                .cloned()
                .ok_or_else(|| PlotError::MissingColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::new(columns))
}

/// Numeric values of one column, NaN for missing cells.
pub fn numeric_series(table: &Table, name: &str) -> Result<Vec<f64>, PlotError> {
    let column = table
        .column(name)
        .ok_or_else(|| PlotError::MissingColumn(name.to_string()))?;
    column
        .to_f64()
        .ok_or_else(|| PlotError::NonNumericColumn(name.to_string()))
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Row indices per distinct value of the grouping column, in sorted value
/// order. Rows whose group value is null belong to no group.
pub type GroupPartition = BTreeMap<CellValue, Vec<usize>>;

pub fn partition_rows(table: &Table, group_column: &str) -> Result<GroupPartition, PlotError> {
    let column = table
        .column(group_column)
        .ok_or_else(|| PlotError::MissingColumn(group_column.to_string()))?;

    let mut groups = GroupPartition::new();
    for (row, value) in column.values().iter().enumerate() {
        if value.is_null() {
            continue;
        }
        groups.entry(value.clone()).or_default().push(row);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_text;

    fn table(text: &str) -> Table {
        parse_text(text).unwrap().1
    }

    #[test]
    fn numeric_columns_keep_table_order() {
        let t = table("b,label,a\n1,x,2\n3,y,4\n");
        assert_eq!(numeric_columns(&t, &[]), vec!["b", "a"]);
    }

    #[test]
    fn numeric_columns_honour_exclusions() {
        let t = table("a,b,z\n1,2,3\n4,5,6\n");
        assert_eq!(numeric_columns(&t, &["z"]), vec!["a", "b"]);
        assert_eq!(numeric_columns(&t, &["a", "b", "z"]), Vec::<String>::new());
    }

    #[test]
    fn projection_follows_requested_order() {
        let t = table("a,b,c\n1,2,3\n");
        let p = project(&t, &["c".to_string(), "a".to_string()]).unwrap();
        assert_eq!(p.column_names(), vec!["c", "a"]);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn projection_of_unknown_column_fails() {
        let t = table("a,b\n1,2\n");
        let err = project(&t, &["q".to_string()]).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(name) if name == "q"));
    }

    #[test]
    fn numeric_series_rejects_text() {
        let t = table("a,z\n1,A\n");
        assert!(matches!(
            numeric_series(&t, "z"),
            Err(PlotError::NonNumericColumn(_))
        ));
    }

    #[test]
    fn partition_sorts_groups_and_skips_nulls() {
        let t = table("a,b,z\n1,2,B\n2,4,A\n3,6,\n4,8,B\n");
        let groups = partition_rows(&t, "z").unwrap();
        let keys: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(groups[&CellValue::Text("B".into())], vec![0, 3]);
    }

    #[test]
    fn partition_without_group_column_fails() {
        let t = table("a,b\n1,2\n");
        assert!(matches!(
            partition_rows(&t, "z"),
            Err(PlotError::MissingColumn(_))
        ));
    }
}
