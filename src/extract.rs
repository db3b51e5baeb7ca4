use crate::roster::{Cell, RawGrid};

/// Map the spreadsheet extractor's rows payload to a raw grid.
///
/// The extraction library runs in the UI shell; it sends the first
/// worksheet as a JSON array of rows, each an array of string/number/null
/// cells. Anything else means the file could not be read as a spreadsheet.
pub fn grid_from_rows(rows: &serde_json::Value) -> anyhow::Result<RawGrid> {
    let rows = rows
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("rows must be an array of rows"))?;

    let mut grid: RawGrid = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("row {} is not an array", i))?;
        let mut out = Vec::with_capacity(cells.len());
        for (j, cell) in cells.iter().enumerate() {
            let c = match cell {
                serde_json::Value::Null => Cell::Empty,
                serde_json::Value::String(s) => Cell::Text(s.clone()),
                serde_json::Value::Number(n) => {
                    Cell::Number(n.as_f64().unwrap_or(0.0))
                }
                // Booleans and nested values never come out of a worksheet.
                other => {
                    return Err(anyhow::anyhow!(
                        "unsupported cell at row {} col {}: {}",
                        i,
                        j,
                        other
                    ))
                }
            };
            out.push(c);
        }
        grid.push(out);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_strings_numbers_and_nulls() {
        let grid = grid_from_rows(&json!([["a", 2, null], []])).expect("grid");
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0], Cell::Text("a".to_string()));
        assert_eq!(grid[0][1], Cell::Number(2.0));
        assert_eq!(grid[0][2], Cell::Empty);
        assert!(grid[1].is_empty());
    }

    #[test]
    fn rejects_non_tabular_payloads() {
        assert!(grid_from_rows(&json!("nope")).is_err());
        assert!(grid_from_rows(&json!([["a"], "not-a-row"])).is_err());
        assert!(grid_from_rows(&json!([[true]])).is_err());
    }
}
