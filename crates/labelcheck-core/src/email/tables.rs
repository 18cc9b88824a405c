//! HTML tables in email bodies.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Rows of cell text.
pub type TableRows = Vec<Vec<String>>;

/// Tables carried onto the merge cover page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailTables {
    /// First table, every row.
    pub table_1: Option<TableRows>,
    /// Second table, only rows mentioning "description".
    pub table_2: Option<TableRows>,
}

impl EmailTables {
    /// Non-empty tables with their titles, in cover-page order.
    pub fn entries(&self) -> Vec<(&'static str, &TableRows)> {
        [("Table 1", &self.table_1), ("Table 2", &self.table_2)]
            .into_iter()
            .filter_map(|(title, rows)| rows.as_ref().filter(|r| !r.is_empty()).map(|r| (title, r)))
            .collect()
    }
}

/// Collect the first two HTML tables of a body.
pub fn extract_email_tables(body: Option<&str>) -> EmailTables {
    let Some(body) = body else {
        return EmailTables::default();
    };
    if !body.to_lowercase().contains("<table") {
        return EmailTables::default();
    }

    let Ok(table_sel) = Selector::parse("table") else {
        return EmailTables::default();
    };

    let doc = Html::parse_document(body);
    let mut tables = doc.select(&table_sel);
    let mut result = EmailTables::default();

    if let Some(first) = tables.next() {
        result.table_1 = Some(table_rows(first));
    }

    if let Some(second) = tables.next() {
        let described: TableRows = table_rows(second)
            .into_iter()
            .filter(|row| row.join(" ").to_lowercase().contains("description"))
            .collect();
        if !described.is_empty() {
            result.table_2 = Some(described);
        }
    }

    result
}

fn table_rows(table: ElementRef<'_>) -> TableRows {
    let (Ok(row_sel), Ok(cell_sel)) = (Selector::parse("tr"), Selector::parse("th, td")) else {
        return Vec::new();
    };

    table
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| {
                    let text: String = cell.text().collect();
                    text.split_whitespace().collect::<Vec<_>>().join(" ")
                })
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"<html><body>
<table>
  <tr><th>PO</th><th>Style</th></tr>
  <tr><td>4500123</td><td> 5735 </td></tr>
</table>
<table>
  <tr><td>Item Description</td><td>Bikini</td></tr>
  <tr><td>Qty</td><td>1200</td></tr>
  <tr><td>Colour description</td><td>Black</td></tr>
</table>
</body></html>"#;

    #[test]
    fn test_first_table_whole_second_filtered() {
        let tables = extract_email_tables(Some(BODY));

        assert_eq!(
            tables.table_1,
            Some(vec![
                vec!["PO".to_string(), "Style".to_string()],
                vec!["4500123".to_string(), "5735".to_string()],
            ])
        );
        assert_eq!(
            tables.table_2,
            Some(vec![
                vec!["Item Description".to_string(), "Bikini".to_string()],
                vec!["Colour description".to_string(), "Black".to_string()],
            ])
        );
        assert_eq!(tables.entries().len(), 2);
    }

    #[test]
    fn test_second_table_without_description_is_dropped() {
        let body = "<table><tr><td>a</td></tr></table><table><tr><td>b</td></tr></table>";
        let tables = extract_email_tables(Some(body));
        assert!(tables.table_1.is_some());
        assert_eq!(tables.table_2, None);
    }

    #[test]
    fn test_plain_body_has_no_tables() {
        assert_eq!(extract_email_tables(Some("no tables here")), EmailTables::default());
        assert_eq!(extract_email_tables(None), EmailTables::default());
    }
}
