//! SQLite export: table replacement and a schema + data script dump.

use super::ExportError;
use polars::prelude::*;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Owns the connection to the embedded database file.
pub struct SqliteExporter {
    conn: Connection,
}

impl SqliteExporter {
    pub fn open(path: &Path) -> Result<Self, ExportError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Replace `table` with the full contents of `df`.
    ///
    /// The old table is dropped, never appended to or migrated.
    pub fn write_table(&mut self, df: &DataFrame, table: &str) -> Result<usize, ExportError> {
        let columns = df.get_columns();
        let definitions: Vec<String> = columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name()), sql_type(c.dtype())))
            .collect();
        let values: Vec<Vec<Value>> = columns
            .iter()
            .map(column_values)
            .collect::<Result<_, _>>()?;

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {ident};\nCREATE TABLE {ident} (\n  {defs}\n);",
            ident = quote_ident(table),
            defs = definitions.join(",\n  "),
        ))?;

        if !columns.is_empty() {
            let placeholders = vec!["?"; columns.len()].join(", ");
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({placeholders})",
                quote_ident(table)
            ))?;
            for row in 0..df.height() {
                stmt.execute(params_from_iter(values.iter().map(|column| &column[row])))?;
            }
        }
        tx.commit()?;

        tracing::debug!(table, rows = df.height(), "table replaced");
        Ok(df.height())
    }

    pub fn row_count(&self, table: &str) -> Result<usize, ExportError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Write every table, index, trigger and view of the database as SQL
    /// statements, replacing `path`.
    pub fn dump_sql(&self, path: &Path) -> Result<(), ExportError> {
        let mut out = BufWriter::new(File::create(path)?);
        for line in self.dump_lines()? {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Statements in the layout of SQLite's `.dump`.
    pub fn dump_lines(&self) -> Result<Vec<String>, ExportError> {
        let mut lines = vec!["BEGIN TRANSACTION;".to_string()];

        let tables: Vec<(String, String)> = {
            let mut stmt = self.conn.prepare(
                "SELECT name, sql FROM sqlite_master \
                 WHERE sql NOT NULL AND type == 'table' ORDER BY name",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<_, _>>()?
        };

        for (name, sql) in tables {
            if name == "sqlite_sequence" {
                lines.push("DELETE FROM \"sqlite_sequence\";".to_string());
            } else if name.starts_with("sqlite_") {
                continue;
            } else {
                lines.push(format!("{sql};"));
            }
            lines.extend(self.insert_statements(&name)?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT sql FROM sqlite_master \
             WHERE sql NOT NULL AND type IN ('index', 'trigger', 'view') ORDER BY name",
        )?;
        for sql in stmt.query_map([], |row| row.get::<_, String>(0))? {
            lines.push(format!("{};", sql?));
        }

        lines.push("COMMIT;".to_string());
        Ok(lines)
    }

    /// One `INSERT` per row, values rendered by SQLite's own `quote()`.
    fn insert_statements(&self, table: &str) -> Result<Vec<String>, ExportError> {
        let column_names: Vec<String> = {
            let mut stmt = self
                .conn
                .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
            rows.collect::<Result<_, _>>()?
        };
        if column_names.is_empty() {
            return Ok(Vec::new());
        }

        let quoted_values = column_names
            .iter()
            .map(|c| format!("quote({})", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(" || ',' || ");
        let prefix = quote_literal(&format!("INSERT INTO {} VALUES(", quote_ident(table)));
        let query = format!(
            "SELECT {prefix} || {quoted_values} || ')' FROM {}",
            quote_ident(table)
        );

        let mut stmt = self.conn.prepare(&query)?;
        let mut inserts = Vec::new();
        for insert in stmt.query_map([], |row| row.get::<_, String>(0))? {
            inserts.push(format!("{};", insert?));
        }
        Ok(inserts)
    }

    /// Release the connection explicitly.
    pub fn close(self) -> Result<(), ExportError> {
        self.conn.close().map_err(|(_, e)| ExportError::Sqlite(e))
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Float32 | DataType::Float64 => "REAL",
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::Boolean => "INTEGER",
        _ => "TEXT",
    }
}

fn column_values(column: &Column) -> Result<Vec<Value>, ExportError> {
    let values = match column.dtype() {
        DataType::Float32 | DataType::Float64 => column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Real))
            .collect(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::Boolean => column
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Integer))
            .collect(),
        _ => column
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, |s| Value::Text(s.to_string())))
            .collect(),
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(columns::PRODUCT_NAME.into(), ["Cable", "O'Brien Mug"]),
            Column::new(columns::CATEGORY.into(), ["A|X", "B"]),
            Column::new(columns::ACTUAL_PRICE.into(), [1234.0, 500.0]),
            Column::new(columns::category_level(1).into(), [Some("A"), Some("B")]),
            Column::new(columns::category_level(2).into(), [Some("X"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn write_table_replaces_instead_of_appending() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut exporter = SqliteExporter::open(&dir.path().join("catalog.db")).unwrap();

        exporter.write_table(&table(), "amazon_data").unwrap();
        exporter.write_table(&table(), "amazon_data").unwrap();

        assert_eq!(exporter.row_count("amazon_data").unwrap(), 2);
        exporter.close().unwrap();
    }

    #[test]
    fn rows_survive_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("catalog.db");

        let mut exporter = SqliteExporter::open(&path).unwrap();
        exporter.write_table(&table(), "amazon_data").unwrap();
        exporter.close().unwrap();

        let conn = Connection::open(&path).unwrap();
        let (price, level_2): (f64, Option<String>) = conn
            .query_row(
                "SELECT actual_price, category_level_2 FROM amazon_data WHERE category = 'B'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(price, 500.0);
        assert_eq!(level_2, None);
    }

    #[test]
    fn dump_contains_schema_and_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut exporter = SqliteExporter::open(&dir.path().join("catalog.db")).unwrap();
        exporter.write_table(&table(), "amazon_data").unwrap();

        let lines = exporter.dump_lines().unwrap();
        assert_eq!(lines.first().map(String::as_str), Some("BEGIN TRANSACTION;"));
        assert_eq!(lines.last().map(String::as_str), Some("COMMIT;"));
        assert!(lines[1].starts_with("CREATE TABLE \"amazon_data\""));
        assert!(lines[1].contains("\"actual_price\" REAL"));
        assert_eq!(
            lines[2],
            "INSERT INTO \"amazon_data\" VALUES('Cable','A|X',1234.0,'A','X');"
        );
        assert_eq!(
            lines[3],
            "INSERT INTO \"amazon_data\" VALUES('O''Brien Mug','B',500.0,'B',NULL);"
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn dump_file_matches_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut exporter = SqliteExporter::open(&dir.path().join("catalog.db")).unwrap();
        exporter.write_table(&table(), "amazon_data").unwrap();

        let path = dir.path().join("export.sql");
        exporter.dump_sql(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        let expected: String = exporter
            .dump_lines()
            .unwrap()
            .into_iter()
            .map(|l| l + "\n")
            .collect();
        assert_eq!(text, expected);
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
        assert_eq!(quote_literal("it's"), "'it''s'");
    }
}
