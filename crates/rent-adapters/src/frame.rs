//! Tabla CSV en memoria.
//!
//! Todas las celdas se guardan como texto; la interpretación numérica o de
//! fecha la hace cada transformación. Las cabeceras conservan el orden del
//! fichero para que la escritura sea estable.

use std::fs::File;
use std::path::Path;

use indexmap::IndexMap;
use rent_core::Table;

use crate::error::AdapterError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    headers: IndexMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new<I, S>(headers: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let headers = headers.into_iter().enumerate().map(|(i, h)| (h.into(), i)).collect();
        Self { headers,
               rows: Vec::new() }
    }

    pub fn read_csv(path: &Path) -> Result<Self, AdapterError> {
        let file = File::open(path).map_err(|source| AdapterError::Read { path: path.to_path_buf(),
                                                                          source })?;
        let mut reader = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(file);
        let mut frame = Self::new(reader.headers()?.iter());
        let width = frame.headers.len();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            frame.rows.push(row);
        }
        Ok(frame)
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), AdapterError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(self.headers.keys())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, AdapterError> {
        self.headers
            .get(name)
            .copied()
            .ok_or_else(|| AdapterError::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows.get(row).and_then(|r| r.get(column)).map(String::as_str).unwrap_or("")
    }

    /// Valor numérico de una celda; vacío o no numérico = `None`.
    pub fn number(&self, row: usize, column: usize) -> Option<f64> {
        self.cell(row, column).parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Conserva las filas para las que `keep` devuelve `true`.
    pub fn retain<F>(&mut self, mut keep: F)
        where F: FnMut(&[String]) -> bool
    {
        self.rows.retain(|r| keep(r));
    }

    /// Aplica `f` a cada celda de una columna.
    pub fn map_column<F>(&mut self, column: usize, mut f: F)
        where F: FnMut(&str) -> String
    {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(column) {
                *cell = f(cell);
            }
        }
    }

    /// Nueva tabla con las filas `indices` (en ese orden).
    pub fn take(&self, indices: &[usize]) -> Self {
        Self { headers: self.headers.clone(),
               rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect() }
    }
}

impl Table for Frame {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn text_column(&self, name: &str) -> Option<Vec<String>> {
        let idx = *self.headers.get(name)?;
        Some(self.rows.iter().map(|r| r.get(idx).cloned().unwrap_or_default()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pads_and_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "id,name,price\n1,\"Cozy, quiet\",120\n2,Loft\n").unwrap();
        let frame = Frame::read_csv(&path).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.cell(0, 1), "Cozy, quiet");
        assert_eq!(frame.cell(1, 2), "");
        assert_eq!(frame.number(0, 2), Some(120.0));
        assert_eq!(frame.number(1, 2), None);

        let out = dir.path().join("out.csv");
        frame.write_csv(&out).unwrap();
        let again = Frame::read_csv(&out).unwrap();
        assert_eq!(again, frame);
    }

    #[test]
    fn table_view_exposes_columns() {
        let mut frame = Frame::new(["price", "room_type"]);
        frame.push_row(vec!["10".into(), "Private room".into()]);
        frame.push_row(vec!["x".into()]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.numeric_column("price"), Some(vec![Some(10.0), None]));
        assert_eq!(frame.text_column("room_type"), Some(vec!["Private room".to_string(), String::new()]));
        assert!(frame.text_column("latitude").is_none());
        assert!(matches!(frame.column_index("latitude"), Err(AdapterError::MissingColumn(_))));
    }
}
