/// Vista tabular mínima que el gate necesita. La implementación concreta
/// (CSV) vive en los adapters.
pub trait Table {
    fn row_count(&self) -> usize;

    /// Valores crudos de una columna; `None` si la columna no existe.
    fn text_column(&self, name: &str) -> Option<Vec<String>>;

    /// Valores numéricos de una columna; un valor no numérico (o vacío) se
    /// entrega como `None` dentro del vector.
    fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.text_column(name)
            .map(|values| values.iter().map(|v| v.trim().parse::<f64>().ok().filter(|x| x.is_finite())).collect())
    }
}
