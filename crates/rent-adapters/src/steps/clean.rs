//! `clean`: filtra precios fuera de rango y filas fuera de la caja
//! geográfica, y normaliza `last_review` a `YYYY-MM-DD`.

use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use rent_core::gate::GeoBound;
use rent_core::step::names;
use rent_core::step::spec::CleanParams;
use rent_core::{StepOutput, StepTask};

use super::input;
use crate::error::AdapterError;
use crate::frame::Frame;

pub const PRICE_COLUMN: &str = "price";
pub const REVIEW_DATE_COLUMN: &str = "last_review";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Fecha normalizada; vacía si no se puede interpretar.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    DATE_FORMATS.iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
}

/// Aplica la limpieza en memoria.
pub fn clean_frame(frame: &mut Frame, params: &CleanParams) -> Result<(), AdapterError> {
    let price = frame.column_index(PRICE_COLUMN)?;
    let lon = frame.column_index(GeoBound::LONGITUDE_COLUMN)?;
    let lat = frame.column_index(GeoBound::LATITUDE_COLUMN)?;
    let number = |row: &[String], i: usize| row.get(i).and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite());

    frame.retain(|row| {
             number(row, price).is_some_and(|p| params.price.contains(p))
             && params.geo.row_passes(number(row, lon), number(row, lat))
         });
    if let Ok(review) = frame.column_index(REVIEW_DATE_COLUMN) {
        frame.map_column(review, normalize_date);
    }
    Ok(())
}

pub fn run(params: &CleanParams, task: &StepTask<'_>) -> Result<StepOutput, AdapterError> {
    let source = input(task, names::SAMPLE)?;
    let mut frame = Frame::read_csv(source.path())?;
    let rows_in = frame.len();
    clean_frame(&mut frame, params)?;
    info!("clean kept {} of {rows_in} rows", frame.len());

    let target = task.work_dir.join(names::CLEAN_SAMPLE);
    frame.write_csv(&target)?;
    Ok(StepOutput::default().with_file(names::CLEAN_SAMPLE, target)
                            .with_metric("rows_in", rows_in as f64)
                            .with_metric("rows_out", frame.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_core::artifact::ArtifactReference;
    use rent_core::gate::Interval;
    use rent_core::step::spec::DEFAULT_CLEAN_GEO;

    fn params(min: f64, max: f64) -> CleanParams {
        CleanParams { input: ArtifactReference::latest(names::SAMPLE),
                      price: Interval::new(min, max),
                      geo: DEFAULT_CLEAN_GEO }
    }

    fn frame() -> Frame {
        let mut f = Frame::new(["id", "price", "longitude", "latitude", "last_review"]);
        for row in [["1", "10", "-73.9", "40.7", "2019-05-21"],
                    ["2", "350", "-73.9", "40.7", "05/21/2019"],
                    ["3", "351", "-73.9", "40.7", ""],
                    ["4", "100", "-75.0", "40.7", ""],
                    ["5", "n/a", "-73.9", "40.7", ""],
                    ["6", "100", "-73.9", "", "garbage"]]
        {
            f.push_row(row.iter().map(|s| s.to_string()).collect());
        }
        f
    }

    #[test]
    fn price_bounds_are_inclusive_and_geo_is_enforced() {
        let mut f = frame();
        clean_frame(&mut f, &params(10.0, 350.0)).unwrap();
        let ids: Vec<&str> = (0..f.len()).map(|r| f.cell(r, 0)).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn review_dates_are_normalized() {
        let mut f = frame();
        clean_frame(&mut f, &params(0.0, 1000.0)).unwrap();
        assert_eq!(f.cell(1, 4), "2019-05-21");
        assert_eq!(normalize_date("garbage"), "");
        assert_eq!(normalize_date("2019-05-21T10:00:00"), "2019-05-21");
    }

    #[test]
    fn missing_price_column_is_an_error() {
        let mut f = Frame::new(["id", "longitude", "latitude"]);
        f.push_row(vec!["1".into(), "-73.9".into(), "40.7".into()]);
        assert!(matches!(clean_frame(&mut f, &params(10.0, 350.0)), Err(AdapterError::MissingColumn(c)) if c == "price"));
    }
}
