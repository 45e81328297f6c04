use crate::error::Result;
use crate::models::{PointTable, SurfaceRecord};
use crate::processors::derived::{
    approximate_dewpoint_f, fahrenheit_rounded, ms_to_knots, pascal_to_hpa, wind_direction,
    wind_speed, NonFinitePolicy, NumericGuard,
};
use crate::utils::constants::{VAR_MSL, VAR_T2M, VAR_U10, VAR_V10};
use tracing::{debug, trace};

/// Turns surface point rows (t2m, u10, v10) into CD144 records.
pub struct SurfaceProcessor {
    site_id: String,
    guard: NumericGuard,
}

impl SurfaceProcessor {
    pub fn new(site_id: &str) -> Self {
        Self {
            site_id: site_id.to_string(),
            guard: NumericGuard::default(),
        }
    }

    pub fn with_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.guard = NumericGuard::new(policy);
        self
    }

    /// One record per row, in row order.
    pub fn process(&mut self, table: &PointTable) -> Result<Vec<SurfaceRecord>> {
        let t2m = table.column(VAR_T2M)?;
        let u10 = table.column(VAR_U10)?;
        let v10 = table.column(VAR_V10)?;

        // CD144 has no pressure field
        let msl = table.column_opt(VAR_MSL);

        let mut records = Vec::with_capacity(table.len());
        for (i, &timestamp) in table.times().iter().enumerate() {
            if let Some(msl) = msl {
                trace!(%timestamp, msl_hpa = pascal_to_hpa(msl[i]), "Sea-level pressure");
            }

            let temp_f = fahrenheit_rounded(t2m[i]);
            let dewpt_f = approximate_dewpoint_f(temp_f);
            let speed_kt = ms_to_knots(wind_speed(u10[i], v10[i])).round_ties_even();
            let direction = wind_direction(u10[i], v10[i]).round_ties_even();

            let temp_f = self.guard.check(temp_f, "temp_f", timestamp)?;
            let dewpt_f = self.guard.check(dewpt_f, "dewpt_f", timestamp)?;
            let direction = self.guard.check(direction, "wind_dir", timestamp)?;
            let speed_kt = self.guard.check(speed_kt, "wind_speed_kt", timestamp)?;

            records.push(SurfaceRecord::new(
                &self.site_id,
                timestamp,
                temp_f as i32,
                dewpt_f as i32,
                direction as i32,
                speed_kt as i32,
            ));
        }

        debug!(
            records = records.len(),
            fallbacks = self.guard.fallback_count(),
            "Derived surface records"
        );
        Ok(records)
    }

    pub fn fallback_count(&self) -> usize {
        self.guard.fallback_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn table(t2m: Vec<f64>, u10: Vec<f64>, v10: Vec<f64>) -> PointTable {
        let times = (0..t2m.len() as u32).map(at).collect();
        PointTable::new(49.5, 25.5, times)
            .with_column("t2m", t2m)
            .unwrap()
            .with_column("u10", u10)
            .unwrap()
            .with_column("v10", v10)
            .unwrap()
    }

    #[test]
    fn test_process_surface_row() {
        let mut processor = SurfaceProcessor::new("999999");
        let records = processor
            .process(&table(vec![273.15], vec![0.0], vec![-5.0]))
            .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.site_id, "999999");
        assert_eq!(record.timestamp, at(0));
        assert_eq!(record.temp_f, 32);
        assert_eq!(record.dewpt_f, 22);
        assert_eq!(record.wind_dir_deg, 0);
        // 5 m/s = 9.72 kt
        assert_eq!(record.wind_speed_kt, 10);
        assert_eq!(processor.fallback_count(), 0);
    }

    #[test]
    fn test_rows_keep_input_order() {
        let t = PointTable::new(0.0, 0.0, vec![at(5), at(2)])
            .with_column("t2m", vec![280.0, 270.0])
            .unwrap()
            .with_column("u10", vec![1.0, 1.0])
            .unwrap()
            .with_column("v10", vec![0.0, 0.0])
            .unwrap();

        let records = SurfaceProcessor::new("1").process(&t).unwrap();
        assert_eq!(records[0].timestamp, at(5));
        assert_eq!(records[1].timestamp, at(2));
    }

    #[test]
    fn test_sea_level_pressure_does_not_change_records() {
        let plain = table(vec![280.0, 281.0], vec![1.0, 2.0], vec![1.0, 0.0]);
        let with_msl = plain
            .clone()
            .with_column("msl", vec![101325.0, f64::NAN])
            .unwrap();

        let mut processor = SurfaceProcessor::new("1");
        let records = processor.process(&with_msl).unwrap();
        assert_eq!(records, SurfaceProcessor::new("1").process(&plain).unwrap());
        // msl is never checked, so a NaN there is not a fallback
        assert_eq!(processor.fallback_count(), 0);
    }

    #[test]
    fn test_missing_temperature_becomes_zero() {
        let mut processor = SurfaceProcessor::new("999999");
        let records = processor
            .process(&table(vec![f64::NAN], vec![f64::NAN], vec![1.0]))
            .unwrap();

        let record = &records[0];
        assert_eq!(record.temp_f, 0);
        assert_eq!(record.dewpt_f, 0);
        assert_eq!(record.wind_dir_deg, 0);
        assert_eq!(record.wind_speed_kt, 0);
        assert_eq!(processor.fallback_count(), 4);
    }

    #[test]
    fn test_reject_policy_fails() {
        let mut processor = SurfaceProcessor::new("999999").with_policy(NonFinitePolicy::Reject);
        let result = processor.process(&table(vec![f64::NAN], vec![0.0], vec![1.0]));
        assert!(matches!(result, Err(ProcessingError::NonFinite { .. })));
    }

    #[test]
    fn test_missing_wind_column() {
        let t = PointTable::new(0.0, 0.0, vec![at(0)])
            .with_column("t2m", vec![280.0])
            .unwrap();
        let result = SurfaceProcessor::new("1").process(&t);
        assert!(matches!(result, Err(ProcessingError::Schema(ref f)) if f == "u10"));
    }
}
