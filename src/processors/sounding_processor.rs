use crate::error::Result;
use crate::models::{LevelObservation, PointTable, SiteConfig, Sounding, LEVEL_COLUMNS};
use crate::processors::derived::{
    geopotential_height, kelvin_to_celsius, wind_direction, wind_speed, NonFinitePolicy,
    NumericGuard,
};
use crate::utils::constants::{VAR_T, VAR_U, VAR_V, VAR_Z};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::debug;

/// Groups pressure-level rows into FSL soundings.
///
/// Timestamps are grouped in the order they are first seen; levels within
/// a sounding keep their row order. Neither is sorted.
pub struct SoundingProcessor {
    site: SiteConfig,
    guard: NumericGuard,
    timestamps_seen: usize,
}

impl SoundingProcessor {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            site: site.clone(),
            guard: NumericGuard::default(),
            timestamps_seen: 0,
        }
    }

    pub fn with_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.guard = NumericGuard::new(policy);
        self
    }

    pub fn process(&mut self, table: &PointTable) -> Result<Vec<Sounding>> {
        let (level_column, levels) = table.first_column_of(&LEVEL_COLUMNS)?;
        let t = table.column(VAR_T)?;
        let u = table.column(VAR_U)?;
        let v = table.column(VAR_V)?;
        let z = table.column(VAR_Z)?;

        debug!(level_column, rows = table.len(), "Grouping upper-air rows");

        let groups = group_rows_by_time(table.times());
        self.timestamps_seen = groups.len();

        let mut soundings = Vec::new();
        for (timestamp, rows) in groups {
            let mut observations = Vec::new();

            for i in rows {
                if !LevelObservation::is_mandatory_level(levels[i]) {
                    continue;
                }

                let temp_c = self.guard.check(kelvin_to_celsius(t[i]), "temp_c", timestamp)?;
                let speed = self.guard.check(wind_speed(u[i], v[i]), "wind_speed", timestamp)?;
                let direction = self
                    .guard
                    .check(wind_direction(u[i], v[i]), "wind_dir", timestamp)?;
                let height = self
                    .guard
                    .check(geopotential_height(z[i]), "height_m", timestamp)?;

                observations.push(LevelObservation {
                    pressure_hpa: levels[i] as i32,
                    height_m: height.trunc() as i32,
                    temp_c,
                    wind_dir_deg: direction.trunc() as i32,
                    wind_speed: speed,
                });
            }

            if observations.is_empty() {
                debug!(%timestamp, "No mandatory levels, sounding skipped");
                continue;
            }

            soundings.push(Sounding {
                site_id: self.site.id.clone(),
                site_name: self.site.header_name(),
                timestamp,
                latitude: self.site.latitude,
                longitude: self.site.longitude,
                levels: observations,
            });
        }

        Ok(soundings)
    }

    /// Distinct timestamps in the last processed table, including skipped ones
    pub fn timestamps_seen(&self) -> usize {
        self.timestamps_seen
    }

    pub fn fallback_count(&self) -> usize {
        self.guard.fallback_count()
    }
}

/// Row indices per timestamp, ordered by first occurrence.
fn group_rows_by_time(times: &[NaiveDateTime]) -> Vec<(NaiveDateTime, Vec<usize>)> {
    let mut index: HashMap<NaiveDateTime, usize> = HashMap::new();
    let mut groups: Vec<(NaiveDateTime, Vec<usize>)> = Vec::new();

    for (row, &time) in times.iter().enumerate() {
        match index.get(&time) {
            Some(&group) => groups[group].1.push(row),
            None => {
                index.insert(time, groups.len());
                groups.push((time, vec![row]));
            }
        }
    }

    groups
}
