//! Year partitioning of the global index space.
//!
//! Each calendar year owns a contiguous slice of the global project (and
//! initiative) index space, sized by a scale factor sampled once per year.
//! The planner is built once at startup and handed to the generator; there
//! is no lazy module-level state.

use crate::config::GenConfig;
use crate::gen::stream::DataStream;

/// One year's slice of the index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSlot {
    pub year: i32,
    /// Sampled scale factor; the current year is pinned to 1.0.
    pub scale: f64,
    pub num_projects: u64,
    pub num_initiatives: u64,
    /// First global project index belonging to this year.
    pub project_offset: u64,
    /// First global initiative index belonging to this year.
    pub initiative_offset: u64,
}

#[derive(Debug, Clone)]
pub struct YearPlanner {
    slots: Vec<YearSlot>,
    total_projects: u64,
    total_initiatives: u64,
    current_year: i32,
}

impl YearPlanner {
    pub fn new(config: &GenConfig) -> Self {
        let mut slots = Vec::new();
        let mut project_offset = 0u64;
        let mut initiative_offset = 0u64;

        for year in config.years() {
            let scale = Self::scale_for(config, year);
            let num_projects = (config.num_projects as f64 * scale).round() as u64;
            let num_initiatives = (config.num_initiatives as f64 * scale).round() as u64;

            slots.push(YearSlot {
                year,
                scale,
                num_projects,
                num_initiatives,
                project_offset,
                initiative_offset,
            });

            project_offset += num_projects;
            initiative_offset += num_initiatives;
        }

        Self {
            slots,
            total_projects: project_offset,
            total_initiatives: initiative_offset,
            current_year: config.current_year,
        }
    }

    fn scale_for(config: &GenConfig, year: i32) -> f64 {
        if year == config.current_year {
            return 1.0;
        }
        let mut stream = DataStream::derive(&config.seed, &format!("year-{year}-scale"));
        let span = config.year_scale_max - config.year_scale_min;
        config.year_scale_min + stream.next_f64() * span
    }

    /// The year owning a global project index. Indices at or beyond the last
    /// partition clamp to the current year rather than failing.
    pub fn year_for(&self, global_index: u64) -> i32 {
        for slot in &self.slots {
            if global_index < slot.project_offset + slot.num_projects {
                return slot.year;
            }
        }
        self.current_year
    }

    pub fn slot(&self, year: i32) -> Option<&YearSlot> {
        self.slots.iter().find(|s| s.year == year)
    }

    pub fn slots(&self) -> &[YearSlot] {
        &self.slots
    }

    pub fn total_projects(&self) -> u64 {
        self.total_projects
    }

    pub fn total_initiatives(&self) -> u64 {
        self.total_initiatives
    }
}
