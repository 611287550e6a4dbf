//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::file::ConfigFileError;
use super::profile::AirportProfile;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();
    let sim = &mut config.simulation;

    // [simulation] section
    if let Some(section) = ini.section(Some("simulation")) {
        let s = Section::new("simulation", section);
        if let Some(v) = s.secs("duration")? {
            sim.duration = v;
        }
        if let Some(v) = s.parse("max_planes", "must be a positive integer")? {
            sim.max_planes = v;
        }
        if let Some(v) = s.secs("shutdown_grace")? {
            sim.shutdown_grace = v;
        }
        if let Some(v) = s.secs("status_interval")? {
            sim.status_interval = v;
        }
        if let Some(v) = s.parse("seed", "must be an unsigned integer")? {
            sim.seed = Some(v);
        }
    }

    // [airport] section - the profile sets the percentage, an explicit
    // percentage then overrides it
    if let Some(section) = ini.section(Some("airport")) {
        let s = Section::new("airport", section);
        if let Some(v) = section.get("profile") {
            let profile: AirportProfile =
                v.parse().map_err(|reason| s.invalid("profile", v, reason))?;
            sim.airport = profile;
            sim.international_percentage = profile.international_percentage();
        }
        if let Some(v) = s.parse::<u8>("international_percentage", "must be between 0 and 100")? {
            if v > 100 {
                return Err(s.invalid(
                    "international_percentage",
                    &v.to_string(),
                    "must be between 0 and 100".to_string(),
                ));
            }
            sim.international_percentage = v;
        }
    }

    // [resources] section
    if let Some(section) = ini.section(Some("resources")) {
        let s = Section::new("resources", section);
        if let Some(v) = s.capacity("runway")? {
            sim.resources.runway = v;
        }
        if let Some(v) = s.capacity("tower")? {
            sim.resources.tower = v;
        }
        if let Some(v) = s.capacity("gate")? {
            sim.resources.gate = v;
        }
    }

    // [thresholds] section
    if let Some(section) = ini.section(Some("thresholds")) {
        let s = Section::new("thresholds", section);
        if let Some(v) = s.secs("critical_wait")? {
            sim.thresholds.critical = v;
        }
        if let Some(v) = s.secs("crash_wait")? {
            sim.thresholds.crash = v;
        }
        if let Some(v) = s.secs("deadlock_wait")? {
            sim.thresholds.deadlock = v;
        }
        if let Some(v) = s.millis("priority_poll_ms")? {
            sim.priority_poll_interval = v;
        }
    }

    // [generator] section
    if let Some(section) = ini.section(Some("generator")) {
        let s = Section::new("generator", section);
        if let Some(v) = s.secs("spawn_interval_min")? {
            sim.spawn_interval.min = v;
        }
        if let Some(v) = s.secs("spawn_interval_max")? {
            sim.spawn_interval.max = v;
        }
    }

    // [timings] section
    if let Some(section) = ini.section(Some("timings")) {
        let s = Section::new("timings", section);
        let t = &mut sim.timings;
        for (key, target) in [
            ("landing_min_ms", &mut t.landing.min),
            ("landing_max_ms", &mut t.landing.max),
            ("disembark_min_ms", &mut t.disembark.min),
            ("disembark_max_ms", &mut t.disembark.max),
            ("gate_hold_ms", &mut t.gate_hold),
            ("takeoff_min_ms", &mut t.takeoff.min),
            ("takeoff_max_ms", &mut t.takeoff.max),
            ("turnaround_min_ms", &mut t.turnaround.min),
            ("turnaround_max_ms", &mut t.turnaround.max),
        ] {
            if let Some(v) = s.millis(key)? {
                *target = v;
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// One INI section, with helpers that name the section in every error.
struct Section<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, props: &'a Properties) -> Self {
        Self { name, props }
    }

    fn invalid(&self, key: &str, value: &str, reason: String) -> ConfigFileError {
        ConfigFileError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason,
        }
    }

    fn parse<T: FromStr>(&self, key: &str, reason: &str) -> Result<Option<T>, ConfigFileError> {
        match self.props.get(key) {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, v, reason.to_string())),
        }
    }

    fn secs(&self, key: &str) -> Result<Option<Duration>, ConfigFileError> {
        Ok(self
            .parse::<u64>(key, "must be a non-negative integer (seconds)")?
            .map(Duration::from_secs))
    }

    fn millis(&self, key: &str) -> Result<Option<Duration>, ConfigFileError> {
        Ok(self
            .parse::<u64>(key, "must be a non-negative integer (milliseconds)")?
            .map(Duration::from_millis))
    }

    fn capacity(&self, key: &str) -> Result<Option<usize>, ConfigFileError> {
        match self.parse::<usize>(key, "must be a positive integer")? {
            Some(0) => Err(self.invalid(key, "0", "must be a positive integer".to_string())),
            other => Ok(other),
        }
    }
}

/// Expand ~ to home directory in paths.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
