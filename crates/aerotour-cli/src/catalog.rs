//! Aerodrome catalogue loading.
//!
//! The solver library receives stations as plain values; turning the
//! challenge spreadsheet into those values is this collaborator's job.
//! The format is the semicolon-separated CSV export of the original
//! catalogue: `exclude;OACI;name;latitude;longitude;status;nightVFR;fuel`,
//! coordinates in decimal degrees, one header line. Rows with a
//! non-empty exclude column are skipped. Night VFR is granted for "oui"
//! and "pcl" (pilot-controlled lighting), fuel for "oui".

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};

use aerotour_lib::{Location, Station};

const EXCLUDE_COLUMN: usize = 0;
const OACI_COLUMN: usize = 1;
const NAME_COLUMN: usize = 2;
const LATITUDE_COLUMN: usize = 3;
const LONGITUDE_COLUMN: usize = 4;
const NIGHT_VFR_COLUMN: usize = 6;
const FUEL_COLUMN: usize = 7;

pub fn load_catalog(path: &Path) -> Result<Vec<Station>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open catalogue {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut stations = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed catalogue row {}", line + 2))?;
        if record
            .get(EXCLUDE_COLUMN)
            .map_or(false, |value| !value.is_empty())
        {
            continue;
        }

        let field = |column: usize, label: &str| -> Result<String> {
            match record.get(column) {
                Some(value) => Ok(value.to_string()),
                None => bail!("row {} has no {label} column", line + 2),
            }
        };

        let oaci = field(OACI_COLUMN, "OACI")?;
        let mut name = field(NAME_COLUMN, "name")?;
        if name.is_empty() {
            name = oaci.clone();
        }
        let lat: f64 = field(LATITUDE_COLUMN, "latitude")?
            .parse()
            .with_context(|| format!("row {} has a bad latitude", line + 2))?;
        let lon: f64 = field(LONGITUDE_COLUMN, "longitude")?
            .parse()
            .with_context(|| format!("row {} has a bad longitude", line + 2))?;
        let night_vfr = field(NIGHT_VFR_COLUMN, "night VFR")?.to_lowercase();
        let fuel = field(FUEL_COLUMN, "fuel")?.to_lowercase();

        stations.push(Station::new(
            Location::new(lon, lat),
            name,
            fuel == "oui",
            night_vfr == "oui" || night_vfr == "pcl",
        ));
    }

    if stations.is_empty() {
        bail!("catalogue {} holds no usable station", path.display());
    }
    Ok(stations)
}
