//! Derived physics columns.
//!
//! Pure per-row arithmetic over already-joined columns. A derived column
//! whose input never made it into the table is emitted as all-null so
//! downstream consumers can treat it as optional instead of the whole
//! pipeline failing.

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::warn;

/// Standard sea-level air density, kg/m^3.
pub const AIR_DENSITY_KG_M3: f64 = 1.225;

/// Wind power density in W/m^2: 0.5 * rho * v^3, from the 10m wind speed.
pub fn add_wind_power_density(df: &mut DataFrame) -> Result<()> {
    let series = match df.column("WS10M") {
        Ok(column) => {
            let speeds = column
                .cast(&DataType::Float64)
                .context("casting WS10M to Float64")?;
            let speeds = speeds.f64()?;
            let values: Vec<Option<f64>> = speeds
                .into_iter()
                .map(|v| v.map(|speed| 0.5 * AIR_DENSITY_KG_M3 * speed.powi(3)))
                .collect();
            Series::new("Wind_Power_Density", values)
        }
        Err(_) => {
            warn!("WS10M column absent; Wind_Power_Density emitted as null");
            Series::full_null("Wind_Power_Density", df.height(), &DataType::Float64)
        }
    };
    df.with_column(series)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_law_applied_per_row() {
        let mut df = df![
            "CITY" => &["Pune", "Pune"],
            "WS10M" => &[2.0f64, 4.0],
        ]
        .unwrap();
        add_wind_power_density(&mut df).unwrap();
        let wpd = df.column("Wind_Power_Density").unwrap().f64().unwrap();
        assert!((wpd.get(0).unwrap() - 0.5 * 1.225 * 8.0).abs() < 1e-9);
        assert!((wpd.get(1).unwrap() - 0.5 * 1.225 * 64.0).abs() < 1e-9);
    }

    #[test]
    fn absent_input_yields_all_null_column() {
        let mut df = df![
            "CITY" => &["Pune", "Delhi", "Kochi"],
        ]
        .unwrap();
        add_wind_power_density(&mut df).unwrap();
        let wpd = df.column("Wind_Power_Density").unwrap();
        assert_eq!(wpd.null_count(), 3);
    }

    #[test]
    fn null_speeds_stay_null() {
        let mut df = df![
            "WS10M" => &[Some(3.0f64), None],
        ]
        .unwrap();
        add_wind_power_density(&mut df).unwrap();
        let wpd = df.column("Wind_Power_Density").unwrap();
        assert_eq!(wpd.null_count(), 1);
    }
}
