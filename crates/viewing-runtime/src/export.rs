//! Writes charts to disk as pretty-printed JSON.

use std::path::{Path, PathBuf};

use viewing_core::error::Result;
use viewing_data::chart::Chart;

/// File name a chart is exported under, e.g. `"viewing_heat_map.json"`.
pub fn export_file_name(chart: &Chart) -> String {
    format!("{}.json", chart.kind.file_stem())
}

/// Serialize `chart` as pretty JSON.
pub fn chart_to_json(chart: &Chart) -> Result<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

/// Write `chart` into `dir`, replacing an earlier export of the same
/// analysis, and return the written path.
pub fn export_chart(chart: &Chart, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(chart));
    write_json(chart, &path)?;
    Ok(path)
}

/// Write `chart` to an explicit path.
pub fn write_json(chart: &Chart, path: &Path) -> Result<()> {
    let json = chart_to_json(chart)?;

    // Temp file then rename so a reader never sees half a chart.
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;

    tracing::info!(path = %path.display(), "exported {}", chart.kind);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewing_core::selection::AnalysisKind;
    use viewing_data::chart::{ChartBody, HeatMapGrid};

    fn heat_map() -> Chart {
        let mut grid = HeatMapGrid::empty();
        grid.counts[0][21] = 3;
        Chart {
            kind: AnalysisKind::ViewingHeatMap,
            title: "Heatmap of Netflix Viewing Activity of All Profiles".into(),
            x_label: "Hour of Day".into(),
            y_label: "Day of Week".into(),
            body: ChartBody::HeatMap(grid),
        }
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(&heat_map()), "viewing_heat_map.json");
    }

    #[test]
    fn test_export_chart_writes_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let exports = dir.path().join("exports");
        let path = export_chart(&heat_map(), &exports).unwrap();

        assert_eq!(path, exports.join("viewing_heat_map.json"));
        assert!(!exports.join("viewing_heat_map.json.tmp").exists());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["kind"], "ViewingHeatMap");
        assert_eq!(written["body"]["type"], "heat_map");
        assert_eq!(written["body"]["counts"][0][21], 3);
    }

    #[test]
    fn test_export_overwrites_previous() {
        let dir = tempfile::TempDir::new().unwrap();
        export_chart(&heat_map(), dir.path()).unwrap();
        let mut second = heat_map();
        second.title = "again".into();
        let path = export_chart(&second, dir.path()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"again\""));
    }
}
