//! Rolled Steel Section Database (European I/H profiles)
//!
//! Section properties for the HEA, HEB and IPE series used as beams and
//! columns in end-plate joints. Dimensions follow EN 10365 (mm, mm², mm⁴, mm³).
//!
//! A small built-in table covers the common sizes; larger tables can be
//! parsed from JSON with [`SectionDb::from_json`].
//!
//! ## Example
//!
//! ```rust
//! use joint_core::materials::steel::builtin_sections;
//!
//! let db = builtin_sections();
//! let hea200 = db.lookup("hea200").unwrap();
//!
//! assert_eq!(hea200.h, 190.0);
//! assert!((hea200.shear_area() - 1808.0).abs() < 1e-9);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};

/// Rolled section series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionSeries {
    /// Wide flange, light series
    HEA,
    /// Wide flange, medium series
    HEB,
    /// Parallel flange I-beam
    IPE,
}

impl SectionSeries {
    /// All series for iteration
    pub const ALL: [SectionSeries; 3] = [SectionSeries::HEA, SectionSeries::HEB, SectionSeries::IPE];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionSeries::HEA => "HEA (IPBl)",
            SectionSeries::HEB => "HEB (IPB)",
            SectionSeries::IPE => "IPE",
        }
    }
}

impl std::fmt::Display for SectionSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Cross-section properties of a doubly symmetric I/H section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Designation (e.g., "HEA200")
    pub designation: String,

    /// Section series
    pub series: SectionSeries,

    /// Overall depth h (mm)
    pub h: f64,

    /// Flange width b (mm)
    pub b: f64,

    /// Web thickness t_w (mm)
    pub t_w: f64,

    /// Flange thickness t_f (mm)
    pub t_f: f64,

    /// Root radius r (mm)
    pub r: f64,

    /// Gross area A (mm²)
    pub area: f64,

    /// Second moment of area about the major axis I_y (mm⁴)
    pub i_y: f64,

    /// Plastic section modulus about the major axis W_pl,y (mm³)
    pub w_pl_y: f64,
}

impl SectionProperties {
    /// Shear area for a rolled I/H section loaded parallel to the web:
    /// `A_v = A − 2·b·t_f + (t_w + 2r)·t_f`
    pub fn shear_area(&self) -> f64 {
        self.area - 2.0 * self.b * self.t_f + (self.t_w + 2.0 * self.r) * self.t_f
    }

    /// Clear web depth between root fillets: `d = h − 2(t_f + r)`
    pub fn web_depth(&self) -> f64 {
        self.h - 2.0 * (self.t_f + self.r)
    }

    /// Check that every dimension is positive and the web has a clear depth.
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        require_positive(&format!("{}.h", field), self.h)?;
        require_positive(&format!("{}.b", field), self.b)?;
        require_positive(&format!("{}.t_w", field), self.t_w)?;
        require_positive(&format!("{}.t_f", field), self.t_f)?;
        crate::errors::require_non_negative(&format!("{}.r", field), self.r)?;
        require_positive(&format!("{}.area", field), self.area)?;
        require_positive(&format!("{}.i_y", field), self.i_y)?;
        require_positive(&format!("{}.w_pl_y", field), self.w_pl_y)?;
        require_positive(&format!("{}.web_depth", field), self.web_depth())?;
        require_positive(&format!("{}.shear_area", field), self.shear_area())?;
        Ok(())
    }
}

impl std::fmt::Display for SectionProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (h={} mm, b={} mm, A={:.0} mm², Iy={:.3e} mm⁴)",
            self.designation, self.h, self.b, self.area, self.i_y
        )
    }
}

/// Section table keyed by normalized designation.
#[derive(Debug, Clone, Default)]
pub struct SectionDb {
    sections: HashMap<String, SectionProperties>,
}

/// Lookup key: upper case, whitespace removed ("he 200 a" -> "HE200A")
fn normalize(designation: &str) -> String {
    designation.split_whitespace().collect::<String>().to_uppercase()
}

impl SectionDb {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of sections.
    ///
    /// Every entry is validated; the first bad entry fails the whole table.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let list: Vec<SectionProperties> = serde_json::from_str(json)?;
        let mut db = SectionDb::new();
        for section in list {
            section.validate(&section.designation)?;
            db.insert(section);
        }
        Ok(db)
    }

    /// Insert a section, replacing any entry with the same designation
    pub fn insert(&mut self, section: SectionProperties) {
        self.sections.insert(normalize(&section.designation), section);
    }

    /// Look up a section by designation (case-insensitive, spaces ignored)
    pub fn lookup(&self, designation: &str) -> CalcResult<&SectionProperties> {
        self.sections
            .get(&normalize(designation))
            .ok_or_else(|| CalcError::section_not_found(designation))
    }

    /// All sections of one series, ordered by depth
    pub fn of_series(&self, series: SectionSeries) -> Vec<&SectionProperties> {
        let mut list: Vec<_> = self.sections.values().filter(|s| s.series == series).collect();
        list.sort_by(|a, b| a.h.total_cmp(&b.h));
        list
    }

    /// Prefix search (e.g., "HEA2" matches HEA200, HEA220, HEA240)
    pub fn search(&self, pattern: &str) -> Vec<&SectionProperties> {
        let prefix = normalize(pattern);
        let mut list: Vec<_> = self
            .sections
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, v)| v)
            .collect();
        list.sort_by(|a, b| a.designation.cmp(&b.designation));
        list
    }

    /// Number of sections in the table
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// ============================================================================
// Built-in Sections
// ============================================================================

static BUILTIN: Lazy<SectionDb> = Lazy::new(|| {
    use SectionSeries::*;

    let mut db = SectionDb::new();

    // (designation, series, h, b, t_w, t_f, r, A, I_y, W_pl,y)
    let table = [
        ("HEA100", HEA, 96.0, 100.0, 5.0, 8.0, 12.0, 2124.0, 3.492e6, 83.01e3),
        ("HEA120", HEA, 114.0, 120.0, 5.0, 8.0, 12.0, 2534.0, 6.062e6, 119.5e3),
        ("HEA140", HEA, 133.0, 140.0, 5.5, 8.5, 12.0, 3142.0, 10.33e6, 173.5e3),
        ("HEA160", HEA, 152.0, 160.0, 6.0, 9.0, 15.0, 3877.0, 16.73e6, 245.1e3),
        ("HEA180", HEA, 171.0, 180.0, 6.0, 9.5, 15.0, 4525.0, 25.10e6, 324.9e3),
        ("HEA200", HEA, 190.0, 200.0, 6.5, 10.0, 18.0, 5383.0, 36.92e6, 429.5e3),
        ("HEA220", HEA, 210.0, 220.0, 7.0, 11.0, 18.0, 6434.0, 54.10e6, 568.5e3),
        ("HEA240", HEA, 230.0, 240.0, 7.5, 12.0, 21.0, 7684.0, 77.63e6, 744.6e3),
        ("HEA260", HEA, 250.0, 260.0, 7.5, 12.5, 24.0, 8682.0, 104.5e6, 919.8e3),
        ("HEA280", HEA, 270.0, 280.0, 8.0, 13.0, 24.0, 9726.0, 136.7e6, 1112.0e3),
        ("HEA300", HEA, 290.0, 300.0, 8.5, 14.0, 27.0, 11250.0, 182.6e6, 1383.0e3),
        ("HEB100", HEB, 100.0, 100.0, 6.0, 10.0, 12.0, 2604.0, 4.495e6, 104.2e3),
        ("HEB120", HEB, 120.0, 120.0, 6.5, 11.0, 12.0, 3401.0, 8.644e6, 165.2e3),
        ("HEB140", HEB, 140.0, 140.0, 7.0, 12.0, 12.0, 4296.0, 15.09e6, 245.4e3),
        ("HEB160", HEB, 160.0, 160.0, 8.0, 13.0, 15.0, 5425.0, 24.92e6, 354.0e3),
        ("HEB180", HEB, 180.0, 180.0, 8.5, 14.0, 15.0, 6525.0, 38.31e6, 481.4e3),
        ("HEB200", HEB, 200.0, 200.0, 9.0, 15.0, 18.0, 7808.0, 56.96e6, 642.5e3),
        ("HEB220", HEB, 220.0, 220.0, 9.5, 16.0, 18.0, 9104.0, 80.91e6, 827.0e3),
        ("HEB240", HEB, 240.0, 240.0, 10.0, 17.0, 21.0, 10600.0, 112.6e6, 1053.0e3),
        ("IPE160", IPE, 160.0, 82.0, 5.0, 7.4, 9.0, 2009.0, 8.693e6, 123.9e3),
        ("IPE180", IPE, 180.0, 91.0, 5.3, 8.0, 9.0, 2395.0, 13.17e6, 166.4e3),
        ("IPE200", IPE, 200.0, 100.0, 5.6, 8.5, 12.0, 2848.0, 19.43e6, 220.6e3),
        ("IPE220", IPE, 220.0, 110.0, 5.9, 9.2, 12.0, 3337.0, 27.72e6, 285.4e3),
        ("IPE240", IPE, 240.0, 120.0, 6.2, 9.8, 15.0, 3912.0, 38.92e6, 366.6e3),
        ("IPE270", IPE, 270.0, 135.0, 6.6, 10.2, 15.0, 4595.0, 57.90e6, 484.0e3),
        ("IPE300", IPE, 300.0, 150.0, 7.1, 10.7, 15.0, 5381.0, 83.56e6, 628.4e3),
        ("IPE330", IPE, 330.0, 160.0, 7.5, 11.5, 18.0, 6261.0, 117.7e6, 804.3e3),
        ("IPE360", IPE, 360.0, 170.0, 8.0, 12.7, 18.0, 7273.0, 162.7e6, 1019.0e3),
        ("IPE400", IPE, 400.0, 180.0, 8.6, 13.5, 21.0, 8446.0, 231.3e6, 1307.0e3),
    ];

    for (designation, series, h, b, t_w, t_f, r, area, i_y, w_pl_y) in table {
        db.insert(SectionProperties {
            designation: designation.to_string(),
            series,
            h,
            b,
            t_w,
            t_f,
            r,
            area,
            i_y,
            w_pl_y,
        });
    }

    db
});

/// Built-in table of common HEA/HEB/IPE sections
pub fn builtin_sections() -> &'static SectionDb {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_sections() {
        let db = builtin_sections();
        assert_eq!(db.len(), 29);
        assert!(!db.is_empty());
        for series in SectionSeries::ALL {
            assert!(!db.of_series(series).is_empty());
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let db = builtin_sections();
        let a = db.lookup("HEA200").unwrap();
        let b = db.lookup("hea 200").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.series, SectionSeries::HEA);
    }

    #[test]
    fn test_section_not_found() {
        let err = builtin_sections().lookup("HEA999").unwrap_err();
        assert_eq!(err.error_code(), "SECTION_NOT_FOUND");
    }

    #[test]
    fn test_shear_area_and_web_depth() {
        let hea200 = builtin_sections().lookup("HEA200").unwrap();
        // 5383 - 2*200*10 + (6.5 + 36)*10
        assert_relative_eq!(hea200.shear_area(), 1808.0, max_relative = 1e-12);
        assert_relative_eq!(hea200.web_depth(), 134.0, max_relative = 1e-12);
    }

    #[test]
    fn test_search_sorted() {
        let found = builtin_sections().search("hea2");
        let names: Vec<_> = found.iter().map(|s| s.designation.as_str()).collect();
        assert_eq!(names, vec!["HEA200", "HEA220", "HEA240", "HEA260", "HEA280"]);
    }

    #[test]
    fn test_of_series_ordered_by_depth() {
        let ipe = builtin_sections().of_series(SectionSeries::IPE);
        assert!(ipe.windows(2).all(|w| w[0].h <= w[1].h));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"designation": "HEA200", "series": "HEA", "h": 190, "b": 200, "t_w": 6.5,
             "t_f": 10, "r": 18, "area": 5383, "i_y": 36920000, "w_pl_y": 429500}
        ]"#;
        let db = SectionDb::from_json(json).unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.lookup("HEA200").unwrap(), builtin_sections().lookup("HEA200").unwrap());
    }

    #[test]
    fn test_spaced_designation_found() {
        let json = r#"[
            {"designation": "HE 200 A", "series": "HEA", "h": 190, "b": 200, "t_w": 6.5,
             "t_f": 10, "r": 18, "area": 5383, "i_y": 36920000, "w_pl_y": 429500}
        ]"#;
        let db = SectionDb::from_json(json).unwrap();
        assert_eq!(db.lookup("HE 200 A").unwrap().designation, "HE 200 A");
        assert_eq!(db.lookup("he200a").unwrap().designation, "HE 200 A");
        assert_eq!(db.search("he 2").len(), 1);
    }

    #[test]
    fn test_from_json_rejects_bad_section() {
        let json = r#"[
            {"designation": "BAD", "series": "IPE", "h": 20, "b": 100, "t_w": 5,
             "t_f": 10, "r": 10, "area": 1000, "i_y": 1000, "w_pl_y": 100}
        ]"#;
        let err = SectionDb::from_json(json).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "BAD.web_depth"));
    }

    #[test]
    fn test_section_display() {
        let s = builtin_sections().lookup("IPE300").unwrap();
        assert!(format!("{}", s).starts_with("IPE300"));
    }
}
