//! Offline KATEC/TM to WGS84 transformation.
//!
//! The upstream feed does not document its projection parameters reliably, so
//! a prioritized list of Transverse Mercator parameter sets is tried in order
//! and the first result inside the service region wins. Each parameter set is
//! expressed as a PROJ definition and transformed to EPSG:4326 by `proj`.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use jejugas_core::models::{BoundingBox, KatecPoint, WgsPoint};
use proj::Proj;

use crate::error::ProjectionError;

/// Target CRS of every candidate
pub const WGS84_CRS: &str = "EPSG:4326";

/// Reference ellipsoid of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ellipsoid {
    Bessel,
    Grs80,
}

impl Ellipsoid {
    /// PROJ `+ellps` identifier
    pub fn proj_name(self) -> &'static str {
        match self {
            Ellipsoid::Bessel => "bessel",
            Ellipsoid::Grs80 => "GRS80",
        }
    }
}

/// Seven-parameter Helmert shift into WGS84 (position vector convention)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatumShift {
    /// Translations in meters
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    /// Rotations in arc seconds
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Scale difference in parts per million
    pub scale_ppm: f64,
}

impl DatumShift {
    /// Korean Bessel datum to WGS84
    pub const KOREA_BESSEL: DatumShift = DatumShift {
        dx: -115.80,
        dy: 474.99,
        dz: 674.11,
        rx: 1.16,
        ry: -2.31,
        rz: -1.63,
        scale_ppm: 6.43,
    };

    /// GRS80 realizations treated as coincident with WGS84
    pub const IDENTITY: DatumShift =
        DatumShift { dx: 0.0, dy: 0.0, dz: 0.0, rx: 0.0, ry: 0.0, rz: 0.0, scale_ppm: 0.0 };

    /// `+towgs84` parameter list
    pub fn towgs84(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.dx, self.dy, self.dz, self.rx, self.ry, self.rz, self.scale_ppm
        )
    }
}

/// One Transverse Mercator parameter set the source coordinates may be in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionCandidate {
    pub name: &'static str,
    pub ellipsoid: Ellipsoid,
    /// `None` when the ellipsoid is already WGS84-compatible
    pub datum_shift: Option<DatumShift>,
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

const fn bessel(
    name: &'static str,
    latitude_of_origin: f64,
    central_meridian: f64,
    scale_factor: f64,
    false_easting: f64,
    false_northing: f64,
) -> ProjectionCandidate {
    ProjectionCandidate {
        name,
        ellipsoid: Ellipsoid::Bessel,
        datum_shift: Some(DatumShift::KOREA_BESSEL),
        latitude_of_origin,
        central_meridian,
        scale_factor,
        false_easting,
        false_northing,
    }
}

const fn grs80(
    name: &'static str,
    latitude_of_origin: f64,
    central_meridian: f64,
    scale_factor: f64,
    false_easting: f64,
    false_northing: f64,
) -> ProjectionCandidate {
    ProjectionCandidate {
        name,
        ellipsoid: Ellipsoid::Grs80,
        datum_shift: None,
        latitude_of_origin,
        central_meridian,
        scale_factor,
        false_easting,
        false_northing,
    }
}

/// Candidates in priority order. The order is significant: several entries can
/// land inside the region for the same input and the first one is returned.
pub const CANDIDATES: [ProjectionCandidate; 12] = [
    bessel("katec_bessel", 38.0, 128.0, 0.9999, 400_000.0, 600_000.0),
    grs80("katec_grs80", 38.0, 128.0, 0.9999, 400_000.0, 600_000.0),
    bessel("tm126_bessel_n500k", 38.0, 126.0, 1.0, 200_000.0, 500_000.0),
    grs80("tm126_grs80_n500k", 38.0, 126.0, 1.0, 200_000.0, 500_000.0),
    bessel("tm1265_bessel_n500k", 38.0, 126.5, 1.0, 200_000.0, 500_000.0),
    grs80("tm1265_grs80_n500k", 38.0, 126.5, 1.0, 200_000.0, 500_000.0),
    bessel("tm126_bessel_n550k", 38.0, 126.0, 1.0, 200_000.0, 550_000.0),
    grs80("tm126_grs80_n550k", 38.0, 126.0, 1.0, 200_000.0, 550_000.0),
    bessel("tm1265_bessel_n550k", 38.0, 126.5, 1.0, 200_000.0, 550_000.0),
    grs80("tm1265_grs80_n550k", 38.0, 126.5, 1.0, 200_000.0, 550_000.0),
    bessel("tm126_bessel_n0", 0.0, 126.0, 0.9996, 500_000.0, 0.0),
    grs80("tm126_grs80_n0", 0.0, 126.0, 0.9996, 500_000.0, 0.0),
];

impl ProjectionCandidate {
    /// PROJ string describing this candidate as a CRS
    pub fn proj_definition(&self) -> String {
        let shift = self.datum_shift.unwrap_or(DatumShift::IDENTITY);
        format!(
            "+proj=tmerc +lat_0={} +lon_0={} +k={} +x_0={} +y_0={} +ellps={} +towgs84={} +units=m +no_defs +type=crs",
            self.latitude_of_origin,
            self.central_meridian,
            self.scale_factor,
            self.false_easting,
            self.false_northing,
            self.ellipsoid.proj_name(),
            shift.towgs84(),
        )
    }

    /// Transformation from this candidate to WGS84 (lon, lat order)
    pub fn transformer(&self) -> Result<Proj, ProjectionError> {
        Proj::new_known_crs(&self.proj_definition(), WGS84_CRS, None)
            .map_err(|e| ProjectionError::Create { candidate: self.name, reason: e.to_string() })
    }

    /// Projected coordinate to WGS84, rounded to six decimals
    pub fn to_wgs84(&self, katec: KatecPoint) -> Result<WgsPoint, ProjectionError> {
        katec_to_wgs84(&self.transformer()?, self.name, katec)
    }

    /// WGS84 to this candidate's projected coordinate
    pub fn to_projected(&self, point: WgsPoint) -> Result<KatecPoint, ProjectionError> {
        let proj = Proj::new_known_crs(WGS84_CRS, &self.proj_definition(), None)
            .map_err(|e| ProjectionError::Create { candidate: self.name, reason: e.to_string() })?;
        let (x, y) = proj
            .convert((point.longitude, point.latitude))
            .map_err(|e| ProjectionError::Convert { candidate: self.name, reason: e.to_string() })?;
        Ok(KatecPoint::new(x, y))
    }
}

fn katec_to_wgs84(
    proj: &Proj,
    candidate: &'static str,
    katec: KatecPoint,
) -> Result<WgsPoint, ProjectionError> {
    let (longitude, latitude) = proj
        .convert((katec.x, katec.y))
        .map_err(|e| ProjectionError::Convert { candidate, reason: e.to_string() })?;

    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(ProjectionError::Convert {
            candidate,
            reason: "non-finite result".to_string(),
        });
    }

    Ok(WgsPoint::rounded(latitude, longitude))
}

/// A candidate with its transformation built once
struct CompiledCandidate {
    candidate: &'static ProjectionCandidate,
    proj: Option<Mutex<Proj>>,
}

impl CompiledCandidate {
    fn compile(candidate: &'static ProjectionCandidate) -> Self {
        let proj = match candidate.transformer() {
            Ok(proj) => Some(Mutex::new(proj)),
            Err(e) => {
                tracing::error!(error = %e, "Projection candidate disabled");
                None
            }
        };
        Self { candidate, proj }
    }

    fn to_wgs84(&self, katec: KatecPoint) -> Option<WgsPoint> {
        let proj = self.proj.as_ref()?;
        let proj = proj.lock().unwrap_or_else(PoisonError::into_inner);

        match katec_to_wgs84(&proj, self.candidate.name, katec) {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::trace!(katec = %katec, error = %e, "Candidate conversion failed");
                None
            }
        }
    }
}

/// Deterministic, network-free resolver of last resort.
///
/// Cloning is cheap; clones share the compiled transformations.
#[derive(Clone)]
pub struct FallbackProjector {
    candidates: &'static [ProjectionCandidate],
    compiled: Arc<[CompiledCandidate]>,
    region: BoundingBox,
}

impl fmt::Debug for FallbackProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.candidates.iter().map(|c| c.name).collect();
        f.debug_struct("FallbackProjector")
            .field("candidates", &names)
            .field("region", &self.region)
            .finish()
    }
}

impl Default for FallbackProjector {
    fn default() -> Self {
        Self::new(&CANDIDATES, BoundingBox::JEJU)
    }
}

impl FallbackProjector {
    /// Builds one transformation per candidate; a candidate PROJ rejects is
    /// logged and skipped.
    pub fn new(candidates: &'static [ProjectionCandidate], region: BoundingBox) -> Self {
        let compiled = candidates.iter().map(CompiledCandidate::compile).collect();
        Self { candidates, compiled, region }
    }

    pub fn candidates(&self) -> &'static [ProjectionCandidate] {
        self.candidates
    }

    /// Look up a candidate by name
    pub fn candidate(&self, name: &str) -> Option<&'static ProjectionCandidate> {
        self.candidates.iter().find(|candidate| candidate.name == name)
    }

    pub fn region(&self) -> BoundingBox {
        self.region
    }

    /// First in-region result over the candidate list
    pub fn project(&self, katec: KatecPoint) -> Option<WgsPoint> {
        self.project_with_candidate(katec).map(|(point, _)| point)
    }

    /// Same as [`project`](Self::project), also naming the candidate that matched
    pub fn project_with_candidate(
        &self,
        katec: KatecPoint,
    ) -> Option<(WgsPoint, &'static ProjectionCandidate)> {
        if !katec.is_valid() {
            return None;
        }

        for compiled in self.compiled.iter() {
            let Some(point) = compiled.to_wgs84(katec) else {
                continue;
            };
            if self.region.contains(&point) {
                tracing::debug!(
                    katec = %katec,
                    candidate = compiled.candidate.name,
                    latitude = point.latitude,
                    longitude = point.longitude,
                    "Fallback projection matched"
                );
                return Some((point, compiled.candidate));
            }
        }

        tracing::warn!(
            katec = %katec,
            candidates = self.candidates.len(),
            "No projection candidate produced a point inside the service region"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JEJU_CITY: WgsPoint = WgsPoint { latitude: 33.4996, longitude: 126.5312 };

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_candidate_list_shape() {
        assert!(CANDIDATES.len() >= 10);
        assert_eq!(CANDIDATES[0].name, "katec_bessel");
        assert_eq!(CANDIDATES[1].name, "katec_grs80");
        assert_eq!(CANDIDATES[11].name, "tm126_grs80_n0");

        // Bessel entries carry the datum shift, GRS80 entries do not
        for candidate in CANDIDATES.iter() {
            let is_bessel = candidate.ellipsoid == Ellipsoid::Bessel;
            assert_eq!(is_bessel, candidate.datum_shift.is_some(), "{}", candidate.name);
        }
    }

    #[test]
    fn test_candidate_names_are_unique() {
        let mut names: Vec<&str> = CANDIDATES.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CANDIDATES.len());
    }

    #[test]
    fn test_proj_definitions() {
        assert_eq!(
            CANDIDATES[0].proj_definition(),
            "+proj=tmerc +lat_0=38 +lon_0=128 +k=0.9999 +x_0=400000 +y_0=600000 +ellps=bessel \
             +towgs84=-115.8,474.99,674.11,1.16,-2.31,-1.63,6.43 +units=m +no_defs +type=crs"
        );
        assert!(CANDIDATES[1].proj_definition().contains("+ellps=GRS80 +towgs84=0,0,0,0,0,0,0"));
    }

    #[test]
    fn test_every_candidate_builds_a_transformer() {
        for candidate in CANDIDATES.iter() {
            assert!(candidate.transformer().is_ok(), "{}", candidate.name);
        }
    }

    #[test]
    fn test_projector_clones_share_transformers() {
        let projector = FallbackProjector::default();
        let clone = projector.clone();
        assert!(Arc::ptr_eq(&projector.compiled, &clone.compiled));
        assert_eq!(
            clone.project(KatecPoint::new(263_722.2, 101_365.127)),
            projector.project(KatecPoint::new(263_722.2, 101_365.127))
        );
    }

    #[test]
    fn test_katec_point_of_jeju_city() {
        let katec = CANDIDATES[0].to_projected(JEJU_CITY).unwrap();
        assert_close(katec.x, 263_722.2, 0.5);
        assert_close(katec.y, 101_365.13, 0.5);
    }

    #[test]
    fn test_every_candidate_round_trips() {
        for candidate in CANDIDATES.iter() {
            let katec = candidate.to_projected(JEJU_CITY).unwrap();
            let back = candidate.to_wgs84(katec).unwrap();
            assert_close(back.latitude, JEJU_CITY.latitude, 2e-6);
            assert_close(back.longitude, JEJU_CITY.longitude, 2e-6);
        }
    }

    #[test]
    fn test_project_prefers_first_candidate() {
        let projector = FallbackProjector::default();
        let (point, candidate) = projector
            .project_with_candidate(KatecPoint::new(263_722.2, 101_365.127))
            .expect("Jeju City should project into the region");

        assert_eq!(candidate.name, "katec_bessel");
        assert_close(point.latitude, 33.4996, 1e-5);
        assert_close(point.longitude, 126.5312, 1e-5);
    }

    #[test]
    fn test_project_single_matching_candidate() {
        // Only the last candidate maps this point into the region
        let projector = FallbackProjector::default();
        let (point, candidate) = projector
            .project_with_candidate(KatecPoint::new(546_284.765, 3_739_538.697))
            .expect("one candidate should match");

        assert_eq!(candidate.name, "tm126_grs80_n0");
        assert_close(point.latitude, 33.795, 1e-5);
        assert_close(point.longitude, 126.5, 1e-5);
    }

    #[test]
    fn test_project_out_of_region() {
        let projector = FallbackProjector::default();
        assert!(projector.project(KatecPoint::new(1_000_000.0, 1_000_000.0)).is_none());
        assert!(projector.project(KatecPoint::new(150_000.0, 80_000.0)).is_none());
    }

    #[test]
    fn test_project_rejects_invalid_input() {
        let projector = FallbackProjector::default();
        assert!(projector.project(KatecPoint::new(0.0, 0.0)).is_none());
        assert!(projector.project(KatecPoint::new(f64::INFINITY, 100_000.0)).is_none());
    }

    #[test]
    fn test_output_is_rounded() {
        let point = CANDIDATES[0].to_wgs84(KatecPoint::new(263_700.123, 101_300.456)).unwrap();
        assert_eq!(point.latitude, jejugas_core::models::round_coordinate(point.latitude));
        assert_eq!(point.longitude, jejugas_core::models::round_coordinate(point.longitude));
    }
}
