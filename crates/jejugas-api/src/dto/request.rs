use jejugas_core::error::{JejugasError, Result};
use jejugas_core::models::{clamp_radius, FuelType, GeoQuery, SortKey, SortOrder};
use jejugas_search::models::DEFAULT_PAGE_SIZE;
use jejugas_search::SearchRequest;
use serde::Deserialize;

/// Query string of the public station search
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub fuel: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl SearchParams {
    /// Validate and convert into a search request.
    ///
    /// `lat` and `lng` must be given together. Without them the search is a
    /// plain listing sorted by name; with them it defaults to nearest first.
    pub fn into_request(self, default_radius_km: f64) -> Result<SearchRequest> {
        let mut query = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                if !(lat.is_finite() && (-90.0..=90.0).contains(&lat)) {
                    return Err(JejugasError::invalid_query("lat", "must be between -90 and 90"));
                }
                if !(lng.is_finite() && (-180.0..=180.0).contains(&lng)) {
                    return Err(JejugasError::invalid_query("lng", "must be between -180 and 180"));
                }
                GeoQuery::near(lat, lng)
            }
            (None, None) => GeoQuery::listing(),
            _ => {
                return Err(JejugasError::invalid_query("lat/lng", "must be provided together"));
            }
        };

        query.radius_km = clamp_radius(self.radius.unwrap_or(default_radius_km));

        let fuel = match self.fuel.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(fuel) => Some(fuel.parse::<FuelType>()?),
        };
        query = query.with_fuel(fuel);

        let sort_by = match self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(sort_by) => sort_by.parse::<SortKey>()?,
            None => query.sort_by,
        };
        let sort_order = match self.sort_order.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(sort_order) => sort_order.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };
        query = query.with_sort(sort_by, sort_order);

        Ok(SearchRequest::new(query).with_page(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        ))
    }
}

/// Query string of the coordinate conversion endpoint
#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jejugas_core::models::query::MAX_RADIUS_KM;

    #[test]
    fn test_defaults_without_location() {
        let request = SearchParams::default().into_request(5.0).unwrap();
        assert!(request.query.origin.is_none());
        assert_eq!(request.query.sort_by, SortKey::Name);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 20);
    }

    #[test]
    fn test_located_search() {
        let params = SearchParams {
            lat: Some(33.4996),
            lng: Some(126.5312),
            radius: Some(25.0),
            fuel: Some("diesel".into()),
            sort_order: Some("desc".into()),
            page_size: Some(500),
            ..Default::default()
        };

        let request = params.into_request(5.0).unwrap();
        assert_eq!(request.query.radius_km, MAX_RADIUS_KM);
        assert_eq!(request.query.fuel_type, Some(FuelType::Diesel));
        assert_eq!(request.query.sort_by, SortKey::Distance);
        assert_eq!(request.query.sort_order, SortOrder::Desc);
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn test_lat_without_lng_is_rejected() {
        let params = SearchParams { lat: Some(33.5), ..Default::default() };
        assert!(matches!(params.into_request(5.0), Err(JejugasError::InvalidQuery { .. })));
    }

    #[test]
    fn test_unknown_fuel_is_rejected() {
        let params = SearchParams { fuel: Some("kerosene".into()), ..Default::default() };
        assert!(params.into_request(5.0).is_err());
    }

    #[test]
    fn test_all_fuel_means_unfiltered() {
        let params = SearchParams { fuel: Some("all".into()), ..Default::default() };
        assert_eq!(params.into_request(5.0).unwrap().query.fuel_type, None);
    }
}
