use crate::modules::provider::NominatimPlace;
use crate::modules::results::GeoLocation;
use crate::shared::errors::GeoFetchError;

/// Best candidate to coordinates; country falls back to the last
/// `display_name` component when address details are missing.
pub fn place_to_location(
    location: &str,
    places: &[NominatimPlace],
) -> Result<GeoLocation, GeoFetchError> {
    let place = places
        .first()
        .ok_or_else(|| GeoFetchError::NoMatch(location.to_string()))?;

    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| GeoFetchError::BadCoordinates {
                location: location.to_string(),
                message: format!("{}: {}", raw, e),
            })
    };

    let country = place
        .address
        .as_ref()
        .and_then(|address| address.country.clone())
        .or_else(|| {
            place
                .display_name
                .as_deref()
                .and_then(|name| name.rsplit(',').next())
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
        });

    Ok(GeoLocation {
        country,
        lat: parse(&place.lat)?,
        lon: parse(&place.lon)?,
    })
}
