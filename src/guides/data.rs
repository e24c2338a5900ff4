use super::{Region, StateGuide};

macro_rules! guide {
    ($name:expr, $abbr:expr, $slug:expr, $region:ident) => {
        StateGuide {
            name: $name,
            abbreviation: $abbr,
            slug: $slug,
            region: Region::$region,
        }
    };
}

/// The 50 states plus DC, ordered by name
pub(super) static STATE_GUIDES: [StateGuide; 51] = [
    guide!("Alabama", "AL", "alabama", South),
    guide!("Alaska", "AK", "alaska", West),
    guide!("Arizona", "AZ", "arizona", West),
    guide!("Arkansas", "AR", "arkansas", South),
    guide!("California", "CA", "california", West),
    guide!("Colorado", "CO", "colorado", West),
    guide!("Connecticut", "CT", "connecticut", Northeast),
    guide!("Delaware", "DE", "delaware", South),
    guide!("District of Columbia", "DC", "district-of-columbia", South),
    guide!("Florida", "FL", "florida", South),
    guide!("Georgia", "GA", "georgia", South),
    guide!("Hawaii", "HI", "hawaii", West),
    guide!("Idaho", "ID", "idaho", West),
    guide!("Illinois", "IL", "illinois", Midwest),
    guide!("Indiana", "IN", "indiana", Midwest),
    guide!("Iowa", "IA", "iowa", Midwest),
    guide!("Kansas", "KS", "kansas", Midwest),
    guide!("Kentucky", "KY", "kentucky", South),
    guide!("Louisiana", "LA", "louisiana", South),
    guide!("Maine", "ME", "maine", Northeast),
    guide!("Maryland", "MD", "maryland", South),
    guide!("Massachusetts", "MA", "massachusetts", Northeast),
    guide!("Michigan", "MI", "michigan", Midwest),
    guide!("Minnesota", "MN", "minnesota", Midwest),
    guide!("Mississippi", "MS", "mississippi", South),
    guide!("Missouri", "MO", "missouri", Midwest),
    guide!("Montana", "MT", "montana", West),
    guide!("Nebraska", "NE", "nebraska", Midwest),
    guide!("Nevada", "NV", "nevada", West),
    guide!("New Hampshire", "NH", "new-hampshire", Northeast),
    guide!("New Jersey", "NJ", "new-jersey", Northeast),
    guide!("New Mexico", "NM", "new-mexico", West),
    guide!("New York", "NY", "new-york", Northeast),
    guide!("North Carolina", "NC", "north-carolina", South),
    guide!("North Dakota", "ND", "north-dakota", Midwest),
    guide!("Ohio", "OH", "ohio", Midwest),
    guide!("Oklahoma", "OK", "oklahoma", South),
    guide!("Oregon", "OR", "oregon", West),
    guide!("Pennsylvania", "PA", "pennsylvania", Northeast),
    guide!("Rhode Island", "RI", "rhode-island", Northeast),
    guide!("South Carolina", "SC", "south-carolina", South),
    guide!("South Dakota", "SD", "south-dakota", Midwest),
    guide!("Tennessee", "TN", "tennessee", South),
    guide!("Texas", "TX", "texas", South),
    guide!("Utah", "UT", "utah", West),
    guide!("Vermont", "VT", "vermont", Northeast),
    guide!("Virginia", "VA", "virginia", South),
    guide!("Washington", "WA", "washington", West),
    guide!("West Virginia", "WV", "west-virginia", South),
    guide!("Wisconsin", "WI", "wisconsin", Midwest),
    guide!("Wyoming", "WY", "wyoming", West),
];
