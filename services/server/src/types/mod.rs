pub mod fixture_types;
pub mod league_types;
pub mod prediction_types;
pub mod profile_types;
