pub mod fixture_model;
pub mod league_model;
pub mod prediction_model;
pub mod profile_model;
