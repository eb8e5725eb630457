pub mod admin_fixture_controller;
pub mod fixture_controller;
pub mod leaderboard_controller;
pub mod league_controller;
pub mod prediction_controller;
pub mod profile_controller;
