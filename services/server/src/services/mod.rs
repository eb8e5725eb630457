pub mod scoring_service;
