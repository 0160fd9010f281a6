//! Test implementations (fakes) of cachet contracts.

pub mod class_loaders;
pub mod recording_service;
