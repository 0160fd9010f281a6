/// Typed and erased cache configurations
pub mod cache_configuration;

/// Class-loading context
pub mod class_loader;

/// Resolved, immutable manager configuration
pub mod configuration;

/// Service and service-configuration contracts
pub mod service;

/// Registry of service instances
pub mod service_locator;
