pub mod mock_service;
pub mod params;
pub mod proxy_service;
pub mod service;
pub mod validation;
