pub mod advisor;
pub mod advisory_service;
pub mod alerts;
pub mod catalog;
pub mod i18n;
pub mod mandi;

pub use advisor::CropAdvisor;
pub use advisory_service::{AdvisoryReport, AdvisoryService};
pub use alerts::AlertEngine;
