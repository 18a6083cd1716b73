//! Marketplace profiles: field schemas, weighting rules and the registry

mod profile;
pub mod profiles;
mod registry;
mod schema;

pub use profile::{ClaimCategory, MarketplaceProfile, WeightedCriterion};
pub use registry::{ProfileRegistry, RegistryBuilder, WEIGHT_TOLERANCE};
pub use schema::{FieldKey, FieldSpec, FieldValue};
