pub mod create_metadata;
pub mod initialize;
pub mod mint_from_burn_v3;
pub mod sync_validator_set_version;

pub use create_metadata::*;
pub use initialize::*;
pub use mint_from_burn_v3::*;
pub use sync_validator_set_version::*;
