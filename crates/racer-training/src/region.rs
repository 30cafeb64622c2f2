use crate::error::{LaunchError, LaunchResult};

/// Regions where the simulation service pairs with training jobs.
pub const SUPPORTED_REGIONS: [&str; 3] = ["us-east-1", "us-west-2", "eu-west-1"];

#[must_use]
pub fn is_supported_region(region: &str) -> bool {
    SUPPORTED_REGIONS.contains(&region)
}

/// Reject any region outside [`SUPPORTED_REGIONS`].
///
/// Runs before any remote call; a wrong region is a misconfiguration, so there
/// is nothing to retry.
pub fn validate_region(region: &str) -> LaunchResult<()> {
    if is_supported_region(region) {
        return Ok(());
    }
    Err(LaunchError::UnsupportedRegion {
        region: region.to_string(),
        supported: SUPPORTED_REGIONS.join(", "),
    })
}
