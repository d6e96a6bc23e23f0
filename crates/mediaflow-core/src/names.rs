//! Per-run unique resource names.

use uuid::Uuid;

/// Names of the resources created for a single run.
///
/// Each run embeds a fresh UUID so repeated runs never collide with
/// leftovers from a prior run that skipped cleanup.
#[derive(Clone, Debug)]
pub struct RunNames {
    pub job: String,
    pub output_asset: String,
    pub locator: String,
}

impl RunNames {
    pub fn generate() -> Self {
        let uniqueness = Uuid::new_v4();
        Self {
            job: format!("job-{uniqueness}"),
            output_asset: format!("output-{uniqueness}"),
            locator: format!("locator-{uniqueness}"),
        }
    }
}
