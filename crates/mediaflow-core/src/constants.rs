//! Fixed resource names and encoding inputs.
//!
//! Fixed-named resources are reused across runs: the transform and the
//! streaming policy are never deleted, the content key policy is recreated
//! on demand. Per-run resources get unique names (see [`crate::names`]).

/// Reusable encoding transform. Created once, never deleted.
pub const TRANSFORM_NAME: &str = "MyTransform";

/// Content key policy configuring FairPlay license delivery.
pub const CONTENT_KEY_POLICY_NAME: &str = "FairPlayContentKeyPolicy";

/// Custom streaming policy enabling CBCS encryption with persistent licenses.
pub const FAIRPLAY_STREAMING_POLICY_NAME: &str = "FairPlayCustomStreamingPolicyName";

/// HTTPS source the encoding job reads from.
pub const INPUT_BASE_URI: &str =
    "https://nimbuscdn-nimbuspm.streaming.mediaservices.windows.net/2b533311-b215-4409-80af-529c3e853622/";

/// Input file under [`INPUT_BASE_URI`].
pub const INPUT_MP4_FILE: &str = "Ignite-short.mp4";

/// Default key label for the CBCS content key.
pub const CBCS_DEFAULT_KEY_LABEL: &str = "CBCS_DefaultKeyLabel";

/// FairPlay offline rental license: seconds the license may be stored.
pub const OFFLINE_RENTAL_STORAGE_SECONDS: i64 = 300_000;

/// FairPlay offline rental license: seconds playback is allowed after first use.
pub const OFFLINE_RENTAL_PLAYBACK_SECONDS: i64 = 500_000;
