//! `[meta]` section configuration.
//!
//! Controls how missing document metadata is inferred.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[meta]` section in docfold.toml - metadata inference.
///
/// # Example
/// ```toml
/// [meta]
/// description_length = 160   # Max characters of an inferred description
/// ellipsis = "..."           # Appended when the description was cut
/// file_dates = true          # Fall back to filesystem timestamps for dates
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct MetaConfig {
    /// Maximum length (in characters) of an inferred description.
    #[serde(default = "defaults::meta::description_length")]
    #[educe(Default = defaults::meta::description_length())]
    pub description_length: usize,

    /// Marker appended to a truncated description.
    #[serde(default = "defaults::meta::ellipsis")]
    #[educe(Default = defaults::meta::ellipsis())]
    pub ellipsis: String,

    /// Infer `date`, `dateCreated` and `dateModified` from file timestamps.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub file_dates: bool,
}
