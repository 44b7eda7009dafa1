use derive_builder::Builder;
use std::path::PathBuf;

/// Upper bounds applied by the embedded-language splitter.
///
/// When a host file exceeds either bound the splitter gives up and the host is
/// counted as a single, monolithic file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_regions: usize,
    pub max_region_bytes: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_regions: 1000,
            max_region_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Process-wide switches for one counting run. Built once, never mutated.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct RuntimeParameters {
    /// Export logical lines for baseline comparison.
    #[builder(default)]
    pub diff_code: bool,
    /// Collect per-line checksums for duplicate detection.
    #[builder(default)]
    pub search_for_dups: bool,
    #[builder(default)]
    pub count_complexity_metrics: bool,
    /// Directory receiving diff artifacts.
    #[builder(default = "PathBuf::from(\".\")")]
    pub diff_dir: PathBuf,
    #[builder(default = "'\\t'")]
    pub diff_delimiter: char,
    #[builder(default)]
    pub extraction_limits: ExtractionLimits,
}

impl Default for RuntimeParameters {
    fn default() -> Self {
        Self {
            diff_code: false,
            search_for_dups: false,
            count_complexity_metrics: false,
            diff_dir: PathBuf::from("."),
            diff_delimiter: '\t',
            extraction_limits: ExtractionLimits::default(),
        }
    }
}
