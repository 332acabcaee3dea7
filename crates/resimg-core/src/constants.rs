//! Layout and format constants shared by the store components.

/// Extension every stored original and derivative is normalized to.
pub const OUTPUT_EXTENSION: &str = "jpeg";

/// Pattern a size-labeled subdirectory name must match.
pub const SIZE_LABEL_PATTERN: &str = r"^[0-9]+x[0-9]+$";

/// Replacement name for uploads whose filename attempts path traversal.
pub const INVALID_FILENAME: &str = "invalid_filename";

/// Stem used when sanitization leaves nothing usable.
pub const FALLBACK_FILE_STEM: &str = "file";
