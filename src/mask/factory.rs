//! Engine selection from configuration.

use super::{DateMask, MaskError, MaskKind, MaskOptions, MaskSource, Masked, PatternMask, RegexMask};

/// Engine family a mask source needs.
///
/// Two sources of the same kind can be swapped in place on one engine; a
/// different kind needs a new engine.
pub fn mask_kind(source: &MaskSource) -> MaskKind {
    source.kind()
}

/// Build an engine for `options.mask` and apply the remaining options to it
pub fn create_mask(options: &MaskOptions) -> Result<Box<dyn Masked>, MaskError> {
    let source = options.mask.as_ref().ok_or(MaskError::MissingMask)?;

    let mut masked: Box<dyn Masked> = match source {
        MaskSource::Pattern(pattern) => Box::new(PatternMask::new(pattern)?),
        MaskSource::Date => Box::new(DateMask::new()),
        MaskSource::Regex(regex) => Box::new(RegexMask::new(regex)?),
    };

    masked.update_options(&MaskOptions {
        mask: None,
        ..options.clone()
    })?;

    tracing::debug!(mask = %source, kind = ?masked.kind(), "created mask engine");
    Ok(masked)
}
