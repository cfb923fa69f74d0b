//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent data-integrity violations in the rig or animation input.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot build a frame tree over an empty timeline")]
    EmptyTimeline,

    #[error("timeline of {0} frames exceeds the addressable frame range")]
    TimelineTooLong(usize),

    #[error("invalid {kind} name '{name}': only [a-z0-9_.-] are allowed")]
    InvalidName { kind: &'static str, name: String },

    #[error("frame {frame} of animation '{animation}' references unknown variant '{variant}'")]
    UnknownVariant {
        animation: String,
        frame: u32,
        variant: String,
    },

    #[error("frame {frame} of animation '{animation}' references unknown bone '{bone}'")]
    UnknownBone {
        animation: String,
        frame: u32,
        bone: String,
    },

    #[error("no default variant defined")]
    MissingDefaultVariant,

    #[error("multiple default variants defined: {0}")]
    MultipleDefaultVariants(String),

    #[error("duplicate animation name: {0}")]
    DuplicateAnimation(String),

    #[error("duplicate variant name: {0}")]
    DuplicateVariant(String),

    #[error("animation '{animation}' has {frames} frames but a duration of {duration}")]
    FrameCountMismatch {
        animation: String,
        frames: usize,
        duration: u32,
    },

    #[error("animation '{animation}': frame at position {position} carries index {index}")]
    FrameIndexMismatch {
        animation: String,
        position: usize,
        index: u32,
    },

    #[error("no default pose for bone '{0}'")]
    MissingDefaultPose(String),

    #[error("variant '{variant}' has no model for bone '{bone}'")]
    MissingVariantModel { variant: String, bone: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
