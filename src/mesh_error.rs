//! MeshPipeError: unified error type for meshpipe public APIs
//!
//! Every fallible operation in the crate reports through this enum so that
//! a pipeline run surfaces exactly one error kind to its caller. Any error
//! aborts the current run; there is no retry or partial-recovery path.

use crate::stage::StageKind;
use thiserror::Error;

/// Unified error type for meshpipe operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshPipeError {
    /// Factory lookup for a `(kind, name)` pair that was never registered.
    #[error("no {kind} stage registered under name `{name}`")]
    UnknownStage { kind: StageKind, name: String },
    /// An option was declared twice on the same stage.
    #[error("stage `{stage}`: config option `{option}` is already declared")]
    DuplicateOption { stage: String, option: String },
    /// An option was read without ever being declared.
    #[error("stage `{stage}`: config option `{option}` was never declared")]
    UnknownOption { stage: String, option: String },
    /// A registered raw value could not be coerced to the requested type.
    #[error("config option `{option}`: expected {expected}, got `{value}`")]
    InvalidOptionType {
        option: String,
        expected: &'static str,
        value: String,
    },
    /// Fewer than two grid points on an axis; no cell can be formed.
    #[error("degenerate grid: nx={nx}, ny={ny} (need at least 2 points per axis)")]
    DegenerateGrid { nx: i64, ny: i64 },
    /// Shape token not matching any supported element decomposition.
    #[error("unrecognized shape `{0}` (expected Quadrilateral or Triangle)")]
    UnknownShape(String),
    /// Opaque failure inside a stage body.
    #[error("stage `{stage}` failed: {message}")]
    StageProcessing { stage: String, message: String },
    /// Mesh serialization failure.
    #[error("mesh I/O failure: {0}")]
    MeshIo(String),
}

impl From<std::io::Error> for MeshPipeError {
    fn from(err: std::io::Error) -> Self {
        MeshPipeError::MeshIo(err.to_string())
    }
}
