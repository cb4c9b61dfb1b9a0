use thiserror::Error;

/// The error type surfaced at the core's external boundary.
///
/// Evaluation itself never fails at runtime: unknown tags yield no match,
/// malformed geometry yields empty scene items, and a missing way node is
/// skipped silently (see the scene controller and navmesh builder for
/// where those cases are swallowed instead of propagated). These variants
/// cover the handful of precondition and I/O failures that *can*
/// legitimately happen.
#[derive(Error, Debug)]
pub enum MapError {
    /// A MapCSS style text failed to parse. The parser itself is out of
    /// scope for this crate; this variant exists so a caller-supplied
    /// parser can report failures through the same error type.
    #[error("style parse error: {0}")]
    ParseError(String),

    /// `evaluate`/`evaluate_canvas` was called against a style that has
    /// not been `compile`d against the active data set yet.
    #[error("style has not been compiled against the active data set")]
    StyleNotCompiled,

    /// A navmesh downstream stage (voxelize/contour/poly/detail/detour)
    /// reported failure. The partial navmesh is discarded; this wraps the
    /// stage name for diagnostics.
    #[error("navmesh stage failed: {0}")]
    NavmeshStageFailed(String),

    /// I/O error writing a debug artifact (`.obj`/`.gset`) or reading a
    /// configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document failed to deserialize.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Internal logic error: an invariant the rest of the crate relies on
    /// did not hold. Should not occur during regular use.
    #[error("internal error: {0}")]
    Internal(String),
}

/// An unknown level is deliberately not a [`MapError`] variant: it is
/// answered with a no-op rather than propagated. Call sites that ask
/// the floor-level UI model about a level absent from the level map get
/// `None`/an empty set back, not an `Err`.
pub type MapResult<T> = Result<T, MapError>;
