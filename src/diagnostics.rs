//! Data-quality diagnostics.
//!
//! The relation core never logs on its own. Anything worth telling a user
//! about the input data (missing properties, ambiguous names, broken links)
//! is handed to a [`DiagnosticSink`] supplied by the caller. The binary plugs
//! in [`TracingSink`]; tests use [`NoOpSink`] or [`CollectingSink`].

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A data-quality finding raised while building or querying relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A feature has no value for an admin level.
    MissingProperty {
        feature: usize,
        level: usize,
        key: String,
    },
    /// A feature geometry has no coordinates (or could not be read).
    EmptyGeometry { feature: usize },
    /// The same name appears at one level under more than one parent.
    AmbiguousName {
        level: usize,
        name: String,
        parents: Vec<Option<String>>,
    },
    /// A value below a missing level was discarded.
    OrphanDropped {
        feature: usize,
        level: usize,
        name: String,
    },
    /// A parent relation referenced by the chain does not exist.
    AncestorChainBroken { level: usize, name: String },
}

impl Diagnostic {
    /// Whether this finding should be surfaced as a warning rather than detail.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Diagnostic::MissingProperty { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingProperty {
                feature,
                level,
                key,
            } => write!(f, "feature #{} has no '{}' (level {})", feature, key, level),
            Diagnostic::EmptyGeometry { feature } => {
                write!(f, "feature #{} has no usable geometry", feature)
            }
            Diagnostic::AmbiguousName {
                level,
                name,
                parents,
            } => {
                let parents: Vec<&str> = parents
                    .iter()
                    .map(|p| p.as_deref().unwrap_or("<none>"))
                    .collect();
                write!(
                    f,
                    "'{}' at level {} appears under {} parents: {}",
                    name,
                    level,
                    parents.len(),
                    parents.join(", ")
                )
            }
            Diagnostic::OrphanDropped {
                feature,
                level,
                name,
            } => write!(
                f,
                "feature #{}: dropped '{}' at level {} below a missing level",
                feature, name, level
            ),
            Diagnostic::AncestorChainBroken { level, name } => {
                write!(f, "no parent relation '{}' at level {}", name, level)
            }
        }
    }
}

/// Receiver for diagnostics.
///
/// Implementations must be cheap to call; the builder reports inline.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic),
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl DiagnosticSink for NoOpSink {
    #[inline]
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        if diagnostic.is_warning() {
            tracing::warn!("{}", diagnostic);
        } else {
            tracing::debug!("{}", diagnostic);
        }
    }
}

/// Keeps every diagnostic in memory, in report order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected diagnostics, leaving the sink empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panicking reporter must not cost the entries already collected.
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}
