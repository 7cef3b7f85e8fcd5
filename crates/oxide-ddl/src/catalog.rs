//! Dialect type catalogs.
//!
//! A catalog lists the data types a dialect knows, in preference order, and
//! resolves type requests against them. Requests that match nothing report
//! [`TypeNotFound`]; callers that want the lenient behaviour use
//! [`TypeCatalog::resolve_or_default`], which substitutes the dialect's
//! default type.

use serde::{Deserialize, Serialize};

/// Broad category of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// Character data.
    String,
    /// Integer, fixed and floating point numbers.
    Numeric,
    /// Booleans.
    Boolean,
    /// Dates, times and intervals.
    DateTime,
    /// Raw bytes.
    Binary,
    /// JSON documents.
    Json,
    /// Everything else (enums, spatial, network types, ...).
    Other,
}

/// Parameters a type accepts after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeParams {
    /// No parameters.
    None,
    /// A maximum length, e.g. `varchar(100)`.
    Length,
    /// Precision and optional scale, e.g. `decimal(10,2)`.
    Precision,
}

/// One entry of a type catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeEntry {
    /// Lowercase type name.
    pub name: &'static str,
    /// Data kind.
    pub kind: DataKind,
    /// Accepted parameters.
    pub params: TypeParams,
}

impl DataTypeEntry {
    /// Creates a catalog entry.
    #[must_use]
    pub const fn new(name: &'static str, kind: DataKind, params: TypeParams) -> Self {
        Self { name, kind, params }
    }
}

/// An abstract type request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRequest {
    /// A type by name, as a user would type it (`VARCHAR(20)`, `int unsigned`).
    Named(String),
    /// The preferred type of a kind, optionally with a length.
    Kind {
        /// Requested kind.
        kind: DataKind,
        /// Requested length; dropped when the type takes no length.
        length: Option<u32>,
    },
}

impl TypeRequest {
    /// Creates a request by name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a request for a string type of the given length.
    #[must_use]
    pub fn string(length: u32) -> Self {
        Self::Kind {
            kind: DataKind::String,
            length: Some(length),
        }
    }
}

impl std::fmt::Display for TypeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "'{name}'"),
            Self::Kind {
                kind,
                length: Some(len),
            } => write!(f, "{kind:?} of length {len}"),
            Self::Kind { kind, length: None } => write!(f, "{kind:?}"),
        }
    }
}

/// A concrete type picked from a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Lowercase type name.
    pub name: String,
    /// Data kind of the type.
    pub kind: DataKind,
    /// Length to apply, only set for types that take one.
    pub length: Option<u32>,
}

impl ResolvedType {
    fn from_entry(entry: &DataTypeEntry, length: Option<u32>) -> Self {
        Self {
            name: entry.name.to_string(),
            kind: entry.kind,
            length: if entry.params == TypeParams::Length {
                length
            } else {
                None
            },
        }
    }
}

/// The request matched nothing in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No type matching {0} in the {1} type catalog")]
pub struct TypeNotFound(pub String, pub &'static str);

/// Outcome of a lenient resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    /// The request matched a catalog entry.
    Resolved(ResolvedType),
    /// Nothing matched; the catalog default was substituted.
    Fallback {
        /// What was asked for.
        requested: String,
        /// The default type used instead.
        substitute: ResolvedType,
    },
}

impl TypeResolution {
    /// Returns the type to use, whichever way it was obtained.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedType {
        match self {
            Self::Resolved(t) | Self::Fallback { substitute: t, .. } => t,
        }
    }

    /// Returns true if the default type was substituted.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// The list of types one dialect understands.
#[derive(Debug, Clone, Copy)]
pub struct TypeCatalog {
    dialect: &'static str,
    entries: &'static [DataTypeEntry],
    default_type: DataTypeEntry,
}

impl TypeCatalog {
    /// Creates a catalog. Entries are listed in preference order.
    #[must_use]
    pub const fn new(
        dialect: &'static str,
        entries: &'static [DataTypeEntry],
        default_type: DataTypeEntry,
    ) -> Self {
        Self {
            dialect,
            entries,
            default_type,
        }
    }

    /// Returns all entries.
    #[must_use]
    pub fn entries(&self) -> &'static [DataTypeEntry] {
        self.entries
    }

    /// Looks up a type by name.
    ///
    /// Matching is case-insensitive and ignores parameters, array suffixes
    /// and trailing attributes such as `unsigned`.
    #[must_use]
    pub fn find(&self, type_name: &str) -> Option<&'static DataTypeEntry> {
        let normalized = normalize_type_name(type_name);
        if normalized.is_empty() {
            return None;
        }
        let exact = self.entries.iter().find(|e| e.name == normalized);
        exact.or_else(|| {
            let head = normalized.split(' ').next().unwrap_or_default();
            self.entries.iter().find(|e| e.name == head)
        })
    }

    /// Returns the preferred entry of a kind.
    #[must_use]
    pub fn find_kind(&self, kind: DataKind) -> Option<&'static DataTypeEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Resolves a request strictly.
    pub fn resolve(&self, request: &TypeRequest) -> Result<ResolvedType, TypeNotFound> {
        let found = match request {
            TypeRequest::Named(name) => self.find(name).map(|e| ResolvedType::from_entry(e, None)),
            TypeRequest::Kind { kind, length } => self
                .find_kind(*kind)
                .map(|e| ResolvedType::from_entry(e, *length)),
        };
        found.ok_or_else(|| TypeNotFound(request.to_string(), self.dialect))
    }

    /// Resolves a request, substituting the default type when nothing matches.
    #[must_use]
    pub fn resolve_or_default(&self, request: &TypeRequest) -> TypeResolution {
        match self.resolve(request) {
            Ok(resolved) => TypeResolution::Resolved(resolved),
            Err(TypeNotFound(requested, _)) => TypeResolution::Fallback {
                requested,
                substitute: self.default_type(),
            },
        }
    }

    /// Returns the type substituted for unknown requests.
    #[must_use]
    pub fn default_type(&self) -> ResolvedType {
        ResolvedType::from_entry(&self.default_type, None)
    }
}

fn normalize_type_name(type_name: &str) -> String {
    let base = type_name.split('(').next().unwrap_or_default();
    let base = base.trim().trim_end_matches("[]");
    base.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
