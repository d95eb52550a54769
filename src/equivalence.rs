// ⚖️ Structural Equivalence - generic comparison with diagnostics
//
// Works on anything serde can serialize: both sides become
// serde_json::Value trees which are walked in lockstep. New fields on a
// record are picked up without touching this code; identity-like members
// are excluded by path ("parent.id") or by name at every depth ("id").
//
// Unlike comparison::are_equal, a mismatch says WHERE it happened.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceOptions {
    /// Dotted paths skipped exactly (e.g. "id", "parent.id")
    excluded_paths: BTreeSet<String>,

    /// Member names skipped wherever they appear
    excluded_members: BTreeSet<String>,
}

impl EquivalenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: skip one member path
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.excluded_paths.insert(path.into());
        self
    }

    /// Builder: skip a member name at every depth
    pub fn exclude_member_everywhere(mut self, name: impl Into<String>) -> Self {
        self.excluded_members.insert(name.into());
        self
    }

    fn is_excluded(&self, path: &str, member: &str) -> bool {
        self.excluded_members.contains(member) || self.excluded_paths.contains(path)
    }
}

// ============================================================================
// DIFFERENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Same type, different value
    ValueMismatch,

    /// Member present in expected only
    MissingMember,

    /// Member present in actual only
    UnexpectedMember,

    /// Arrays of different length (expected/actual hold the lengths)
    LengthMismatch,

    /// Different JSON types (null vs object, number vs string, ...)
    TypeMismatch,
}

/// First point where two values diverge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// `$` for the root, otherwise dotted members and `[i]` indices;
    /// paths starting at an index, and quoted `["a.b"]` members, start with `$`
    pub path: String,
    pub kind: DifferenceKind,
    pub expected: Value,
    pub actual: Value,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DifferenceKind::MissingMember => {
                write!(f, "{}: missing member, expected {}", self.path, self.expected)
            }
            DifferenceKind::UnexpectedMember => {
                write!(f, "{}: unexpected member with value {}", self.path, self.actual)
            }
            DifferenceKind::LengthMismatch => write!(
                f,
                "{}: expected {} items but found {}",
                self.path, self.expected, self.actual
            ),
            DifferenceKind::ValueMismatch | DifferenceKind::TypeMismatch => write!(
                f,
                "{}: expected {} but found {}",
                self.path, self.expected, self.actual
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum EquivalenceError {
    #[error("values are not equivalent: {0}")]
    Different(Difference),

    #[error("cannot serialize value for comparison: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Compare two serializable values member by member
pub fn compare<A, E>(
    actual: &A,
    expected: &E,
    options: &EquivalenceOptions,
) -> Result<(), EquivalenceError>
where
    A: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    let actual = serde_json::to_value(actual)?;
    let expected = serde_json::to_value(expected)?;
    compare_values(&actual, &expected, options).map_err(EquivalenceError::Different)
}

/// Compare two JSON trees; reports the first difference in traversal order
/// (object members sorted by name, arrays by index)
pub fn compare_values(
    actual: &Value,
    expected: &Value,
    options: &EquivalenceOptions,
) -> Result<(), Difference> {
    let mut path = Path::default();
    let result = walk(&mut path, actual, expected, options);
    if let Err(difference) = &result {
        debug!(path = %difference.path, kind = ?difference.kind, "values not equivalent");
    }
    result
}

/// Panics with the first difference. Intended for tests.
#[track_caller]
pub fn assert_equivalent<A, E>(actual: &A, expected: &E, options: &EquivalenceOptions)
where
    A: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    if let Err(err) = compare(actual, expected, options) {
        panic!("{}", err);
    }
}

fn walk(
    path: &mut Path,
    actual: &Value,
    expected: &Value,
    options: &EquivalenceOptions,
) -> Result<(), Difference> {
    match (actual, expected) {
        (Value::Object(a), Value::Object(e)) => {
            let names: BTreeSet<&String> = a.keys().chain(e.keys()).collect();

            for name in names {
                path.push(Segment::Member(name.clone()));
                let rendered = path.render();

                if !options.is_excluded(&rendered, name) {
                    let outcome = match (a.get(name.as_str()), e.get(name.as_str())) {
                        (Some(av), Some(ev)) => walk(path, av, ev, options),
                        (None, Some(ev)) => Err(Difference {
                            path: rendered,
                            kind: DifferenceKind::MissingMember,
                            expected: ev.clone(),
                            actual: Value::Null,
                        }),
                        (Some(av), None) => Err(Difference {
                            path: rendered,
                            kind: DifferenceKind::UnexpectedMember,
                            expected: Value::Null,
                            actual: av.clone(),
                        }),
                        (None, None) => Ok(()),
                    };
                    outcome?;
                }

                path.pop();
            }
            Ok(())
        }

        (Value::Array(a), Value::Array(e)) => {
            if a.len() != e.len() {
                return Err(Difference {
                    path: path.render(),
                    kind: DifferenceKind::LengthMismatch,
                    expected: Value::from(e.len()),
                    actual: Value::from(a.len()),
                });
            }

            for (index, (av, ev)) in a.iter().zip(e).enumerate() {
                path.push(Segment::Index(index));
                walk(path, av, ev, options)?;
                path.pop();
            }
            Ok(())
        }

        (a, e) if a == e => Ok(()),

        (a, e) => Err(Difference {
            path: path.render(),
            kind: if same_type(a, e) {
                DifferenceKind::ValueMismatch
            } else {
                DifferenceKind::TypeMismatch
            },
            expected: e.clone(),
            actual: a.clone(),
        }),
    }
}

fn same_type(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

// ============================================================================
// PATH
// ============================================================================

#[derive(Debug, Clone)]
enum Segment {
    Member(String),
    Index(usize),
}

#[derive(Debug, Default)]
struct Path {
    segments: Vec<Segment>,
}

impl Path {
    fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }

    fn render(&self) -> String {
        if self.segments.is_empty() {
            return "$".to_string();
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Member(name) if is_plain_member(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                // Names with separators in them are quoted: $["a.b"]
                Segment::Member(name) => {
                    if out.is_empty() {
                        out.push('$');
                    }
                    out.push_str(&format!("[{:?}]", name));
                }
                Segment::Index(index) => {
                    if out.is_empty() {
                        out.push('$');
                    }
                    out.push_str(&format!("[{}]", index));
                }
            }
        }
        out
    }
}

fn is_plain_member(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '[', ']', '"'])
}
