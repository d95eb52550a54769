// 👤 Person Entity - value fields + construction-order identity
//
// "name/age/height/weight/parent are VALUES, id is IDENTITY"
//
// - id is handed out sequentially when a Person is created
// - Two people with the same values are structurally equal even though
//   their ids always differ
// - The parent chain is shared through Arc: a parent exists before its
//   child, so a chain can never loop back on itself

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::equivalence::EquivalenceOptions;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next construction-order id (process-wide)
pub fn next_id() -> u64 {
    ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// ============================================================================
// PERSON ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    // ========================================================================
    // IDENTITY (never compared)
    // ========================================================================
    /// Assigned at creation; absent in JSON input means "assign a new one"
    #[serde(default = "next_id")]
    pub id: u64,

    // ========================================================================
    // VALUES
    // ========================================================================
    pub name: String,
    pub age: i32,
    pub height: i32,
    pub weight: i32,

    /// Ancestry chain, terminated by None
    #[serde(default)]
    pub parent: Option<Arc<Person>>,
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        age: i32,
        height: i32,
        weight: i32,
        parent: Option<Person>,
    ) -> Self {
        Person {
            id: next_id(),
            name: name.into(),
            age,
            height,
            weight,
            parent: parent.map(Arc::new),
        }
    }

    /// Create a person whose parent is shared with other records (siblings)
    pub fn with_shared_parent(
        name: impl Into<String>,
        age: i32,
        height: i32,
        weight: i32,
        parent: Arc<Person>,
    ) -> Self {
        Person {
            id: next_id(),
            name: name.into(),
            age,
            height,
            weight,
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&Person> {
        self.parent.as_deref()
    }

    /// This person followed by every ancestor, nearest first
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// Number of records in the chain, this one included
    pub fn depth(&self) -> usize {
        self.lineage().count()
    }

    /// Field-wise comparison of this level only (parent and id ignored)
    pub fn same_values(&self, other: &Person) -> bool {
        self.name == other.name
            && self.age == other.age
            && self.height == other.height
            && self.weight == other.weight
    }

    /// Options that make structural equivalence ignore `id` at every depth
    pub fn equivalence_options() -> EquivalenceOptions {
        EquivalenceOptions::new().exclude_member_everywhere("id")
    }
}

/// Unlinks the parent chain level by level so dropping a deep chain does
/// not recurse. Stops at the first ancestor still shared with another record.
impl Drop for Person {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            next = match Arc::try_unwrap(parent) {
                Ok(mut person) => person.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// Iterator over a person and their ancestors
pub struct Lineage<'a> {
    next: Option<&'a Person>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a Person;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
