//! The target class's current member set.
//!
//! Members live in an arena indexed by `MemberKey`, so "is this already
//! implemented" is a hash lookup on structure rather than a scan over text.

use crate::signature::MemberKey;
use crate::type_ref::TypeReference;
use rustc_hash::{FxHashMap, FxHashSet};

/// Index of a member in a `ClassSnapshot` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMember {
    pub key: MemberKey,
    /// Declared name (field name, method name, `this` for indexers, class
    /// name for constructors).
    pub name: String,
    /// Qualifier of an explicit interface implementation (`IFoo.M`).
    pub explicit_interface: Option<TypeReference>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassSnapshot {
    name: String,
    type_parameters: Vec<String>,
    members: Vec<SnapshotMember>,
    index: FxHashMap<MemberKey, Vec<MemberId>>,
}

impl ClassSnapshot {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_type_parameters(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.type_parameters = names.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_parameters(&self) -> &[String] {
        &self.type_parameters
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a member. Duplicate keys are kept; the class may legitimately hold
    /// an implicit and an explicit implementation of the same signature.
    pub fn push(&mut self, member: SnapshotMember) -> MemberId {
        let id = MemberId(self.members.len() as u32);
        self.index.entry(member.key.clone()).or_default().push(id);
        self.members.push(member);
        id
    }

    pub fn add_field(&mut self, name: &str, ty: TypeReference) -> MemberId {
        self.push(SnapshotMember {
            key: MemberKey::field(ty),
            name: name.to_string(),
            explicit_interface: None,
        })
    }

    pub fn get(&self, id: MemberId) -> Option<&SnapshotMember> {
        self.members.get(id.0 as usize)
    }

    pub fn members(&self) -> impl Iterator<Item = (MemberId, &SnapshotMember)> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, member)| (MemberId(i as u32), member))
    }

    pub fn contains_key(&self, key: &MemberKey) -> bool {
        self.index.contains_key(key)
    }

    /// Members declared with exactly `key`, in declaration order.
    pub fn members_with_key(&self, key: &MemberKey) -> impl Iterator<Item = &SnapshotMember> {
        self.index
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
    }

    /// Whether a candidate with `key` is already present.
    ///
    /// An implicit candidate is satisfied by any member with the same key,
    /// implicit or explicit. An explicit candidate is satisfied only by a
    /// member qualified with the same interface.
    pub fn satisfies(&self, key: &MemberKey, explicit_interface: Option<&TypeReference>) -> bool {
        let Some(ids) = self.index.get(key) else {
            return false;
        };
        match explicit_interface {
            None => true,
            Some(interface) => ids.iter().any(|id| {
                self.get(*id)
                    .is_some_and(|member| member.explicit_interface.as_ref() == Some(interface))
            }),
        }
    }

    /// Name of the first field declared with exactly this type.
    pub fn field_of_type(&self, ty: &TypeReference) -> Option<&str> {
        let ids = self.index.get(&MemberKey::field(ty.clone()))?;
        ids.first()
            .and_then(|id| self.get(*id))
            .map(|member| member.name.as_str())
    }

    /// Every declared member name, for collision-free naming.
    pub fn member_names(&self) -> FxHashSet<&str> {
        self.members
            .iter()
            .map(|member| member.name.as_str())
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod snapshot_tests;
