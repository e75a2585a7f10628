//! Ordered enum member collection.
//!
//! Members are stored in an arena: an [`EnumMemberId`] is the index of the
//! member's slot, and removal leaves the slot empty instead of shifting the
//! rest. Display order is kept in a separate list of ids. Because slots are
//! never reclaimed, an id is never handed out twice by the same set.
//!
//! # Examples
//!
//! ```
//! use field_schema_core::{EnumMemberPatch, EnumMemberSet, MemberType};
//!
//! let mut members = EnumMemberSet::new();
//! let first = members.add().id;
//! let second = members.add().id;
//! members.update(first, EnumMemberPatch::value("small"));
//! members.update(second, EnumMemberPatch::member_type(MemberType::String));
//! members.remove(first);
//!
//! assert_eq!(members.len(), 1);
//! assert_eq!(members.add().id.index(), 2); // removed ids are not reused
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EnumValue, MemberType};

/// Stable addressing token of an enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumMemberId(u32);

impl EnumMemberId {
    /// Arena slot index of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EnumMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single member of an `Enum` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Addressing id, assigned on creation.
    pub id: EnumMemberId,
    /// Member value as entered.
    pub value: String,
    /// Type tag of the member.
    pub member_type: MemberType,
}

impl EnumMember {
    /// Returns the member without its id.
    pub fn to_value(&self) -> EnumValue {
        EnumValue::new(self.value.clone(), self.member_type)
    }
}

/// Partial update applied by [`EnumMemberSet::update`].
///
/// `None` leaves the corresponding attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumMemberPatch {
    pub value: Option<String>,
    pub member_type: Option<MemberType>,
}

impl EnumMemberPatch {
    /// Patch that only changes the value.
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            member_type: None,
        }
    }

    /// Patch that only changes the member type.
    pub fn member_type(member_type: MemberType) -> Self {
        Self {
            value: None,
            member_type: Some(member_type),
        }
    }
}

/// Ordered collection of enum members keyed by [`EnumMemberId`].
///
/// Serializes as the ordered list of `{ value, memberType }` entries; ids are
/// reassigned when a set is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EnumValue>", into = "Vec<EnumValue>")]
pub struct EnumMemberSet {
    slots: Vec<Option<EnumMember>>,
    order: Vec<EnumMemberId>,
}

impl EnumMemberSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member with an empty value and type `Int`.
    ///
    /// Returns the new member; its `id` stays valid until the member is
    /// removed.
    pub fn add(&mut self) -> &EnumMember {
        self.insert("", MemberType::Int)
    }

    /// Appends a member with the given value and type, returning its id.
    pub fn push(&mut self, value: &str, member_type: MemberType) -> EnumMemberId {
        self.insert(value, member_type).id
    }

    fn insert(&mut self, value: &str, member_type: MemberType) -> &EnumMember {
        let id = EnumMemberId(self.slots.len() as u32);
        self.order.push(id);
        self.slots.push(None);
        self.slots[id.index()].insert(EnumMember {
            id,
            value: value.to_string(),
            member_type,
        })
    }

    /// Removes the member with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: EnumMemberId) {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        if slot.take().is_some() {
            self.order.retain(|existing| *existing != id);
        }
    }

    /// Applies `patch` to the member with `id`. Unknown ids are ignored.
    pub fn update(&mut self, id: EnumMemberId, patch: EnumMemberPatch) {
        let Some(member) = self.slots.get_mut(id.index()).and_then(Option::as_mut) else {
            return;
        };
        if let Some(value) = patch.value {
            member.value = value;
        }
        if let Some(member_type) = patch.member_type {
            member.member_type = member_type;
        }
    }

    /// Looks up a member by id.
    pub fn get(&self, id: EnumMemberId) -> Option<&EnumMember> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Display position of the member with `id`.
    pub fn position(&self, id: EnumMemberId) -> Option<usize> {
        self.order.iter().position(|existing| *existing == id)
    }

    /// Iterates members in display order.
    pub fn iter(&self) -> impl Iterator<Item = &EnumMember> {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when the set has no members.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members as id-less values, in display order.
    pub fn values(&self) -> Vec<EnumValue> {
        self.iter().map(EnumMember::to_value).collect()
    }
}

impl FromIterator<EnumValue> for EnumMemberSet {
    fn from_iter<I: IntoIterator<Item = EnumValue>>(iter: I) -> Self {
        let mut set = EnumMemberSet::new();
        for entry in iter {
            set.push(&entry.value, entry.member_type);
        }
        set
    }
}

impl From<Vec<EnumValue>> for EnumMemberSet {
    fn from(values: Vec<EnumValue>) -> Self {
        values.into_iter().collect()
    }
}

impl From<EnumMemberSet> for Vec<EnumValue> {
    fn from(set: EnumMemberSet) -> Self {
        set.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(set: &EnumMemberSet) -> Vec<&str> {
        set.iter().map(|m| m.value.as_str()).collect()
    }

    #[test]
    fn test_add_appends_empty_int_member() {
        let mut set = EnumMemberSet::new();
        let member = set.add().clone();

        assert_eq!(member.value, "");
        assert_eq!(member.member_type, MemberType::Int);
        assert_eq!(set.len(), 1);
        assert_eq!(set.position(member.id), Some(0));
    }

    #[test]
    fn test_add_preserves_order() {
        let mut set = EnumMemberSet::new();
        set.push("a", MemberType::String);
        set.push("b", MemberType::String);
        let last = set.add().id;

        assert_eq!(values(&set), vec!["a", "b", ""]);
        assert_eq!(set.position(last), Some(2));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut set = EnumMemberSet::new();
        set.push("a", MemberType::Int);
        let before = set.clone();

        set.remove(EnumMemberId(42));
        assert_eq!(set, before);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut set = EnumMemberSet::new();
        let a = set.push("a", MemberType::Int);
        set.push("b", MemberType::Int);

        set.remove(a);
        set.remove(a);
        assert_eq!(values(&set), vec!["b"]);
        assert!(set.get(a).is_none());
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut set = EnumMemberSet::new();
        let a = set.add().id;
        set.remove(a);
        let b = set.add().id;

        assert_ne!(a, b);
        assert!(set.get(a).is_none());
    }

    #[test]
    fn test_update_patches_in_place() {
        let mut set = EnumMemberSet::new();
        let a = set.add().id;
        let b = set.add().id;

        set.update(b, EnumMemberPatch::value("B"));
        set.update(b, EnumMemberPatch::member_type(MemberType::String));

        let member = set.get(b).unwrap();
        assert_eq!(member.value, "B");
        assert_eq!(member.member_type, MemberType::String);
        assert_eq!(set.get(a).unwrap().value, "");
        assert_eq!(set.position(b), Some(1));
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut set = EnumMemberSet::new();
        set.push("a", MemberType::Int);
        let before = set.clone();

        set.update(EnumMemberId(7), EnumMemberPatch::value("z"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_serializes_as_ordered_values() {
        let mut set = EnumMemberSet::new();
        let a = set.push("a", MemberType::Int);
        set.push("b", MemberType::String);
        set.remove(a);

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "value": "b", "memberType": "String" }])
        );

        let back: EnumMemberSet = serde_json::from_value(json).unwrap();
        assert_eq!(back.values(), set.values());
    }
}
