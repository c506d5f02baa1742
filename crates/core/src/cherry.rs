//! Cherry-picking: which types and members appear in the generated client.
//!
//! A run activates a set of policies at once. Each policy reads only its own
//! markers on a type or member; the verdicts are then merged:
//!
//! - a type is picked if any active policy picks it;
//! - a member gets the strongest [`PickStrength`] any active policy assigns,
//!   except that a type opted in by contract decides its members alone.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::descriptor::{Annotated, MemberDescriptor, TypeDescriptor};
use crate::error::{GenError, Result};

/// An inclusion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CherryPolicy {
    /// Opt-in: only types with a contract marker, only members with a member marker.
    ContractOptIn,
    /// Members are included unless explicitly ignored by the serialization library.
    LibraryAnnotationOptIn,
    /// Members are included unless marked non-serialized.
    LegacyOptOut,
    /// Every member is included; validation's required marker strengthens it.
    FrameworkValidationOptOut,
    /// Everything is included.
    AllMembers,
}

impl CherryPolicy {
    /// Bit assigned to the policy in the legacy flags encoding.
    /// `AllMembers` is the empty mask.
    pub fn bit(self) -> u32 {
        match self {
            CherryPolicy::AllMembers => 0,
            CherryPolicy::ContractOptIn => 1,
            CherryPolicy::LibraryAnnotationOptIn => 2,
            CherryPolicy::LegacyOptOut => 4,
            CherryPolicy::FrameworkValidationOptOut => 8,
        }
    }
}

const FLAG_POLICIES: [CherryPolicy; 4] = [
    CherryPolicy::ContractOptIn,
    CherryPolicy::LibraryAnnotationOptIn,
    CherryPolicy::LegacyOptOut,
    CherryPolicy::FrameworkValidationOptOut,
];

/// Inclusion decision for a member, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PickStrength {
    /// Omitted from the output.
    None,
    /// Emitted as an optional field.
    Cherry,
    /// Emitted as a required field.
    BigCherry,
}

impl PickStrength {
    fn from_required(required: bool) -> Self {
        if required {
            PickStrength::BigCherry
        } else {
            PickStrength::Cherry
        }
    }
}

/// The set of policies active for a run. An empty set behaves as `AllMembers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CherryPolicy>")]
pub struct PolicySet(BTreeSet<CherryPolicy>);

impl From<Vec<CherryPolicy>> for PolicySet {
    fn from(policies: Vec<CherryPolicy>) -> Self {
        policies.into_iter().collect()
    }
}

impl FromIterator<CherryPolicy> for PolicySet {
    fn from_iter<I: IntoIterator<Item = CherryPolicy>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PolicySet {
    /// The set holding only `AllMembers`.
    pub fn all_members() -> Self {
        [CherryPolicy::AllMembers].into_iter().collect()
    }

    /// Decode the legacy flags mask: 0 selects `AllMembers`, every other
    /// set bit selects one policy.
    pub fn from_bits(bits: u32) -> Result<Self> {
        if bits == 0 {
            return Ok(Self::all_members());
        }
        let known = FLAG_POLICIES.iter().fold(0, |acc, p| acc | p.bit());
        if bits & !known != 0 {
            return Err(GenError::Config(format!(
                "unknown cherry-picking policy bits {:#x} in mask {bits}",
                bits & !known
            )));
        }
        Ok(FLAG_POLICIES
            .into_iter()
            .filter(|p| bits & p.bit() != 0)
            .collect())
    }

    /// Legacy flags mask of the active policies.
    pub fn bits(&self) -> u32 {
        self.iter().fold(0, |acc, p| acc | p.bit())
    }

    /// Whether `policy` is active.
    pub fn contains(&self, policy: CherryPolicy) -> bool {
        if self.0.is_empty() {
            return policy == CherryPolicy::AllMembers;
        }
        self.0.contains(&policy)
    }

    /// Active policies in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = CherryPolicy> + '_ {
        let fallback = self.0.is_empty().then_some(CherryPolicy::AllMembers);
        self.0.iter().copied().chain(fallback)
    }
}

/// Facts about the type owning a member that change how it is picked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Owner {
    /// The owning type qualified under `ContractOptIn`.
    pub is_contract_opt_in: bool,
    /// The owning type is an enum.
    pub is_enum: bool,
}

impl Owner {
    /// Facts about `ty` under the active policies.
    pub fn of(ty: &TypeDescriptor, policies: &PolicySet) -> Self {
        Self {
            is_contract_opt_in: policies.contains(CherryPolicy::ContractOptIn)
                && has_inclusion_marker(ty, CherryPolicy::ContractOptIn),
            is_enum: ty.is_enum(),
        }
    }
}

fn has_inclusion_marker(item: &impl Annotated, policy: CherryPolicy) -> bool {
    item.marker(policy).is_some_and(|m| m.present)
}

/// Whether a type qualifies under any active policy.
pub fn is_cherry_type(ty: &TypeDescriptor, policies: &PolicySet) -> bool {
    policies.iter().any(|policy| match policy {
        CherryPolicy::ContractOptIn
        | CherryPolicy::LibraryAnnotationOptIn
        | CherryPolicy::LegacyOptOut => has_inclusion_marker(ty, policy),
        // Validation attributes have no type-level opt-in; exclusion happens per member.
        CherryPolicy::FrameworkValidationOptOut | CherryPolicy::AllMembers => true,
    })
}

/// Final pick strength of a member under the active policies.
pub fn member_cherry_type(
    member: &MemberDescriptor,
    policies: &PolicySet,
    owner: Owner,
) -> PickStrength {
    let mut strength = PickStrength::None;
    for policy in policies.iter() {
        let verdict = policy_verdict(member, policy, owner);
        if policy == CherryPolicy::ContractOptIn && owner.is_contract_opt_in {
            return verdict;
        }
        strength = strength.max(verdict);
    }
    strength
}

fn policy_verdict(member: &MemberDescriptor, policy: CherryPolicy, owner: Owner) -> PickStrength {
    let marker = member.marker(policy);
    match policy {
        CherryPolicy::ContractOptIn => {
            if owner.is_enum {
                return PickStrength::Cherry;
            }
            match marker {
                Some(m) if m.present => PickStrength::from_required(m.is_required()),
                _ => PickStrength::None,
            }
        }
        CherryPolicy::LibraryAnnotationOptIn | CherryPolicy::LegacyOptOut => match marker {
            Some(m) if !m.present => PickStrength::None,
            Some(m) => PickStrength::from_required(m.is_required()),
            None => PickStrength::Cherry,
        },
        CherryPolicy::FrameworkValidationOptOut => {
            PickStrength::from_required(marker.is_some_and(|m| m.is_required()))
        }
        CherryPolicy::AllMembers => PickStrength::Cherry,
    }
}

/// Wire name declared for a member, if any. Contract names win over library renames.
pub fn field_custom_name<'a>(member: &'a MemberDescriptor, policies: &PolicySet) -> Option<&'a str> {
    [
        CherryPolicy::ContractOptIn,
        CherryPolicy::LibraryAnnotationOptIn,
    ]
    .into_iter()
    .filter(|&policy| policies.contains(policy))
    .find_map(|policy| {
        member
            .marker(policy)
            .filter(|m| m.present)
            .and_then(|m| m.rename_to.as_deref())
            .filter(|name| !name.is_empty())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::descriptor::{AnnotationMarker, TypeKind, TypeRef};

    fn marker(policy: CherryPolicy, present: bool, required: Option<bool>) -> AnnotationMarker {
        AnnotationMarker {
            policy,
            present,
            required,
            rename_to: None,
        }
    }

    fn renamed(policy: CherryPolicy, name: &str) -> AnnotationMarker {
        AnnotationMarker {
            policy,
            present: true,
            required: None,
            rename_to: Some(name.into()),
        }
    }

    fn member(markers: Vec<AnnotationMarker>) -> MemberDescriptor {
        MemberDescriptor {
            name: "Surname".into(),
            ty: Some(TypeRef::builtin("string")),
            markers,
            custom_name: None,
            value: None,
            doc: None,
        }
    }

    fn type_with(kind: TypeKind, markers: Vec<AnnotationMarker>) -> TypeDescriptor {
        TypeDescriptor {
            namespace: "Demo".into(),
            name: "Person".into(),
            kind,
            members: Vec::new(),
            generic_parameters: Vec::new(),
            base_type: None,
            element: None,
            key: None,
            value: None,
            markers,
            doc: None,
        }
    }

    fn set(policies: &[CherryPolicy]) -> PolicySet {
        policies.iter().copied().collect()
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(PolicySet::from_bits(0).unwrap(), PolicySet::all_members());
        let set = PolicySet::from_bits(1 | 4).unwrap();
        assert!(set.contains(CherryPolicy::ContractOptIn));
        assert!(set.contains(CherryPolicy::LegacyOptOut));
        assert!(!set.contains(CherryPolicy::AllMembers));
        assert_eq!(set.bits(), 5);
        assert!(matches!(PolicySet::from_bits(64), Err(GenError::Config(_))));
    }

    #[test]
    fn test_empty_set_behaves_as_all_members() {
        let empty = PolicySet::default();
        assert!(empty.contains(CherryPolicy::AllMembers));
        assert_eq!(
            member_cherry_type(&member(vec![]), &empty, Owner::default()),
            PickStrength::Cherry
        );
    }

    #[test]
    fn test_is_cherry_type_per_policy() {
        let plain = type_with(TypeKind::Class, vec![]);
        let contract = type_with(
            TypeKind::Class,
            vec![marker(CherryPolicy::ContractOptIn, true, None)],
        );
        let legacy = type_with(
            TypeKind::Class,
            vec![marker(CherryPolicy::LegacyOptOut, true, None)],
        );

        let contract_only = set(&[CherryPolicy::ContractOptIn]);
        assert!(!is_cherry_type(&plain, &contract_only));
        assert!(is_cherry_type(&contract, &contract_only));

        let library_only = set(&[CherryPolicy::LibraryAnnotationOptIn]);
        assert!(!is_cherry_type(&contract, &library_only));

        let legacy_only = set(&[CherryPolicy::LegacyOptOut]);
        assert!(is_cherry_type(&legacy, &legacy_only));
        assert!(!is_cherry_type(&plain, &legacy_only));

        assert!(is_cherry_type(&plain, &set(&[CherryPolicy::FrameworkValidationOptOut])));
        assert!(is_cherry_type(&plain, &PolicySet::all_members()));
        // Any active policy is enough.
        assert!(is_cherry_type(
            &legacy,
            &set(&[CherryPolicy::ContractOptIn, CherryPolicy::LegacyOptOut])
        ));
    }

    #[test]
    fn test_contract_opt_in_member() {
        let policies = set(&[CherryPolicy::ContractOptIn]);
        let owner = Owner {
            is_contract_opt_in: true,
            is_enum: false,
        };
        assert_eq!(
            member_cherry_type(&member(vec![]), &policies, owner),
            PickStrength::None
        );
        assert_eq!(
            member_cherry_type(
                &member(vec![marker(CherryPolicy::ContractOptIn, true, None)]),
                &policies,
                owner
            ),
            PickStrength::Cherry
        );
        assert_eq!(
            member_cherry_type(
                &member(vec![marker(CherryPolicy::ContractOptIn, true, Some(true))]),
                &policies,
                owner
            ),
            PickStrength::BigCherry
        );
    }

    #[test]
    fn test_contract_type_short_circuits_other_policies() {
        let policies = set(&[CherryPolicy::ContractOptIn, CherryPolicy::AllMembers]);
        let contract_owner = Owner {
            is_contract_opt_in: true,
            is_enum: false,
        };
        // The contract verdict (None) wins even though AllMembers would pick it.
        assert_eq!(
            member_cherry_type(&member(vec![]), &policies, contract_owner),
            PickStrength::None
        );
        // Without a contract on the owner, the verdicts merge by maximum.
        assert_eq!(
            member_cherry_type(&member(vec![]), &policies, Owner::default()),
            PickStrength::Cherry
        );
    }

    #[test]
    fn test_enum_members_never_dropped_under_contract() {
        let policies = set(&[CherryPolicy::ContractOptIn]);
        for is_contract_opt_in in [true, false] {
            let owner = Owner {
                is_contract_opt_in,
                is_enum: true,
            };
            let excluded = member(vec![marker(CherryPolicy::ContractOptIn, false, None)]);
            assert_eq!(
                member_cherry_type(&excluded, &policies, owner),
                PickStrength::Cherry
            );
            assert_eq!(
                member_cherry_type(&member(vec![]), &policies, owner),
                PickStrength::Cherry
            );
        }
    }

    #[test]
    fn test_library_annotation_member() {
        let policies = set(&[CherryPolicy::LibraryAnnotationOptIn]);
        let owner = Owner::default();
        let ignored = member(vec![marker(CherryPolicy::LibraryAnnotationOptIn, false, None)]);
        let required = member(vec![marker(
            CherryPolicy::LibraryAnnotationOptIn,
            true,
            Some(true),
        )]);
        assert_eq!(member_cherry_type(&ignored, &policies, owner), PickStrength::None);
        assert_eq!(member_cherry_type(&required, &policies, owner), PickStrength::BigCherry);
        assert_eq!(
            member_cherry_type(&member(vec![]), &policies, owner),
            PickStrength::Cherry
        );
    }

    #[test]
    fn test_legacy_and_validation_members() {
        let owner = Owner::default();
        let legacy = set(&[CherryPolicy::LegacyOptOut]);
        let excluded = member(vec![marker(CherryPolicy::LegacyOptOut, false, None)]);
        assert_eq!(member_cherry_type(&excluded, &legacy, owner), PickStrength::None);
        let legacy_required = member(vec![marker(CherryPolicy::LegacyOptOut, true, Some(true))]);
        assert_eq!(
            member_cherry_type(&legacy_required, &legacy, owner),
            PickStrength::BigCherry
        );

        let validation = set(&[CherryPolicy::FrameworkValidationOptOut]);
        let validation_required = member(vec![marker(
            CherryPolicy::FrameworkValidationOptOut,
            true,
            Some(true),
        )]);
        assert_eq!(
            member_cherry_type(&member(vec![]), &validation, owner),
            PickStrength::Cherry
        );
        assert_eq!(
            member_cherry_type(&validation_required, &validation, owner),
            PickStrength::BigCherry
        );
    }

    #[test]
    fn test_merge_takes_maximum_across_policies() {
        let all = set(&[
            CherryPolicy::ContractOptIn,
            CherryPolicy::LibraryAnnotationOptIn,
            CherryPolicy::LegacyOptOut,
            CherryPolicy::FrameworkValidationOptOut,
        ]);
        let owner = Owner::default();

        // Every policy carries a marker; the strongest verdict wins.
        let cases = [
            (vec![false, false, false, false], PickStrength::Cherry),
            (vec![true, false, false, false], PickStrength::BigCherry),
            (vec![false, false, false, true], PickStrength::BigCherry),
        ];
        for (required, expected) in cases {
            let markers = [
                CherryPolicy::ContractOptIn,
                CherryPolicy::LibraryAnnotationOptIn,
                CherryPolicy::LegacyOptOut,
                CherryPolicy::FrameworkValidationOptOut,
            ]
            .into_iter()
            .zip(required)
            .map(|(policy, req)| marker(policy, true, Some(req)))
            .collect();
            assert_eq!(member_cherry_type(&member(markers), &all, owner), expected);
        }

        // Exclusion by one policy is overridden by inclusion from another.
        let conflicting = member(vec![
            marker(CherryPolicy::LibraryAnnotationOptIn, false, None),
            marker(CherryPolicy::LegacyOptOut, true, None),
        ]);
        let pair = set(&[CherryPolicy::LibraryAnnotationOptIn, CherryPolicy::LegacyOptOut]);
        assert_eq!(member_cherry_type(&conflicting, &pair, owner), PickStrength::Cherry);
    }

    #[test]
    fn test_field_custom_name_order() {
        let both = member(vec![
            renamed(CherryPolicy::LibraryAnnotationOptIn, "lib_name"),
            renamed(CherryPolicy::ContractOptIn, "contract_name"),
        ]);
        let policies = set(&[CherryPolicy::ContractOptIn, CherryPolicy::LibraryAnnotationOptIn]);
        assert_eq!(field_custom_name(&both, &policies), Some("contract_name"));

        let library_only = set(&[CherryPolicy::LibraryAnnotationOptIn]);
        assert_eq!(field_custom_name(&both, &library_only), Some("lib_name"));

        let empty_contract = member(vec![
            renamed(CherryPolicy::ContractOptIn, ""),
            renamed(CherryPolicy::LibraryAnnotationOptIn, "lib_name"),
        ]);
        assert_eq!(field_custom_name(&empty_contract, &policies), Some("lib_name"));

        assert_eq!(field_custom_name(&both, &PolicySet::all_members()), None);
    }
}
