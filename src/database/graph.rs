//! Declarative model of the entity hierarchy.
//!
//! Every entity declares its fields and the parent references it holds.
//! Child relations are never declared; they are computed by inverting the
//! parent declarations of every other entity so the two views cannot drift.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{RulesConfig, TaxIdScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Principal,
    Contractor,
    Union,
    Negotiation,
    Monitoring,
    Role,
    Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Date,
    Decimal,
}

impl FieldKind {
    /// Postgres cast applied to bound parameters of this kind
    pub fn sql_cast(&self) -> &'static str {
        match self {
            FieldKind::Integer => "bigint",
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Decimal => "numeric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

const fn field(name: &'static str, kind: FieldKind, required: bool, max_len: Option<usize>) -> FieldDef {
    FieldDef { name, kind, required, min_len: None, max_len }
}

/// A foreign key: `field` on `entity` holds the id of some other record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub entity: Entity,
    pub field: &'static str,
}

/// Parent reference declared on an entity, pointing at `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub field: &'static str,
    pub target: Entity,
}

/// Uniqueness rule: the trimmed `fields` must be unique among records sharing the `scope` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueRule {
    pub fields: &'static [&'static str],
    pub scope: &'static [&'static str],
}

impl UniqueRule {
    /// Every field that participates in the lookup
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scope.iter().chain(self.fields.iter()).copied()
    }
}

use FieldKind::*;

const PRINCIPAL_FIELDS: &[FieldDef] = &[field("name", Text, true, Some(100))];

const CONTRACTOR_FIELDS: &[FieldDef] = &[
    field("principal_id", Integer, true, None),
    field("name", Text, true, Some(100)),
    field("tax_id", Text, true, Some(100)),
];

const UNION_FIELDS: &[FieldDef] = &[
    field("name", Text, true, Some(100)),
    field("federation", Text, false, Some(100)),
    field("union_type", Text, false, Some(50)),
];

const NEGOTIATION_FIELDS: &[FieldDef] = &[
    field("contractor_id", Integer, true, None),
    field("union_id", Integer, true, None),
    field("contract_label", Text, true, Some(100)),
    field("status", Text, false, Some(50)),
    field("start_date", Date, false, None),
    field("end_date", Date, false, None),
    field("commercial_contract_expiry", Date, false, None),
    field("total_headcount", Integer, false, None),
    field("unionized_headcount", Integer, false, None),
    field("unionized_percentage", Decimal, false, None),
];

const MONITORING_FIELDS: &[FieldDef] = &[
    field("negotiation_id", Integer, true, None),
    field("start_date", Date, false, None),
    field("comments", Text, false, None),
];

const ROLE_FIELDS: &[FieldDef] = &[FieldDef {
    min_len: Some(3),
    ..field("name", Text, true, Some(100))
}];

const ACCOUNT_FIELDS: &[FieldDef] = &[
    field("first_name", Text, true, Some(100)),
    field("last_name", Text, true, Some(100)),
    field("email", Text, true, Some(150)),
    field("username", Text, true, Some(50)),
    field("role_id", Integer, false, None),
];

impl Entity {
    pub const ALL: [Entity; 7] = [
        Entity::Principal,
        Entity::Contractor,
        Entity::Union,
        Entity::Negotiation,
        Entity::Monitoring,
        Entity::Role,
        Entity::Account,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Entity::Principal => "principals",
            Entity::Contractor => "contractors",
            Entity::Union => "unions",
            Entity::Negotiation => "negotiations",
            Entity::Monitoring => "monitoring_records",
            Entity::Role => "roles",
            Entity::Account => "accounts",
        }
    }

    /// Path segment used by the HTTP routes
    pub fn segment(&self) -> &'static str {
        match self {
            Entity::Monitoring => "monitoring-records",
            other => other.table(),
        }
    }

    pub fn from_segment(segment: &str) -> Option<Entity> {
        Entity::ALL.into_iter().find(|e| e.segment() == segment)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Entity::Principal => "principal",
            Entity::Contractor => "contractor",
            Entity::Union => "union",
            Entity::Negotiation => "negotiation",
            Entity::Monitoring => "monitoring record",
            Entity::Role => "role",
            Entity::Account => "account",
        }
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            Entity::Principal => PRINCIPAL_FIELDS,
            Entity::Contractor => CONTRACTOR_FIELDS,
            Entity::Union => UNION_FIELDS,
            Entity::Negotiation => NEGOTIATION_FIELDS,
            Entity::Monitoring => MONITORING_FIELDS,
            Entity::Role => ROLE_FIELDS,
            Entity::Account => ACCOUNT_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn parents(&self) -> &'static [ParentRef] {
        match self {
            Entity::Principal | Entity::Union | Entity::Role => &[],
            Entity::Contractor => &[ParentRef { field: "principal_id", target: Entity::Principal }],
            Entity::Negotiation => &[
                ParentRef { field: "contractor_id", target: Entity::Contractor },
                ParentRef { field: "union_id", target: Entity::Union },
            ],
            Entity::Monitoring => &[ParentRef { field: "negotiation_id", target: Entity::Negotiation }],
            Entity::Account => &[ParentRef { field: "role_id", target: Entity::Role }],
        }
    }

    /// Relations whose records point at this entity
    pub fn children(&self) -> Vec<Relation> {
        Entity::ALL
            .into_iter()
            .flat_map(|child| {
                child
                    .parents()
                    .iter()
                    .filter(move |p| p.target == *self)
                    .map(move |p| Relation { entity: child, field: p.field })
            })
            .collect()
    }

    /// Accounts are managed by the identity system and only exposed read/delete here.
    pub fn is_writable(&self) -> bool {
        !matches!(self, Entity::Account)
    }

    pub fn unique_rules(&self, rules: &RulesConfig) -> Vec<UniqueRule> {
        match self {
            Entity::Contractor => {
                let tax_id_scope: &'static [&'static str] = match rules.tax_id_scope {
                    TaxIdScope::Principal => &["principal_id"],
                    TaxIdScope::Global => &[],
                };
                vec![
                    UniqueRule { fields: &["name"], scope: &["principal_id"] },
                    UniqueRule { fields: &["tax_id"], scope: tax_id_scope },
                ]
            }
            Entity::Negotiation => vec![UniqueRule {
                fields: &["contract_label"],
                scope: &["contractor_id", "union_id"],
            }],
            Entity::Role => vec![UniqueRule { fields: &["name"], scope: &[] }],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_are_inverse_of_parents() {
        let principal_children = Entity::Principal.children();
        assert_eq!(principal_children, vec![Relation { entity: Entity::Contractor, field: "principal_id" }]);

        let union_children = Entity::Union.children();
        assert_eq!(union_children, vec![Relation { entity: Entity::Negotiation, field: "union_id" }]);

        assert_eq!(
            Entity::Negotiation.children(),
            vec![Relation { entity: Entity::Monitoring, field: "negotiation_id" }]
        );
        assert_eq!(Entity::Role.children(), vec![Relation { entity: Entity::Account, field: "role_id" }]);
        assert!(Entity::Monitoring.children().is_empty());
        assert!(Entity::Account.children().is_empty());
    }

    #[test]
    fn every_parent_field_is_a_declared_integer_field() {
        for entity in Entity::ALL {
            for parent in entity.parents() {
                let def = entity.field(parent.field).expect("parent field declared");
                assert_eq!(def.kind, FieldKind::Integer);
            }
        }
    }

    #[test]
    fn segments_round_trip() {
        for entity in Entity::ALL {
            assert_eq!(Entity::from_segment(entity.segment()), Some(entity));
        }
        assert_eq!(Entity::from_segment("monitoring-records"), Some(Entity::Monitoring));
        assert_eq!(Entity::from_segment("employees"), None);
    }

    #[test]
    fn contractor_tax_id_scope_follows_config() {
        let scoped = Entity::Contractor.unique_rules(&RulesConfig::default());
        assert_eq!(scoped[1].scope, &["principal_id"]);

        let global = Entity::Contractor.unique_rules(&RulesConfig { tax_id_scope: TaxIdScope::Global });
        assert!(global[1].scope.is_empty());
        assert_eq!(global[0].scope, &["principal_id"]);
    }
}
