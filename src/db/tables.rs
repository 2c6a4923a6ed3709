//! The value-table family of the EAV store
//!
//! One logical entity-attribute-value store is spread over five physically
//! typed tables per entity kind. The set is closed; the processing order is
//! fixed so reports are reproducible.

use crate::config::{Edition, EntityKind};

/// Payload type of one value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Varchar,
    Int,
    Decimal,
    Text,
    Datetime,
}

impl ValueKind {
    /// All payload kinds, in the order tables are scanned
    pub const ALL: [ValueKind; 5] = [
        ValueKind::Varchar,
        ValueKind::Int,
        ValueKind::Decimal,
        ValueKind::Text,
        ValueKind::Datetime,
    ];

    /// Table-name suffix for this payload kind
    pub fn suffix(&self) -> &'static str {
        match self {
            ValueKind::Varchar => "varchar",
            ValueKind::Int => "int",
            ValueKind::Decimal => "decimal",
            ValueKind::Text => "text",
            ValueKind::Datetime => "datetime",
        }
    }
}

/// One physical value table, with its edition-resolved identity column.
#[derive(Debug, Clone)]
pub struct ValueTable {
    /// Fully prefixed table name
    pub name: String,
    pub kind: ValueKind,
    /// Column identifying the owning entity (`entity_id` or `row_id`)
    pub identity_column: &'static str,
}

/// The ordered five value tables for an entity kind.
///
/// Resolved once at run start; nothing downstream branches on the edition
/// again.
pub fn value_tables(entity: EntityKind, edition: Edition, prefix: &str) -> Vec<ValueTable> {
    ValueKind::ALL
        .iter()
        .map(|kind| ValueTable {
            name: format!("{prefix}{}_entity_{}", entity.as_str(), kind.suffix()),
            kind: *kind,
            identity_column: edition.identity_column(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_tables_in_fixed_order() {
        let tables = value_tables(EntityKind::Product, Edition::Community, "");
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "product_entity_varchar",
                "product_entity_int",
                "product_entity_decimal",
                "product_entity_text",
                "product_entity_datetime",
            ]
        );
    }

    #[test]
    fn entity_kind_selects_table_family() {
        let tables = value_tables(EntityKind::Category, Edition::Community, "");
        assert!(tables.iter().all(|t| t.name.starts_with("category_entity_")));
    }

    #[test]
    fn prefix_is_applied() {
        let tables = value_tables(EntityKind::Product, Edition::Community, "shop1_");
        assert_eq!(tables[0].name, "shop1_product_entity_varchar");
    }

    #[test]
    fn edition_resolves_identity_column() {
        let community = value_tables(EntityKind::Product, Edition::Community, "");
        assert!(community.iter().all(|t| t.identity_column == "entity_id"));

        let enterprise = value_tables(EntityKind::Product, Edition::Enterprise, "");
        assert!(enterprise.iter().all(|t| t.identity_column == "row_id"));
    }
}
