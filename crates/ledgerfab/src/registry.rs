//! Typed reference identifiers and the in-memory reference registry.
//!
//! Every reference row carries an identifier newtype bound to its
//! [`ReferenceTable`]. Transaction and derived rows expose the identifiers
//! they point at through [`ForeignKeys`], and the registry confirms each one
//! resolves before a dataset is handed to a sink.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{FabricError, FabricResult};
use crate::models::TableRow;

/// Reference tables that transaction rows may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceTable {
    /// Legal entities.
    Company,
    /// General ledger accounts.
    GlAccount,
    /// Cost centers.
    CostCenter,
    /// Profit centers.
    ProfitCenter,
    /// Plants.
    Plant,
    /// Materials.
    Material,
    /// Customers.
    Customer,
    /// Vendors.
    Vendor,
    /// Employees.
    Employee,
    /// Fixed assets.
    Asset,
    /// Work centers.
    WorkCenter,
}

impl ReferenceTable {
    /// All reference tables.
    pub const ALL: [ReferenceTable; 11] = [
        ReferenceTable::Company,
        ReferenceTable::GlAccount,
        ReferenceTable::CostCenter,
        ReferenceTable::ProfitCenter,
        ReferenceTable::Plant,
        ReferenceTable::Material,
        ReferenceTable::Customer,
        ReferenceTable::Vendor,
        ReferenceTable::Employee,
        ReferenceTable::Asset,
        ReferenceTable::WorkCenter,
    ];

    /// Output table name of this reference table.
    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceTable::Company => "dim_company_codes",
            ReferenceTable::GlAccount => "dim_gl_accounts",
            ReferenceTable::CostCenter => "dim_cost_centers",
            ReferenceTable::ProfitCenter => "dim_profit_centers",
            ReferenceTable::Plant => "dim_plants",
            ReferenceTable::Material => "dim_materials",
            ReferenceTable::Customer => "dim_customers",
            ReferenceTable::Vendor => "dim_vendors",
            ReferenceTable::Employee => "dim_employees",
            ReferenceTable::Asset => "dim_assets",
            ReferenceTable::WorkCenter => "dim_work_centers",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// An identifier that belongs to one reference table.
pub trait ReferenceId {
    /// Table the identifier resolves against.
    const TABLE: ReferenceTable;

    /// Raw identifier value.
    fn key(&self) -> &str;
}

macro_rules! reference_id {
    ($(#[$meta:meta])* $name:ident => $table:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Raw identifier value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ReferenceId for $name {
            const TABLE: ReferenceTable = $table;

            fn key(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

reference_id!(
    /// Company code, e.g. `CO01`.
    CompanyCode => ReferenceTable::Company
);
reference_id!(
    /// General ledger account number.
    GlAccountId => ReferenceTable::GlAccount
);
reference_id!(
    /// Cost center, e.g. `CC0001`.
    CostCenterId => ReferenceTable::CostCenter
);
reference_id!(
    /// Profit center, e.g. `PC001`.
    ProfitCenterId => ReferenceTable::ProfitCenter
);
reference_id!(
    /// Plant, e.g. `PL01`.
    PlantId => ReferenceTable::Plant
);
reference_id!(
    /// Material number.
    MaterialId => ReferenceTable::Material
);
reference_id!(
    /// Customer number.
    CustomerId => ReferenceTable::Customer
);
reference_id!(
    /// Vendor number.
    VendorId => ReferenceTable::Vendor
);
reference_id!(
    /// Employee number.
    EmployeeId => ReferenceTable::Employee
);
reference_id!(
    /// Fixed asset number.
    AssetNumber => ReferenceTable::Asset
);
reference_id!(
    /// Work center, e.g. `PL01_WC001`.
    WorkCenterId => ReferenceTable::WorkCenter
);

/// A single foreign key held by a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey<'a> {
    /// Table the key resolves against.
    pub table: ReferenceTable,
    /// Raw key.
    pub key: &'a str,
}

impl<'a> ForeignKey<'a> {
    /// Build a foreign key from a typed identifier.
    pub fn of<T: ReferenceId>(id: &'a T) -> Self {
        Self {
            table: T::TABLE,
            key: id.key(),
        }
    }
}

/// Rows that reference other tables.
pub trait ForeignKeys: TableRow {
    /// Every foreign key the row holds. Optional references that are unset
    /// are omitted.
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>>;
}

/// Set of known identifiers per reference table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    keys: HashMap<ReferenceTable, HashSet<String>>,
}

impl ReferenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the identifiers of one table, rejecting duplicates.
    pub fn register<'a, T, I>(&mut self, ids: I) -> FabricResult<()>
    where
        T: ReferenceId + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let set = self.keys.entry(T::TABLE).or_default();
        for id in ids {
            if !set.insert(id.key().to_string()) {
                return Err(FabricError::DuplicateIdentifier {
                    table: T::TABLE,
                    key: id.key().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether a key resolves.
    pub fn contains(&self, table: ReferenceTable, key: &str) -> bool {
        self.keys.get(&table).is_some_and(|set| set.contains(key))
    }

    /// Number of registered identifiers for a table.
    pub fn len(&self, table: ReferenceTable) -> usize {
        self.keys.get(&table).map_or(0, HashSet::len)
    }

    /// Whether no identifiers are registered at all.
    pub fn is_empty(&self) -> bool {
        self.keys.values().all(HashSet::is_empty)
    }

    /// Confirm every foreign key of a row resolves.
    pub fn resolve<R: ForeignKeys>(&self, row: &R) -> FabricResult<()> {
        for fk in row.foreign_keys() {
            if !self.contains(fk.table, fk.key) {
                return Err(FabricError::UnresolvedReference {
                    table: fk.table,
                    key: fk.key.to_string(),
                    referenced_by: R::TABLE,
                });
            }
        }
        Ok(())
    }

    /// Confirm every row of a table resolves.
    pub fn resolve_all<R: ForeignKeys>(&self, rows: &[R]) -> FabricResult<()> {
        rows.iter().try_for_each(|row| self.resolve(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Line {
        customer: CustomerId,
        vendor: Option<VendorId>,
    }

    impl TableRow for Line {
        const TABLE: &'static str = "test_lines";
    }

    impl ForeignKeys for Line {
        fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
            let mut keys = vec![ForeignKey::of(&self.customer)];
            keys.extend(self.vendor.as_ref().map(ForeignKey::of));
            keys
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let customers = vec![CustomerId::new("CUST000001"), CustomerId::new("CUST000002")];
        let mut registry = ReferenceRegistry::new();
        registry.register(&customers).unwrap();

        assert_eq!(registry.len(ReferenceTable::Customer), 2);
        assert!(registry.contains(ReferenceTable::Customer, "CUST000002"));
        assert!(!registry.contains(ReferenceTable::Vendor, "CUST000002"));

        let ok = Line {
            customer: CustomerId::new("CUST000001"),
            vendor: None,
        };
        assert!(registry.resolve(&ok).is_ok());
    }

    #[test]
    fn test_unresolved_reference_is_reported() {
        let mut registry = ReferenceRegistry::new();
        registry.register(&[CustomerId::new("CUST000001")]).unwrap();

        let bad = Line {
            customer: CustomerId::new("CUST000001"),
            vendor: Some(VendorId::new("VEND00009")),
        };
        match registry.resolve(&bad) {
            Err(FabricError::UnresolvedReference {
                table,
                key,
                referenced_by,
            }) => {
                assert_eq!(table, ReferenceTable::Vendor);
                assert_eq!(key, "VEND00009");
                assert_eq!(referenced_by, "test_lines");
            }
            other => panic!("expected unresolved reference, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_identifiers_rejected() {
        let mut registry = ReferenceRegistry::new();
        let ids = [MaterialId::new("MAT000001"), MaterialId::new("MAT000001")];
        assert!(matches!(
            registry.register(&ids),
            Err(FabricError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn test_identifier_serializes_transparently() {
        let id = PlantId::new("PL01");
        assert_eq!(id.to_string(), "PL01");
        assert_eq!(id.as_str(), "PL01");
        assert_eq!(<PlantId as ReferenceId>::TABLE, ReferenceTable::Plant);
    }
}
