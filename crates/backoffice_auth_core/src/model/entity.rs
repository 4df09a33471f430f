//! Back-office entity kinds guarded by the authorization layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customer,
    Employee,
    Vehicle,
    Sale,
    Warehouse,
    Supplier,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Self::Customer,
        Self::Employee,
        Self::Vehicle,
        Self::Sale,
        Self::Warehouse,
        Self::Supplier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Employee => "employee",
            Self::Vehicle => "vehicle",
            Self::Sale => "sale",
            Self::Warehouse => "warehouse",
            Self::Supplier => "supplier",
        }
    }

    /// List page the transport redirects to after a denied action.
    pub fn list_path(self) -> &'static str {
        match self {
            Self::Customer => "/customers",
            Self::Employee => "/employees",
            Self::Vehicle => "/vehicles",
            Self::Sale => "/sales",
            Self::Warehouse => "/warehouses",
            Self::Supplier => "/suppliers",
        }
    }
}
