//! User types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ProductId, TypesError};

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from a string
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypesError::InvalidId(s.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// User role for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper
    #[default]
    Customer,
    /// Store administrator
    Admin,
}

impl Role {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(TypesError::InvalidRole(other.to_string())),
        }
    }
}

/// A product reference in a user's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartItem {
    /// A fresh cart line with quantity 1
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: 1,
        }
    }
}

/// A single edit to a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// Add one unit, appending a new line if the product is not there yet
    Add(ProductId),
    /// Drop one line, or empty the cart when no product is named
    Remove(Option<ProductId>),
    /// Set a line's quantity; zero removes the line
    SetQuantity(ProductId, u32),
}

impl CartChange {
    /// Apply the change to `items`.
    ///
    /// Returns `false` (leaving `items` untouched) when a quantity update
    /// names a product that is not in the cart.
    pub fn apply(self, items: &mut Vec<CartItem>) -> bool {
        match self {
            Self::Add(product_id) => {
                match items.iter_mut().find(|item| item.product_id == product_id) {
                    Some(item) => item.quantity = item.quantity.saturating_add(1),
                    None => items.push(CartItem::new(product_id)),
                }
            }
            Self::Remove(Some(product_id)) => items.retain(|item| item.product_id != product_id),
            Self::Remove(None) => items.clear(),
            Self::SetQuantity(product_id, quantity) => {
                let Some(position) = items.iter().position(|item| item.product_id == product_id)
                else {
                    return false;
                };
                if quantity == 0 {
                    items.remove(position);
                } else {
                    items[position].quantity = quantity;
                }
            }
        }
        true
    }
}

/// User fields safe to hand to clients and downstream handlers.
///
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
}

impl PublicUser {
    /// Check if the user has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Find the cart line for a product
    pub fn cart_item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.cart_items.iter().find(|item| item.product_id == product_id)
    }
}
