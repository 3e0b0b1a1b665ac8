//! User model and related functionality
//!
//! A user owns an embedded, ordered list of addresses. At most one address
//! carries the default flag at any time; every mutation that promotes an
//! address demotes all of its siblings first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub phone: Option<String>,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Embedded address record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// New address payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Address update payload
///
/// Text fields use replace-if-provided semantics; `is_default` replaces
/// unconditionally when present, including an explicit `false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Admin user update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    pub is_blocked: Option<bool>,
}

/// Response for login and registration: the public user projection plus
/// a freshly signed token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub addresses: Vec<Address>,
    pub token: String,
}

/// Profile projection; carries a refreshed token after a profile update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub phone: Option<String>,
    pub addresses: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Admin-facing user projection (no password hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub phone: Option<String>,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<i64>,
}

impl UserSummary {
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            is_blocked: user.is_blocked,
            phone: user.phone,
            addresses: user.addresses,
            created_at: user.created_at,
            total_orders: None,
        }
    }
}

/// Clear the default flag on every address in the list
pub fn demote_defaults(addresses: &mut [Address]) {
    for address in addresses.iter_mut() {
        address.is_default = false;
    }
}

/// Append a new address, demoting siblings first when the incoming record
/// is flagged as default. Returns the id assigned to the new address.
pub fn push_address(addresses: &mut Vec<Address>, input: AddressInput) -> Uuid {
    if input.is_default {
        demote_defaults(addresses);
    }

    let id = Uuid::new_v4();
    addresses.push(Address {
        id,
        street: input.street,
        city: input.city,
        state: input.state,
        postal_code: input.postal_code,
        country: input.country,
        is_default: input.is_default,
    });
    id
}

/// Apply a patch to the address with the given id. Returns false when no
/// address matches.
pub fn patch_address(addresses: &mut [Address], id: Uuid, patch: AddressPatch) -> bool {
    if !addresses.iter().any(|a| a.id == id) {
        return false;
    }

    if patch.is_default == Some(true) {
        demote_defaults(addresses);
    }

    for address in addresses.iter_mut() {
        if address.id != id {
            continue;
        }
        super::merge_field(&mut address.street, patch.street);
        super::merge_field(&mut address.city, patch.city);
        super::merge_field(&mut address.state, patch.state);
        super::merge_field(&mut address.postal_code, patch.postal_code);
        super::merge_field(&mut address.country, patch.country);
        if let Some(is_default) = patch.is_default {
            address.is_default = is_default;
        }
        break;
    }
    true
}

/// Remove the address with the given id. Removing an absent id is a no-op.
pub fn remove_address(addresses: &mut Vec<Address>, id: Uuid) {
    addresses.retain(|a| a.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(street: &str, is_default: bool) -> AddressInput {
        AddressInput {
            street: street.to_string(),
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            postal_code: "500001".to_string(),
            country: "India".to_string(),
            is_default,
        }
    }

    fn default_count(addresses: &[Address]) -> usize {
        addresses.iter().filter(|a| a.is_default).count()
    }

    #[test]
    fn test_push_default_address_demotes_siblings() {
        let mut addresses = Vec::new();
        push_address(&mut addresses, input("1 Main", true));
        push_address(&mut addresses, input("2 Main", true));

        assert_eq!(addresses.len(), 2);
        assert_eq!(default_count(&addresses), 1);
        let default = addresses.iter().find(|a| a.is_default).unwrap();
        assert_eq!(default.street, "2 Main");
    }

    #[test]
    fn test_push_non_default_keeps_existing_default() {
        let mut addresses = Vec::new();
        push_address(&mut addresses, input("1 Main", true));
        push_address(&mut addresses, input("2 Main", false));

        assert_eq!(default_count(&addresses), 1);
        assert!(addresses[0].is_default);
    }

    #[test]
    fn test_patch_promotes_and_demotes() {
        let mut addresses = Vec::new();
        push_address(&mut addresses, input("1 Main", true));
        let second = push_address(&mut addresses, input("2 Main", false));

        let patched = patch_address(
            &mut addresses,
            second,
            AddressPatch {
                is_default: Some(true),
                ..Default::default()
            },
        );

        assert!(patched);
        assert_eq!(default_count(&addresses), 1);
        assert!(addresses[1].is_default);
    }

    #[test]
    fn test_patch_explicit_false_is_applied() {
        let mut addresses = Vec::new();
        let first = push_address(&mut addresses, input("1 Main", true));

        patch_address(
            &mut addresses,
            first,
            AddressPatch {
                is_default: Some(false),
                ..Default::default()
            },
        );

        assert_eq!(default_count(&addresses), 0);
    }

    #[test]
    fn test_patch_replaces_only_non_empty_fields() {
        let mut addresses = Vec::new();
        let id = push_address(&mut addresses, input("1 Main", true));

        patch_address(
            &mut addresses,
            id,
            AddressPatch {
                street: Some("7 Park".to_string()),
                city: Some(String::new()),
                ..Default::default()
            },
        );

        assert_eq!(addresses[0].street, "7 Park");
        assert_eq!(addresses[0].city, "Hyderabad");
        assert!(addresses[0].is_default);
    }

    #[test]
    fn test_patch_unknown_id_reports_not_found() {
        let mut addresses = Vec::new();
        push_address(&mut addresses, input("1 Main", false));

        let patched = patch_address(&mut addresses, Uuid::new_v4(), AddressPatch::default());
        assert!(!patched);
    }

    #[test]
    fn test_remove_address_is_idempotent() {
        let mut addresses = Vec::new();
        let id = push_address(&mut addresses, input("1 Main", false));

        remove_address(&mut addresses, id);
        assert!(addresses.is_empty());

        // Removing again is a no-op
        remove_address(&mut addresses, id);
        assert!(addresses.is_empty());
    }

    #[test]
    fn test_address_serializes_camel_case() {
        let mut addresses = Vec::new();
        push_address(&mut addresses, input("1 Main", true));

        let json = serde_json::to_value(&addresses[0]).unwrap();
        assert_eq!(json["street"], "1 Main");
        assert_eq!(json["postalCode"], "500001");
        assert_eq!(json["isDefault"], true);
    }
}
