//! API service models

pub mod order;
pub mod product;
pub mod user;

// Re-export for convenience
pub use order::{
    CreateOrderRequest, DashboardSummary, MonthlyRevenue, Order, OrderItem, OrderUser,
    ShippingAddress, UpdateOrderStatusRequest,
};
pub use product::{Category, Product, UpdateProductRequest};
pub use user::{
    Address, AddressInput, AddressPatch, AdminUpdateUserRequest, AuthResponse, LoginRequest,
    ProfileResponse, RegisterRequest, UpdateProfileRequest, User, UserSummary,
};

/// Replace `dst` with `src` when the incoming value is present and non-empty.
///
/// This is the partial-update rule for profile and catalog edits: an absent
/// or empty field leaves the stored value untouched.
pub fn merge_field(dst: &mut String, src: Option<String>) {
    if let Some(value) = src {
        if !value.is_empty() {
            *dst = value;
        }
    }
}

/// Same rule for optional columns.
pub fn merge_optional_field(dst: &mut Option<String>, src: Option<String>) {
    if let Some(value) = src {
        if !value.is_empty() {
            *dst = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_field_replaces_non_empty() {
        let mut dst = "old".to_string();
        merge_field(&mut dst, Some("new".to_string()));
        assert_eq!(dst, "new");
    }

    #[test]
    fn test_merge_field_keeps_old_on_empty_or_absent() {
        let mut dst = "old".to_string();
        merge_field(&mut dst, Some(String::new()));
        assert_eq!(dst, "old");

        merge_field(&mut dst, None);
        assert_eq!(dst, "old");
    }

    #[test]
    fn test_merge_optional_field() {
        let mut dst = None;
        merge_optional_field(&mut dst, Some("9999999999".to_string()));
        assert_eq!(dst.as_deref(), Some("9999999999"));

        merge_optional_field(&mut dst, Some(String::new()));
        assert_eq!(dst.as_deref(), Some("9999999999"));
    }
}
