//! Product model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Catalog category, a fixed enumerated set stored as text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Powders,
    Masalas,
    Blends,
    #[serde(rename = "Whole Spices")]
    WholeSpices,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Powders => "Powders",
            Category::Masalas => "Masalas",
            Category::Blends => "Blends",
            Category::WholeSpices => "Whole Spices",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Powders" => Ok(Category::Powders),
            "Masalas" => Ok(Category::Masalas),
            "Blends" => Ok(Category::Blends),
            "Whole Spices" => Ok(Category::WholeSpices),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub count_in_stock: i32,
    pub description: String,
    pub image: String,
    pub brand: String,
    pub weight: Option<String>,
    pub ingredients: Option<String>,
    pub usage_tips: Option<String>,
    pub is_best_seller: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product update payload; fields use replace-if-provided semantics
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub count_in_stock: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub weight: Option<String>,
    pub ingredients: Option<String>,
    pub usage_tips: Option<String>,
    pub is_best_seller: Option<bool>,
}

impl Product {
    /// Apply an update payload to this product
    pub fn apply_update(&mut self, update: UpdateProductRequest) {
        super::merge_field(&mut self.name, update.name);
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(count_in_stock) = update.count_in_stock {
            self.count_in_stock = count_in_stock;
        }
        super::merge_field(&mut self.description, update.description);
        super::merge_field(&mut self.image, update.image);
        super::merge_field(&mut self.brand, update.brand);
        super::merge_optional_field(&mut self.weight, update.weight);
        super::merge_optional_field(&mut self.ingredients, update.ingredients);
        super::merge_optional_field(&mut self.usage_tips, update.usage_tips);
        if let Some(is_best_seller) = update.is_best_seller {
            self.is_best_seller = is_best_seller;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Sample name".to_string(),
            category: Category::default(),
            price: 0.0,
            count_in_stock: 0,
            description: "Sample description".to_string(),
            image: "/images/sample.jpg".to_string(),
            brand: "Sample brand".to_string(),
            weight: None,
            ingredients: None,
            usage_tips: None,
            is_best_seller: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_round_trip() {
        for name in ["Powders", "Masalas", "Blends", "Whole Spices"] {
            let category: Category = name.parse().unwrap();
            assert_eq!(category.to_string(), name);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert!("Sauces".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::WholeSpices).unwrap();
        assert_eq!(json, "\"Whole Spices\"");

        let parsed: Category = serde_json::from_str("\"Masalas\"").unwrap();
        assert_eq!(parsed, Category::Masalas);
    }

    #[test]
    fn test_apply_update_fills_stub() {
        let mut product = sample_product();
        product.apply_update(UpdateProductRequest {
            name: Some("Chilli".to_string()),
            price: Some(100.0),
            count_in_stock: Some(5),
            ..Default::default()
        });

        assert_eq!(product.name, "Chilli");
        assert_eq!(product.price, 100.0);
        assert_eq!(product.count_in_stock, 5);
        // Untouched fields keep their stub values
        assert_eq!(product.brand, "Sample brand");
    }

    #[test]
    fn test_apply_update_ignores_empty_strings() {
        let mut product = sample_product();
        product.apply_update(UpdateProductRequest {
            name: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(product.name, "Sample name");
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert!(json.get("countInStock").is_some());
        assert!(json.get("isBestSeller").is_some());
        assert!(json.get("usageTips").is_some());
    }
}
