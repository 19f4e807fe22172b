//! Catalog products.
//!
//! Products are read-only from the storefront's point of view; new ones are
//! only created through the admin surface via [`NewProduct`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::id::ProductId;
use super::price::Price;

/// Sizes offered by products created from the admin form.
pub const DEFAULT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];

/// Units stocked per size for products created from the admin form.
pub const DEFAULT_STOCK_PER_SIZE: u32 = 10;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Price>,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stock_by_size: BTreeMap<String, u32>,
}

impl Product {
    /// Units in stock for a size (0 for unknown sizes).
    #[must_use]
    pub fn stock_for(&self, size: &str) -> u32 {
        self.stock_by_size.get(size).copied().unwrap_or(0)
    }

    /// Total units in stock across all sizes.
    #[must_use]
    pub fn total_stock(&self) -> u32 {
        self.stock_by_size.values().sum()
    }

    /// Whether the product has a struck-through "compare at" price above its
    /// current price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price.is_some_and(|compare| compare > self.price)
    }

    /// The first image, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Build a cart line for this product in the given size.
    ///
    /// Returns `None` if the product is not offered in `size` or `quantity`
    /// is zero.
    #[must_use]
    pub fn to_cart_item(&self, size: &str, quantity: u32) -> Option<CartItem> {
        if quantity == 0 || !self.sizes.iter().any(|s| s == size) {
            return None;
        }
        Some(CartItem {
            product_id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.primary_image().unwrap_or_default().to_string(),
            size: size.to_string(),
            quantity,
        })
    }
}

/// A product before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Price>,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stock_by_size: BTreeMap<String, u32>,
}

impl NewProduct {
    /// Build a product the way the admin "add product" form does: the slug
    /// is derived from the name, sizes `S`..`XL` are each stocked with 10
    /// units, and the product is featured.
    #[must_use]
    pub fn from_admin_form(
        name: &str,
        price: Price,
        category: &str,
        description: &str,
        image_url: String,
    ) -> Self {
        let sizes: Vec<String> = DEFAULT_SIZES.iter().map(ToString::to_string).collect();
        let stock_by_size = sizes
            .iter()
            .map(|size| (size.clone(), DEFAULT_STOCK_PER_SIZE))
            .collect();

        Self {
            name: name.to_string(),
            slug: slugify(name),
            description: description.to_string(),
            price,
            compare_at_price: None,
            category: category.to_string(),
            images: vec![image_url],
            sizes,
            featured: true,
            stock_by_size,
        }
    }

    /// Attach an id, producing a full catalog entry.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            compare_at_price: self.compare_at_price,
            category: self.category,
            images: self.images,
            sizes: self.sizes,
            featured: self.featured,
            stock_by_size: self.stock_by_size,
        }
    }
}

/// Derive a URL slug: lowercase, with each space replaced by `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Shop page filters.
///
/// Every bound is optional and inclusive; `category` matches the product's
/// category name exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<Price>,
    #[serde(default)]
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Whether a product passes every set filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);
        let min_match = self.min_price.is_none_or(|min| product.price >= min);
        let max_match = self.max_price.is_none_or(|max| product.price <= max);
        category_match && min_match && max_match
    }

    /// Keep the products that pass, preserving order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee() -> Product {
        NewProduct::from_admin_form(
            "Classic White Tee",
            Price::from_cents(2999),
            "T-Shirts",
            "Premium cotton",
            "https://img/1.jpg".to_string(),
        )
        .with_id(ProductId::new("1"))
    }

    #[test]
    fn test_admin_form_defaults() {
        let product = tee();
        assert_eq!(product.slug, "classic-white-tee");
        assert_eq!(product.sizes, vec!["S", "M", "L", "XL"]);
        assert_eq!(product.stock_for("M"), 10);
        assert_eq!(product.total_stock(), 40);
        assert!(product.featured);
    }

    #[test]
    fn test_to_cart_item_requires_offered_size() {
        let product = tee();
        let item = product.to_cart_item("L", 2).unwrap();
        assert_eq!(item.product_id, product.id);
        assert_eq!(item.image, "https://img/1.jpg");
        assert_eq!(item.quantity, 2);

        assert!(product.to_cart_item("XXL", 1).is_none());
        assert!(product.to_cart_item("L", 0).is_none());
    }

    #[test]
    fn test_on_sale() {
        let mut product = tee();
        assert!(!product.is_on_sale());
        product.compare_at_price = Some(Price::from_cents(3999));
        assert!(product.is_on_sale());
    }

    #[test]
    fn test_filter_category_and_price() {
        let mut hoodie = tee();
        hoodie.category = "Hoodies".to_string();
        hoodie.price = Price::from_cents(5999);

        let filter = ProductFilter {
            category: Some("Hoodies".to_string()),
            max_price: Some(Price::from_cents(6000)),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&hoodie));
        assert!(!filter.matches(&tee()));

        let cheap = ProductFilter {
            max_price: Some(Price::from_cents(5999)),
            ..ProductFilter::default()
        };
        assert!(cheap.matches(&hoodie), "max bound is inclusive");
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let json = serde_json::to_value(tee()).unwrap();
        assert_eq!(json["stockBySize"]["S"], 10);
        assert_eq!(json["price"], 29.99);
        assert!(json.get("compareAtPrice").is_none());
    }
}
