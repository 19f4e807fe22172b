//! Built-in sample records served when the hosted backend is unavailable.
//!
//! These are returned verbatim by the fallback tier, so their contents are
//! part of observable behaviour: the shop always has something to show.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use zoco_core::{
    Category, CategoryId, Hero, Order, OrderId, OrderStatus, Price, Product, ProductId,
    SiteContent,
};

static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    vec![
        category("1", "T-Shirts", "t-shirts", 1, "Premium cotton basics"),
        category("2", "Hoodies", "hoodies", 2, "Cozy fleece comfort"),
        category("3", "Jeans", "jeans", 3, "Timeless denim cuts"),
        category("4", "Accessories", "accessories", 4, "The perfect details"),
    ]
});

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        Product {
            compare_at_price: Some(Price::from_cents(3999)),
            ..product(
                ("1", "Classic White T-Shirt", "classic-white-tshirt"),
                "A timeless white t-shirt made from premium cotton. Perfect for everyday wear.",
                2999,
                "T-Shirts",
                &[10, 11],
                &[("S", 10), ("M", 15), ("L", 20), ("XL", 12)],
                true,
            )
        },
        product(
            ("2", "Black Hoodie", "black-hoodie"),
            "Cozy black hoodie with soft fleece lining. Ideal for chilly days.",
            5999,
            "Hoodies",
            &[12, 13],
            &[("M", 8), ("L", 12), ("XL", 10), ("XXL", 5)],
            true,
        ),
        product(
            ("3", "Vintage Wash Jeans", "vintage-wash-jeans"),
            "Classic straight fit jeans with a vintage wash finish.",
            8999,
            "Jeans",
            &[14, 15],
            &[("30", 5), ("32", 10), ("34", 8), ("36", 2)],
            false,
        ),
        product(
            ("4", "Silk Scarf", "silk-scarf"),
            "Elegant silk scarf to add a touch of luxury to any outfit.",
            4500,
            "Accessories",
            &[16, 17],
            &[("One Size", 25)],
            true,
        ),
        product(
            ("5", "Oversized Beige Tee", "oversized-beige-tee"),
            "Heavyweight cotton tee with an oversized street fit.",
            3499,
            "T-Shirts",
            &[18, 19],
            &[("S", 8), ("M", 20), ("L", 15), ("XL", 5)],
            false,
        ),
        product(
            ("6", "Leather Belt", "leather-belt"),
            "Genuine leather belt with antique brass buckle.",
            3999,
            "Accessories",
            &[20],
            &[("30", 10), ("32", 10), ("34", 10)],
            false,
        ),
    ]
});

static ORDERS: LazyLock<Vec<Order>> = LazyLock::new(|| {
    vec![
        order("#ORD-7721", (2023, 10, 24), OrderStatus::Delivered, 12499, 3),
        order("#ORD-7720", (2023, 10, 22), OrderStatus::Processing, 5999, 1),
        order("#ORD-7719", (2023, 10, 15), OrderStatus::Shipped, 24500, 4),
    ]
});

/// Sample catalog.
#[must_use]
pub fn products() -> Vec<Product> {
    PRODUCTS.clone()
}

/// Sample product by slug.
#[must_use]
pub fn product_by_slug(slug: &str) -> Option<Product> {
    PRODUCTS.iter().find(|p| p.slug == slug).cloned()
}

/// Sample categories.
#[must_use]
pub fn categories() -> Vec<Category> {
    CATEGORIES.clone()
}

/// Sample orders for the admin console.
#[must_use]
pub fn orders() -> Vec<Order> {
    ORDERS.clone()
}

/// Site content used until an admin saves their own.
#[must_use]
pub fn default_content() -> SiteContent {
    SiteContent {
        hero: Hero {
            headline: "ZOCO".to_string(),
            subheadline: "\"Wear your desired attire\"".to_string(),
            image: "https://picsum.photos/1920/1080?grayscale".to_string(),
        },
        categories: categories(),
    }
}

// =============================================================================
// Builders
// =============================================================================

fn category(id: &str, name: &str, slug: &str, seed: u32, description: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: slug.to_string(),
        image: format!("https://picsum.photos/400/300?random={seed}"),
        description: Some(description.to_string()),
    }
}

fn product(
    (id, name, slug): (&str, &str, &str),
    description: &str,
    cents: i64,
    category: &str,
    image_seeds: &[u32],
    stock: &[(&str, u32)],
    featured: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        price: Price::from_cents(cents),
        compare_at_price: None,
        category: category.to_string(),
        images: image_seeds
            .iter()
            .map(|seed| format!("https://picsum.photos/800/800?random={seed}"))
            .collect(),
        sizes: stock.iter().map(|(size, _)| (*size).to_string()).collect(),
        featured,
        stock_by_size: stock
            .iter()
            .map(|(size, units)| ((*size).to_string(), *units))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn order(id: &str, (y, m, d): (i32, u32, u32), status: OrderStatus, cents: i64, items: u32) -> Order {
    Order {
        id: OrderId::new(id),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
        status,
        total: Price::from_cents(cents),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_are_unique() {
        let products = products();
        let mut slugs: Vec<&str> = products.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), products.len());
    }

    #[test]
    fn test_sizes_match_stock() {
        for product in products() {
            for size in &product.sizes {
                assert!(product.stock_by_size.contains_key(size), "{}", product.slug);
            }
        }
    }

    #[test]
    fn test_product_by_slug() {
        let scarf = product_by_slug("silk-scarf");
        assert_eq!(scarf.map(|p| p.sizes), Some(vec!["One Size".to_string()]));
        assert!(product_by_slug("missing").is_none());
    }

    #[test]
    fn test_order_dates() {
        let orders = orders();
        assert_eq!(orders.len(), 3);
        assert!(orders.iter().all(|o| o.date != NaiveDate::MIN));
    }

    #[test]
    fn test_default_content_lists_categories() {
        let content = default_content();
        assert_eq!(content.hero.headline, "ZOCO");
        assert_eq!(content.categories.len(), 4);
    }
}
