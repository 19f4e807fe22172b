//! Orders and the admin dashboard.
//!
//! There is no order table; the admin console works off the fixture orders.

use serde::Serialize;
use zoco_core::{Order, Price};

use super::Api;
use crate::fixtures;

/// Headline numbers for the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub revenue: Price,
    pub orders: usize,
    pub products: usize,
    pub units_in_stock: u32,
}

/// Order operations, obtained from [`Api::orders`].
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    api: &'a Api,
}

impl<'a> Orders<'a> {
    pub(super) const fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Recent orders, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Order> {
        fixtures::orders()
    }

    /// Revenue, order count, and catalog stock.
    pub async fn dashboard(&self) -> Dashboard {
        let orders = self.list();
        let products = self.api.products().list().await;
        Dashboard {
            revenue: orders.iter().map(|o| o.total).sum(),
            orders: orders.len(),
            products: products.len(),
            units_in_stock: products.iter().map(|p| p.total_stock()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::supabase::SupabaseClient;

    #[tokio::test]
    async fn test_dashboard_offline() {
        let api = Api::new(
            SupabaseClient::offline(),
            Arc::new(MemoryBlobStore::new()),
            "products",
        );
        let dashboard = api.orders().dashboard().await;

        assert_eq!(dashboard.orders, 3);
        assert_eq!(dashboard.revenue, Price::from_cents(12499 + 5999 + 24500));
        assert_eq!(dashboard.products, fixtures::products().len());
        assert_eq!(
            dashboard.units_in_stock,
            fixtures::products().iter().map(|p| p.total_stock()).sum::<u32>()
        );
    }
}
