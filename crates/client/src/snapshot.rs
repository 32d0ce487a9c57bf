//! Last known state of the backend's reference data.

use tracing::debug;

use stockhub_catalog::{Category, Directory, ProductCatalog, Salesman};

use crate::gateway::{GatewayError, TransactionGateway};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub catalog: ProductCatalog,
    pub categories: Directory<Category>,
    pub salesmen: Directory<Salesman>,
}

impl Snapshot {
    pub async fn load(gateway: &dyn TransactionGateway) -> Result<Self, GatewayError> {
        let catalog = ProductCatalog::from_products(gateway.products().await?)?;
        let categories = Directory::from_items(gateway.categories().await?)?;
        let salesmen = Directory::from_items(gateway.salesmen().await?)?;
        debug!(
            products = catalog.len(),
            categories = categories.len(),
            salesmen = salesmen.len(),
            "snapshot loaded"
        );
        Ok(Self {
            catalog,
            categories,
            salesmen,
        })
    }

    /// Re-fetch products after a submission changed stock.
    pub async fn refresh_catalog(&mut self, gateway: &dyn TransactionGateway) -> Result<(), GatewayError> {
        self.catalog = ProductCatalog::from_products(gateway.products().await?)?;
        Ok(())
    }
}
