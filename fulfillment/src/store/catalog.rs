//! Catalog store: customers and products
//!
//! Stock is adjusted exclusively through [`CatalogStore::adjust_stock`],
//! a conditional check-then-write executed inside the caller's write
//! transaction. Customer deletion is a collaborator concern and has no
//! entry point here; product deletion is exposed because the engine must
//! tolerate orders whose products were deleted underneath them.

use super::{
    CUSTOMER_COUNTER, CUSTOMERS_TABLE, EMAIL_INDEX_TABLE, PRODUCT_COUNTER, PRODUCTS_TABLE,
    SKU_INDEX_TABLE, Store, StoreError, StoreResult,
};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::models::{Customer, CustomerCreate, CustomerUpdate, Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;

#[derive(Clone)]
pub struct CatalogStore {
    store: Store,
}

impl CatalogStore {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    // ========== Customers ==========

    /// Create a new customer; fails with `Duplicate` if the email is taken
    pub fn create_customer(&self, data: CustomerCreate) -> StoreResult<Customer> {
        let txn = self.store.begin_write()?;
        let customer = {
            let id = self.store.next_id(&txn, CUSTOMER_COUNTER)?;

            let mut index = txn.open_table(EMAIL_INDEX_TABLE)?;
            if index.get(data.email.as_str())?.is_some() {
                return Err(StoreError::Duplicate("email", data.email));
            }
            index.insert(data.email.as_str(), id)?;
            drop(index);

            let now = now_millis();
            let customer = Customer {
                id,
                name: data.name,
                email: data.email,
                phone: data.phone,
                address: data.address,
                created_at: now,
                updated_at: now,
            };

            let mut table = txn.open_table(CUSTOMERS_TABLE)?;
            let value = serde_json::to_vec(&customer)?;
            table.insert(id, value.as_slice())?;
            customer
        };
        txn.commit()?;
        Ok(customer)
    }

    /// Get a customer by id (read-only)
    pub fn get_customer(&self, id: u64) -> StoreResult<Option<Customer>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a customer by id (within transaction)
    pub fn get_customer_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StoreResult<Option<Customer>> {
        let table = txn.open_table(CUSTOMERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Update customer profile fields
    pub fn update_customer(&self, id: u64, data: CustomerUpdate) -> StoreResult<Customer> {
        let txn = self.store.begin_write()?;
        let customer = {
            let mut table = txn.open_table(CUSTOMERS_TABLE)?;
            let mut customer: Customer = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StoreError::CustomerNotFound(id)),
            };
            drop(table);

            if let Some(email) = data.email
                && email != customer.email
            {
                let mut index = txn.open_table(EMAIL_INDEX_TABLE)?;
                if index.get(email.as_str())?.is_some() {
                    return Err(StoreError::Duplicate("email", email));
                }
                index.remove(customer.email.as_str())?;
                index.insert(email.as_str(), id)?;
                customer.email = email;
            }
            if let Some(name) = data.name {
                customer.name = name;
            }
            if let Some(phone) = data.phone {
                customer.phone = Some(phone);
            }
            if let Some(address) = data.address {
                customer.address = Some(address);
            }
            customer.updated_at = now_millis();

            let mut table = txn.open_table(CUSTOMERS_TABLE)?;
            let value = serde_json::to_vec(&customer)?;
            table.insert(id, value.as_slice())?;
            customer
        };
        txn.commit()?;
        Ok(customer)
    }

    /// List customers, newest first
    pub fn list_customers(&self, page: u32, per_page: u32) -> StoreResult<(Vec<Customer>, u64)> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;

        let mut customers: Vec<Customer> = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            customers.push(serde_json::from_slice(value.value())?);
        }

        let total = customers.len() as u64;
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let skip = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let customers = customers
            .into_iter()
            .skip(skip)
            .take(per_page as usize)
            .collect();
        Ok((customers, total))
    }

    // ========== Products ==========

    /// Create a new product; fails with `Duplicate` if the SKU is taken
    pub fn create_product(&self, data: ProductCreate) -> StoreResult<Product> {
        let txn = self.store.begin_write()?;
        let product = {
            let id = self.store.next_id(&txn, PRODUCT_COUNTER)?;

            let mut index = txn.open_table(SKU_INDEX_TABLE)?;
            if index.get(data.sku.as_str())?.is_some() {
                return Err(StoreError::Duplicate("sku", data.sku));
            }
            index.insert(data.sku.as_str(), id)?;
            drop(index);

            let now = now_millis();
            let product = Product {
                id,
                name: data.name,
                description: data.description,
                price: data.price,
                sku: data.sku,
                stock: data.stock,
                created_at: now,
                updated_at: now,
            };

            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(&product)?;
            table.insert(id, value.as_slice())?;
            product
        };
        txn.commit()?;
        Ok(product)
    }

    /// Get a product by id (read-only)
    pub fn get_product(&self, id: u64) -> StoreResult<Option<Product>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a product by id (within transaction)
    pub fn get_product_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StoreResult<Option<Product>> {
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Update product fields (stock excluded; see [`Self::adjust_stock`])
    pub fn update_product(&self, id: u64, data: ProductUpdate) -> StoreResult<Product> {
        let txn = self.store.begin_write()?;
        let product = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let mut product: Product = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StoreError::ProductNotFound(id)),
            };
            drop(table);

            if let Some(sku) = data.sku
                && sku != product.sku
            {
                let mut index = txn.open_table(SKU_INDEX_TABLE)?;
                if index.get(sku.as_str())?.is_some() {
                    return Err(StoreError::Duplicate("sku", sku));
                }
                index.remove(product.sku.as_str())?;
                index.insert(sku.as_str(), id)?;
                product.sku = sku;
            }
            if let Some(name) = data.name {
                product.name = name;
            }
            if let Some(description) = data.description {
                product.description = Some(description);
            }
            if let Some(price) = data.price {
                product.price = price;
            }
            product.updated_at = now_millis();

            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(&product)?;
            table.insert(id, value.as_slice())?;
            product
        };
        txn.commit()?;
        Ok(product)
    }

    /// Hard delete a product (collaborator-side; existing order items keep
    /// their price snapshots and become dangling references)
    pub fn delete_product(&self, id: u64) -> StoreResult<()> {
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let product: Product = match table.remove(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StoreError::ProductNotFound(id)),
            };
            drop(table);

            let mut index = txn.open_table(SKU_INDEX_TABLE)?;
            index.remove(product.sku.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Conditionally adjust a product's stock (within transaction)
    ///
    /// `delta` is negative for a reservation and positive for a release.
    /// An adjustment that would drive stock below zero fails with
    /// `InsufficientStock`, atomically with the check: the check and the
    /// write happen under the same write transaction, and redb admits only
    /// one write transaction at a time.
    pub fn adjust_stock(
        &self,
        txn: &WriteTransaction,
        id: u64,
        delta: i32,
    ) -> StoreResult<Product> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let mut product: Product = match table.get(id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StoreError::ProductNotFound(id)),
        };

        let new_stock = product.stock + delta;
        if new_stock < 0 {
            return Err(StoreError::InsufficientStock {
                product_id: id,
                requested: -delta,
                available: product.stock,
            });
        }

        product.stock = new_stock;
        product.updated_at = now_millis();
        let value = serde_json::to_vec(&product)?;
        table.insert(id, value.as_slice())?;
        Ok(product)
    }
}
