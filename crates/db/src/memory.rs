//! In-process store used by tests and by the server when no `DATABASE_URL`
//! is configured. Mirrors the PostgreSQL behaviour: lowercased unique
//! emails, insertion-ordered product listing, populated `createdBy`.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use catalog_core::roles::Role;
use catalog_core::types::{DbId, Timestamp};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::product::{CreateProduct, Creator, Product, UpdateProduct};
use crate::models::user::{normalize_email, CreateUser, User};
use crate::store::{ProductStore, UserStore};

/// Name reported for email collisions, matching the PostgreSQL index.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

#[derive(Debug, Clone)]
struct ProductRecord {
    id: DbId,
    name: String,
    description: String,
    price: Decimal,
    created_by: DbId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Implements both store traits with concurrent maps.
#[derive(Debug)]
pub struct MemoryStore {
    next_user_id: AtomicI64,
    next_product_id: AtomicI64,
    users: DashMap<DbId, User>,
    /// Normalized email -> user id.
    emails: DashMap<String, DbId>,
    products: DashMap<DbId, ProductRecord>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            next_user_id: AtomicI64::new(1),
            next_product_id: AtomicI64::new(1),
            users: DashMap::new(),
            emails: DashMap::new(),
            products: DashMap::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn populate(&self, record: &ProductRecord) -> Product {
        let creator = self.users.get(&record.created_by);
        Product {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            price: record.price,
            created_by: Creator {
                id: record.created_by,
                name: creator.as_ref().map(|u| u.name.clone()),
                email: creator.as_ref().map(|u| u.email.clone()),
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let email = normalize_email(&input.email);
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(EMAIL_CONSTRAINT.to_string())),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
                let now = Utc::now();
                let user = User {
                    id,
                    name: input.name.clone(),
                    email,
                    password_hash: input.password_hash.clone(),
                    role: input.role,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(id, user.clone());
                slot.insert(id);
                Ok(user)
            }
        }
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let id = match self.emails.get(&normalize_email(email)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn update_user_role(&self, id: DbId, role: Role) -> Result<Option<User>, StoreError> {
        Ok(self.users.get_mut(&id).map(|mut user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut records: Vec<ProductRecord> =
            self.products.iter().map(|p| p.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        Ok(records.iter().map(|r| self.populate(r)).collect())
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        let record = self.products.get(&id).map(|p| p.clone());
        Ok(record.map(|r| self.populate(&r)))
    }

    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        let id = self.next_product_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let record = ProductRecord {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(id, record.clone());
        Ok(self.populate(&record))
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        let updated = self.products.get_mut(&id).map(|mut record| {
            if let Some(name) = &input.name {
                record.name = name.clone();
            }
            if let Some(description) = &input.description {
                record.description = description.clone();
            }
            if let Some(price) = input.price {
                record.price = price;
            }
            record.updated_at = Utc::now();
            record.clone()
        });
        Ok(updated.map(|r| self.populate(&r)))
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.products.remove(&id).is_some())
    }
}
