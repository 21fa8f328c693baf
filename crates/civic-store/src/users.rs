use std::sync::{Arc, RwLock};

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand_core::OsRng;
use tracing::{info, warn};
use uuid::Uuid;

use civic_db::{KeyValueStore, keys};
use civic_types::api::UserUpdate;
use civic_types::models::{Role, User};

use crate::error::{Result, StoreError};
use crate::filter::same_email;

/// Built-in accounts that exist on every instance and are never persisted.
const DEMO_ACCOUNTS: [(&str, &str, &str, Role, Option<&str>, &str); 2] = [
    (
        "admin-1",
        "Admin User",
        "admin@gov.example",
        Role::Admin,
        Some("Public Works"),
        "admin123",
    ),
    (
        "citizen-1",
        "Jane Citizen",
        "jane@example.com",
        Role::Citizen,
        None,
        "password123",
    ),
];

#[derive(Clone)]
struct Account {
    user: User,
    /// PHC-encoded Argon2id hash. `None` when the stored hash is missing.
    password_hash: Option<String>,
    builtin: bool,
}

/// Registered users plus the demo accounts, mirrored to a key-value store.
pub struct UserDirectory {
    accounts: RwLock<Vec<Account>>,
    storage: Arc<dyn KeyValueStore>,
}

impl UserDirectory {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let mut accounts = Vec::new();

        for (id, name, email, role, department, password) in DEMO_ACCOUNTS {
            accounts.push(Account {
                user: User {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                    role,
                    department: department.map(String::from),
                },
                password_hash: Some(hash_password(password)?),
                builtin: true,
            });
        }

        let registered: Vec<User> = match storage.get(keys::REGISTERED_USERS)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: keys::REGISTERED_USERS.to_string(),
                source,
            })?,
            None => Vec::new(),
        };

        for user in registered {
            let password_hash = storage.get(&keys::password(&user.id))?;
            if password_hash.is_none() {
                warn!("No password stored for user {}; login disabled", user.id);
            }
            accounts.push(Account {
                user,
                password_hash,
                builtin: false,
            });
        }

        info!("User directory loaded ({} accounts)", accounts.len());
        Ok(Self {
            accounts: RwLock::new(accounts),
            storage,
        })
    }

    /// Create a citizen account. Fails with `EmailTaken` if any account
    /// already uses the address.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = hash_password(password)?;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| StoreError::Poisoned("user directory"))?;

        if accounts.iter().any(|a| same_email(&a.user.email, email)) {
            return Err(StoreError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Citizen,
            department: None,
        };

        let mut next = accounts.clone();
        next.push(Account {
            user: user.clone(),
            password_hash: Some(password_hash.clone()),
            builtin: false,
        });

        let password_key = keys::password(&user.id);
        self.storage.set(&password_key, &password_hash)?;
        if let Err(e) = self.persist(&next) {
            if let Err(cleanup) = self.storage.remove(&password_key) {
                warn!(
                    "Could not remove {} after failed registration: {}",
                    password_key, cleanup
                );
            }
            return Err(e);
        }
        *accounts = next;

        info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let account = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| StoreError::Poisoned("user directory"))?;
            accounts
                .iter()
                .find(|a| same_email(&a.user.email, email))
                .cloned()
        };

        let Some(account) = account else {
            warn!("Login rejected: unknown email");
            return Err(StoreError::InvalidCredentials);
        };
        let Some(hash) = account.password_hash.as_deref() else {
            warn!("Login rejected for {}: no password on record", account.user.id);
            return Err(StoreError::InvalidCredentials);
        };

        if !verify_password(password, hash)? {
            warn!("Login rejected for {}: bad password", account.user.id);
            return Err(StoreError::InvalidCredentials);
        }

        Ok(account.user)
    }

    pub fn get(&self, id: &str) -> Result<Option<User>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| StoreError::Poisoned("user directory"))?;
        Ok(accounts.iter().find(|a| a.user.id == id).map(|a| a.user.clone()))
    }

    /// Merge profile changes. Registered users are persisted; demo accounts
    /// only change for the lifetime of the process.
    pub fn update_user(&self, id: &str, changes: UserUpdate) -> Result<User> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| StoreError::Poisoned("user directory"))?;

        if let Some(email) = &changes.email {
            if accounts
                .iter()
                .any(|a| a.user.id != id && same_email(&a.user.email, email))
            {
                return Err(StoreError::EmailTaken);
            }
        }

        let mut next = accounts.clone();
        let account = next
            .iter_mut()
            .find(|a| a.user.id == id)
            .ok_or_else(|| StoreError::UserNotFound(id.to_string()))?;

        if let Some(name) = changes.name {
            account.user.name = name;
        }
        if let Some(email) = changes.email {
            account.user.email = email;
        }
        if let Some(department) = changes.department {
            account.user.department = Some(department);
        }

        let updated = account.user.clone();
        if !account.builtin {
            self.persist(&next)?;
        }
        *accounts = next;

        Ok(updated)
    }

    fn persist(&self, accounts: &[Account]) -> Result<()> {
        let registered: Vec<&User> = accounts
            .iter()
            .filter(|a| !a.builtin)
            .map(|a| &a.user)
            .collect();
        let raw = serde_json::to_string(&registered)?;
        self.storage.set(keys::REGISTERED_USERS, &raw)?;
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
