//! In-process datastore backing every repository trait.
//!
//! All tables sit behind one mutex so multi-table writes (brand deletion
//! cascading into ratings and list items) and read-modify-write operations
//! (rating upsert, vote increments) are atomic with respect to each other.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::RepositoryError;
use crate::accounts::{NewUser, Role, User, UserId, UserRepository};
use crate::brands::{Brand, BrandFilter, BrandId, BrandOrder, BrandRepository, NewBrand};
use crate::contacts::{
    ContactId, ContactRepository, ContactStatus, ContactSubmission, NewContact,
};
use crate::lists::{
    BrandList, BrandListId, BrandListItem, ListItemId, ListRepository, NewBrandList,
    VoteDirection,
};
use crate::media::{
    sanitize_file_name, ImageStore, ImageUpload, StorageError, StoredImage, StoredObject,
};
use crate::ratings::{Rating, RatingId, RatingRepository, RatingScores, UpsertOutcome, VoterId};
use crate::subscribers::{
    NewSubscriber, Subscriber, SubscriberId, SubscriberRepository, Subscription,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    brands: BTreeMap<BrandId, Brand>,
    ratings: BTreeMap<RatingId, Rating>,
    lists: BTreeMap<BrandListId, BrandList>,
    list_items: BTreeMap<ListItemId, BrandListItem>,
    users: BTreeMap<UserId, User>,
    contacts: BTreeMap<ContactId, ContactSubmission>,
    subscribers: BTreeMap<SubscriberId, Subscriber>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

impl BrandRepository for MemoryStore {
    fn insert_brand(&self, brand: NewBrand) -> Result<Brand, RepositoryError> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let record = Brand {
            id: BrandId(tables.next_id()),
            name: brand.name,
            description: brand.description,
            logo_url: brand.logo_url,
            logo_key: brand.logo_key,
            website_url: brand.website_url,
            categories: brand.categories,
            rank: brand.rank,
            is_active: brand.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.brands.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_brand(&self, brand: Brand) -> Result<Brand, RepositoryError> {
        let mut tables = self.tables()?;
        let slot = tables
            .brands
            .get_mut(&brand.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = brand.clone();
        Ok(brand)
    }

    fn fetch_brand(&self, id: BrandId) -> Result<Option<Brand>, RepositoryError> {
        Ok(self.tables()?.brands.get(&id).cloned())
    }

    fn list_brands(&self, filter: BrandFilter) -> Result<Vec<Brand>, RepositoryError> {
        let tables = self.tables()?;
        let mut brands: Vec<Brand> = tables
            .brands
            .values()
            .filter(|brand| filter == BrandFilter::All || brand.is_active)
            .cloned()
            .collect();
        brands.sort_by_key(|brand| (brand.rank, brand.id));
        Ok(brands)
    }

    fn max_rank(&self) -> Result<Option<i32>, RepositoryError> {
        Ok(self.tables()?.brands.values().map(|brand| brand.rank).max())
    }

    fn delete_brand(&self, id: BrandId) -> Result<Brand, RepositoryError> {
        let mut tables = self.tables()?;
        let removed = tables.brands.remove(&id).ok_or(RepositoryError::NotFound)?;
        tables.ratings.retain(|_, rating| rating.brand_id != id);
        tables.list_items.retain(|_, item| item.brand_id != id);
        Ok(removed)
    }

    fn reorder_brands(&self, orders: &[BrandOrder]) -> Result<usize, RepositoryError> {
        let mut tables = self.tables()?;
        if orders
            .iter()
            .any(|order| !tables.brands.contains_key(&order.id))
        {
            return Err(RepositoryError::NotFound);
        }
        let now = Utc::now();
        for order in orders {
            if let Some(brand) = tables.brands.get_mut(&order.id) {
                brand.rank = order.rank;
                brand.updated_at = now;
            }
        }
        Ok(orders.len())
    }
}

impl RatingRepository for MemoryStore {
    fn upsert_rating(
        &self,
        brand_id: BrandId,
        voter: &VoterId,
        scores: RatingScores,
        comment: Option<String>,
    ) -> Result<(Rating, UpsertOutcome), RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.brands.contains_key(&brand_id) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now();
        let existing = tables
            .ratings
            .values_mut()
            .find(|rating| rating.brand_id == brand_id && &rating.user_ip == voter);
        if let Some(rating) = existing {
            rating.scores = scores;
            rating.comment = comment;
            rating.updated_at = now;
            return Ok((rating.clone(), UpsertOutcome::Updated));
        }

        let rating = Rating {
            id: RatingId(tables.next_id()),
            brand_id,
            user_ip: voter.clone(),
            scores,
            comment,
            created_at: now,
            updated_at: now,
        };
        tables.ratings.insert(rating.id, rating.clone());
        Ok((rating, UpsertOutcome::Inserted))
    }

    fn ratings_for_brand(&self, brand_id: BrandId) -> Result<Vec<Rating>, RepositoryError> {
        let tables = self.tables()?;
        let mut ratings: Vec<Rating> = tables
            .ratings
            .values()
            .filter(|rating| rating.brand_id == brand_id)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(ratings)
    }

    fn all_ratings(&self) -> Result<Vec<Rating>, RepositoryError> {
        Ok(self.tables()?.ratings.values().cloned().collect())
    }
}

impl ListRepository for MemoryStore {
    fn insert_list(&self, list: NewBrandList) -> Result<BrandList, RepositoryError> {
        let mut tables = self.tables()?;
        let record = BrandList {
            id: BrandListId(tables.next_id()),
            title: list.title,
            description: list.description,
            is_active: list.is_active,
            created_at: Utc::now(),
        };
        tables.lists.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch_list(&self, id: BrandListId) -> Result<Option<BrandList>, RepositoryError> {
        Ok(self.tables()?.lists.get(&id).cloned())
    }

    fn lists(&self, active_only: bool) -> Result<Vec<BrandList>, RepositoryError> {
        Ok(self
            .tables()?
            .lists
            .values()
            .filter(|list| !active_only || list.is_active)
            .cloned()
            .collect())
    }

    fn list_items(&self, list_id: BrandListId) -> Result<Vec<BrandListItem>, RepositoryError> {
        let tables = self.tables()?;
        let mut items: Vec<BrandListItem> = tables
            .list_items
            .values()
            .filter(|item| item.list_id == list_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.position, item.id));
        Ok(items)
    }

    fn insert_list_item(
        &self,
        list_id: BrandListId,
        brand_id: BrandId,
        position: Option<i32>,
    ) -> Result<BrandListItem, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.lists.contains_key(&list_id) || !tables.brands.contains_key(&brand_id) {
            return Err(RepositoryError::NotFound);
        }

        let siblings = tables
            .list_items
            .values()
            .filter(|item| item.list_id == list_id);
        let mut last_position = 0;
        for item in siblings {
            if item.brand_id == brand_id {
                return Err(RepositoryError::Conflict(
                    "brand is already in this list".to_string(),
                ));
            }
            last_position = last_position.max(item.position);
        }

        let item = BrandListItem {
            id: ListItemId(tables.next_id()),
            list_id,
            brand_id,
            position: position.unwrap_or(last_position + 1),
            upvotes: 0,
            downvotes: 0,
        };
        tables.list_items.insert(item.id, item.clone());
        Ok(item)
    }

    fn increment_vote(
        &self,
        list_id: BrandListId,
        item_id: ListItemId,
        direction: VoteDirection,
    ) -> Result<BrandListItem, RepositoryError> {
        let mut tables = self.tables()?;
        let item = tables
            .list_items
            .get_mut(&item_id)
            .filter(|item| item.list_id == list_id)
            .ok_or(RepositoryError::NotFound)?;
        match direction {
            VoteDirection::Up => item.upvotes += 1,
            VoteDirection::Down => item.downvotes += 1,
        }
        Ok(item.clone())
    }
}

impl UserRepository for MemoryStore {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict("email already registered".to_string()));
        }
        let now = Utc::now();
        let record = User {
            id: UserId(tables.next_id()),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email)
        {
            return Err(RepositoryError::Conflict("email already registered".to_string()));
        }
        let slot = tables.users.get_mut(&user.id).ok_or(RepositoryError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.tables()?.users.values().cloned().collect())
    }

    fn delete_user(&self, id: UserId) -> Result<User, RepositoryError> {
        self.tables()?
            .users
            .remove(&id)
            .ok_or(RepositoryError::NotFound)
    }

    fn insert_first_admin(&self, user: NewUser) -> Result<Option<User>, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.users.is_empty() {
            return Ok(None);
        }
        let now = Utc::now();
        let record = User {
            id: UserId(tables.next_id()),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(Some(record))
    }
}

impl ContactRepository for MemoryStore {
    fn insert_contact(&self, contact: NewContact) -> Result<ContactSubmission, RepositoryError> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let record = ContactSubmission {
            id: ContactId(tables.next_id()),
            kind: contact.kind,
            name: contact.name,
            email: contact.email,
            brand_name: contact.brand_name,
            message: contact.message,
            website: contact.website,
            resource: contact.resource,
            status: ContactStatus::Pending,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        };
        tables.contacts.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch_contact(&self, id: ContactId) -> Result<Option<ContactSubmission>, RepositoryError> {
        Ok(self.tables()?.contacts.get(&id).cloned())
    }

    fn list_contacts(
        &self,
        status: Option<ContactStatus>,
    ) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let tables = self.tables()?;
        let mut contacts: Vec<ContactSubmission> = tables
            .contacts
            .values()
            .filter(|contact| status.map_or(true, |wanted| contact.status == wanted))
            .cloned()
            .collect();
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(contacts)
    }

    fn update_contact(
        &self,
        contact: ContactSubmission,
    ) -> Result<ContactSubmission, RepositoryError> {
        let mut tables = self.tables()?;
        let slot = tables
            .contacts
            .get_mut(&contact.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = contact.clone();
        Ok(contact)
    }

    fn delete_contact(&self, id: ContactId) -> Result<ContactSubmission, RepositoryError> {
        self.tables()?
            .contacts
            .remove(&id)
            .ok_or(RepositoryError::NotFound)
    }
}

impl SubscriberRepository for MemoryStore {
    fn insert_subscriber_if_absent(
        &self,
        subscriber: NewSubscriber,
    ) -> Result<(Subscriber, Subscription), RepositoryError> {
        let mut tables = self.tables()?;
        if let Some(existing) = tables
            .subscribers
            .values()
            .find(|existing| existing.email == subscriber.email)
        {
            return Ok((existing.clone(), Subscription::Existing));
        }
        let record = Subscriber {
            id: SubscriberId(tables.next_id()),
            email: subscriber.email,
            name: subscriber.name,
            source: subscriber.source,
            created_at: Utc::now(),
        };
        tables.subscribers.insert(record.id, record.clone());
        Ok((record, Subscription::Created))
    }

    fn list_subscribers(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        Ok(self.tables()?.subscribers.values().cloned().collect())
    }
}

/// Image store keeping uploads in memory and serving them under `public_base_url`.
#[derive(Debug)]
pub struct MemoryImageStore {
    public_base_url: String,
    sequence: AtomicU64,
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryImageStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            sequence: AtomicU64::new(0),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects(&self) -> Result<MutexGuard<'_, HashMap<String, StoredObject>>, StorageError> {
        self.objects
            .lock()
            .map_err(|_| StorageError::Unavailable("image store lock poisoned".to_string()))
    }
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self::new("/media")
    }
}

impl ImageStore for MemoryImageStore {
    fn put(&self, upload: &ImageUpload) -> Result<StoredImage, StorageError> {
        upload.validate()?;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let key = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            sequence,
            sanitize_file_name(&upload.file_name)
        );
        self.objects()?.insert(
            key.clone(),
            StoredObject {
                file_name: upload.file_name.clone(),
                content_type: upload.content_type.clone(),
                bytes: upload.bytes.clone(),
            },
        );
        Ok(StoredImage {
            public_url: format!("{}/{}", self.public_base_url, key),
            key,
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects()?
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::Missing(key.to_string()))
    }

    fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        Ok(self.objects()?.get(key).cloned())
    }
}
