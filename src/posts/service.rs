//! # Post Service
//!
//! CRUD over the record store. This is the only component that mutates
//! the store; it enforces that reads, updates and deletes address an
//! existing post.
//!
//! The store sits behind an `RwLock` because handlers run on a
//! multi-threaded runtime. Every operation takes the lock once and runs to
//! completion without awaiting.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{ApiError, ApiResult};
use super::model::{Post, PostUpdate};
use super::store::RecordStore;

#[derive(Debug)]
pub struct PostService {
    store: RwLock<RecordStore>,
}

impl PostService {
    /// Service over an empty store.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(RecordStore::new()),
        }
    }

    /// Service over a seed set, inserted in order with `create` semantics.
    pub fn with_seed(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut store = RecordStore::new();
        for post in posts {
            insert_or_overwrite(&mut store, post);
        }
        Self {
            store: RwLock::new(store),
        }
    }

    /// All posts in storage order.
    pub fn list(&self) -> ApiResult<Vec<Post>> {
        Ok(self.read()?.all().to_vec())
    }

    pub fn get(&self, id: u64) -> ApiResult<Post> {
        self.read()?
            .find(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(id))
    }

    /// Inserts `post` and returns it unchanged.
    ///
    /// There is no conflict check: a post whose id is already stored
    /// overwrites the existing record in place.
    pub fn create(&self, post: Post) -> ApiResult<Post> {
        let mut store = self.write()?;
        insert_or_overwrite(&mut store, post.clone());
        Ok(post)
    }

    /// Merges `update` into the stored post with the same id.
    pub fn update(&self, update: PostUpdate) -> ApiResult<Post> {
        let mut store = self.write()?;
        let id = update.id;
        let post = store.find_mut(id).ok_or_else(|| ApiError::not_found(id))?;
        post.merge(update);
        Ok(post.clone())
    }

    pub fn delete(&self, id: u64) -> ApiResult<()> {
        let mut store = self.write()?;
        let index = store.position(id).ok_or_else(|| ApiError::not_found(id))?;
        store.remove_at(index);
        Ok(())
    }

    /// Number of stored posts.
    pub fn count(&self) -> ApiResult<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> ApiResult<RwLockReadGuard<'_, RecordStore>> {
        self.store
            .read()
            .map_err(|_| ApiError::Internal("post store lock poisoned".into()))
    }

    fn write(&self) -> ApiResult<RwLockWriteGuard<'_, RecordStore>> {
        self.store
            .write()
            .map_err(|_| ApiError::Internal("post store lock poisoned".into()))
    }
}

impl Default for PostService {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_or_overwrite(store: &mut RecordStore, post: Post) {
    match store.find_mut(post.id) {
        Some(existing) => *existing = post,
        None => store.push(post),
    }
}
