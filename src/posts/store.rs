//! In-memory record store
//!
//! A plain container over the post sequence. It holds no locks and
//! performs no existence checks; `PostService` is its only mutator.

use super::model::Post;

/// Insertion-ordered sequence of posts.
#[derive(Debug, Default)]
pub struct RecordStore {
    posts: Vec<Post>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    pub fn find(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn remove_at(&mut self, index: usize) -> Post {
        self.posts.remove(index)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
