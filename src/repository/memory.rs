//! In-process storage backend
//!
//! Each entity lives in an id-ordered [`Table`] behind a `RwLock`. Ids are
//! handed out monotonically and never reused, the same way a serial column
//! behaves.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AdminStore, BookStore, PatronStore};
use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{Admin, Book, NewAdmin, NewBook, NewPatron, Patron},
};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|row| predicate(row)).cloned()
    }

    fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| predicate(row)).cloned().collect()
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> AppResult<T> {
        let id = self.next_id;
        // next_id saturates at i64::MAX, which may already be taken
        if self.rows.contains_key(&id) {
            return Err(AppError::Internal("Id space exhausted".to_string()));
        }
        Ok(self.put(id, build(id)))
    }

    fn put(&mut self, id: i64, row: T) -> T {
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.rows.insert(id, row.clone());
        row
    }

    fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn len(&self) -> i64 {
        self.rows.len() as i64
    }
}

/// Rejects an email already used by a row other than `id`
fn ensure_unique_email<T: Clone>(
    table: &Table<T>,
    email: &str,
    id: Option<i64>,
    email_of: impl Fn(&T) -> (i64, &str),
) -> AppResult<()> {
    let taken = table
        .find(|row| {
            let (row_id, row_email) = email_of(row);
            Some(row_id) != id && row_email.eq_ignore_ascii_case(email)
        })
        .is_some();

    if taken {
        Err(AppError::Conflict(ErrorCode::Duplicate, "Email already in use".to_string()))
    } else {
        Ok(())
    }
}

/// All three stores in process memory
#[derive(Debug)]
pub struct MemoryStore {
    admins: RwLock<Table<Admin>>,
    books: RwLock<Table<Book>>,
    patrons: RwLock<Table<Patron>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            admins: RwLock::new(Table::new()),
            books: RwLock::new(Table::new()),
            patrons: RwLock::new(Table::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Admin>> {
        Ok(self.admins.read().await.all())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Admin>> {
        Ok(self.admins.read().await.get(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        Ok(self
            .admins
            .read()
            .await
            .find(|a| a.email.eq_ignore_ascii_case(email)))
    }

    async fn insert(&self, admin: NewAdmin) -> AppResult<Admin> {
        let mut table = self.admins.write().await;
        ensure_unique_email(&table, &admin.email, None, |a| (a.id, a.email.as_str()))?;
        table.insert_with(|id| admin.with_id(id))
    }

    async fn save_with_id(&self, id: i64, admin: NewAdmin) -> AppResult<Admin> {
        let mut table = self.admins.write().await;
        ensure_unique_email(&table, &admin.email, Some(id), |a| (a.id, a.email.as_str()))?;
        Ok(table.put(id, admin.with_id(id)))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.admins.read().await.len())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.admins.write().await.remove(id))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.all())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(id))
    }

    async fn find_by_patron(&self, patron_id: i64) -> AppResult<Vec<Book>> {
        Ok(self
            .books
            .read()
            .await
            .filter(|b| b.checked_out_by_patron_id == Some(patron_id)))
    }

    async fn insert(&self, book: NewBook) -> AppResult<Book> {
        self.books.write().await.insert_with(|id| book.with_id(id))
    }

    async fn save_with_id(&self, id: i64, book: NewBook) -> AppResult<Book> {
        Ok(self.books.write().await.put(id, book.with_id(id)))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.books.read().await.len())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.books.write().await.remove(id))
    }
}

#[async_trait]
impl PatronStore for MemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Patron>> {
        Ok(self.patrons.read().await.all())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Patron>> {
        Ok(self.patrons.read().await.get(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Patron>> {
        Ok(self
            .patrons
            .read()
            .await
            .find(|p| p.email.eq_ignore_ascii_case(email)))
    }

    async fn insert(&self, patron: NewPatron) -> AppResult<Patron> {
        let mut table = self.patrons.write().await;
        ensure_unique_email(&table, &patron.email, None, |p| (p.id, p.email.as_str()))?;
        table.insert_with(|id| patron.with_id(id))
    }

    async fn save_with_id(&self, id: i64, patron: NewPatron) -> AppResult<Patron> {
        let mut table = self.patrons.write().await;
        ensure_unique_email(&table, &patron.email, Some(id), |p| (p.id, p.email.as_str()))?;
        Ok(table.put(id, patron.with_id(id)))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.patrons.read().await.len())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.patrons.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, checked_out_by: Option<i64>) -> NewBook {
        NewBook {
            author: "Author".to_string(),
            is_audio_book: false,
            is_checked_out: checked_out_by.is_some(),
            isbn: isbn.to_string(),
            title: "Title".to_string(),
            checked_out_by_patron_id: checked_out_by,
        }
    }

    fn patron(email: &str) -> NewPatron {
        NewPatron {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            date_of_birth: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_ordered() {
        let store = MemoryStore::new();
        let first = BookStore::insert(&store, book("1234567890", None)).await.unwrap();
        let second = BookStore::insert(&store, book("0987654321", Some(9))).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let all = BookStore::find_all(&store).await.unwrap();
        assert_eq!(all, vec![first, second]);
        assert_eq!(BookStore::count(&store).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_save_with_id_moves_next_id() {
        let store = MemoryStore::new();
        BookStore::save_with_id(&store, 10, book("1234567890", None)).await.unwrap();
        let next = BookStore::insert(&store, book("0987654321", None)).await.unwrap();
        assert_eq!(next.id, 11);
    }

    #[tokio::test]
    async fn test_top_of_id_space() {
        let store = MemoryStore::new();
        BookStore::save_with_id(&store, i64::MAX - 1, book("1234567890", None))
            .await
            .unwrap();
        let last = BookStore::insert(&store, book("0987654321", None)).await.unwrap();
        assert_eq!(last.id, i64::MAX);

        let err = BookStore::insert(&store, book("1111111111", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(BookStore::count(&store).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = MemoryStore::new();
        let created = BookStore::insert(&store, book("1234567890", None)).await.unwrap();
        assert!(BookStore::delete_by_id(&store, created.id).await.unwrap());
        assert!(!BookStore::delete_by_id(&store, created.id).await.unwrap());
        assert!(BookStore::find_by_id(&store, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_patron() {
        let store = MemoryStore::new();
        BookStore::insert(&store, book("1111111111", Some(4))).await.unwrap();
        BookStore::insert(&store, book("2222222222", None)).await.unwrap();
        BookStore::insert(&store, book("3333333333", Some(4))).await.unwrap();

        let held = store.find_by_patron(4).await.unwrap();
        assert_eq!(held.len(), 2);
        assert!(held.iter().all(|b| b.checked_out_by_patron_id == Some(4)));
    }

    #[tokio::test]
    async fn test_email_unique_ignoring_case() {
        let store = MemoryStore::new();
        let john = PatronStore::insert(&store, patron("john@example.com")).await.unwrap();

        let err = PatronStore::insert(&store, patron("JOHN@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ErrorCode::Duplicate, _)));

        // Replacing the owner of the email keeps it
        PatronStore::save_with_id(&store, john.id, patron("john@example.com"))
            .await
            .unwrap();

        let found = PatronStore::find_by_email(&store, "John@Example.com").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(john.id));
    }
}
