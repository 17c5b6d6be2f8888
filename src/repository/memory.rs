//! In-memory record store.
//!
//! Holds every record kind behind one lock and answers the same queries as
//! the PostgreSQL repositories. Text is ordered case-insensitively with a
//! byte-order tie-break, the same as `ORDER BY LOWER(x) COLLATE "C", x
//! COLLATE "C"` in SQL. Reference integrity is not enforced here; the
//! services check references before writing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BookInstanceStore, BookStore, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookDetail, BookInstance, BookListing, BookRef, BookStatus, Genre,
        InstanceListing,
    },
};

#[derive(Default)]
struct Records {
    authors: HashMap<Uuid, Author>,
    genres: HashMap<Uuid, Genre>,
    books: HashMap<Uuid, Book>,
    book_instances: HashMap<Uuid, BookInstance>,
}

/// Cheaply cloneable handle; clones share the same records
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Records>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Case-folded text first, raw bytes to break ties
fn text_key(text: &str) -> (String, &str) {
    (text.to_lowercase(), text)
}

fn sorted_books<'a>(books: impl Iterator<Item = &'a Book>) -> Vec<Book> {
    let mut books: Vec<Book> = books.cloned().collect();
    books.sort_by(|a, b| text_key(&a.title).cmp(&text_key(&b.title)));
    books
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let records = self.records.read().await;
        let mut authors: Vec<Author> = records.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            (text_key(&a.family_name), text_key(&a.first_name))
                .cmp(&(text_key(&b.family_name), text_key(&b.first_name)))
        });
        Ok(authors)
    }

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.records.read().await.authors.get(&id).cloned())
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(count(self.records.read().await.authors.len()))
    }

    async fn insert_author(&self, author: &Author) -> AppResult<()> {
        self.records
            .write()
            .await
            .authors
            .insert(author.id, author.clone());
        Ok(())
    }

    async fn update_author(&self, author: &Author) -> AppResult<()> {
        let mut records = self.records.write().await;
        match records.authors.get_mut(&author.id) {
            Some(stored) => {
                *stored = author.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Author {} not found", author.id))),
        }
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        self.records
            .write()
            .await
            .authors
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let records = self.records.read().await;
        let mut genres: Vec<Genre> = records.genres.values().cloned().collect();
        genres.sort_by(|a, b| text_key(&a.name).cmp(&text_key(&b.name)));
        Ok(genres)
    }

    async fn find_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.records.read().await.genres.get(&id).cloned())
    }

    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let wanted = name.to_lowercase();
        let records = self.records.read().await;
        Ok(records
            .genres
            .values()
            .find(|g| g.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(count(self.records.read().await.genres.len()))
    }

    async fn insert_genre(&self, genre: &Genre) -> AppResult<()> {
        self.records
            .write()
            .await
            .genres
            .insert(genre.id, genre.clone());
        Ok(())
    }

    async fn update_genre(&self, genre: &Genre) -> AppResult<()> {
        let mut records = self.records.write().await;
        match records.genres.get_mut(&genre.id) {
            Some(stored) => {
                *stored = genre.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Genre {} not found", genre.id))),
        }
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<()> {
        self.records
            .write()
            .await
            .genres
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list_books(&self) -> AppResult<Vec<BookListing>> {
        let records = self.records.read().await;
        Ok(sorted_books(records.books.values())
            .into_iter()
            .map(|book| BookListing {
                author: records.authors.get(&book.author_id).cloned(),
                id: book.id,
                title: book.title,
            })
            .collect())
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.records.read().await.books.get(&id).cloned())
    }

    async fn find_book_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let records = self.records.read().await;
        Ok(records.books.get(&id).map(|book| BookDetail {
            author: records.authors.get(&book.author_id).cloned(),
            genres: book
                .genre_ids
                .iter()
                .filter_map(|genre_id| records.genres.get(genre_id).cloned())
                .collect(),
            book: book.clone(),
        }))
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let records = self.records.read().await;
        Ok(sorted_books(
            records.books.values().filter(|b| b.author_id == author_id),
        ))
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let records = self.records.read().await;
        Ok(sorted_books(
            records
                .books
                .values()
                .filter(|b| b.genre_ids.contains(&genre_id)),
        ))
    }

    async fn count_books(&self) -> AppResult<i64> {
        Ok(count(self.records.read().await.books.len()))
    }

    async fn insert_book(&self, book: &Book) -> AppResult<()> {
        self.records
            .write()
            .await
            .books
            .insert(book.id, book.clone());
        Ok(())
    }

    async fn update_book(&self, book: &Book) -> AppResult<()> {
        let mut records = self.records.write().await;
        match records.books.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Book {} not found", book.id))),
        }
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.records
            .write()
            .await
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }
}

impl Records {
    fn listing(&self, instance: &BookInstance) -> InstanceListing {
        InstanceListing {
            book: self.books.get(&instance.book_id).map(|book| BookRef {
                id: book.id,
                title: book.title.clone(),
            }),
            instance: instance.clone(),
        }
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn list_instances(&self) -> AppResult<Vec<InstanceListing>> {
        let records = self.records.read().await;
        let mut listings: Vec<InstanceListing> = records
            .book_instances
            .values()
            .map(|instance| records.listing(instance))
            .collect();
        listings.sort_by(|a, b| {
            let title_a = a.book.as_ref().map(|book| text_key(&book.title));
            let title_b = b.book.as_ref().map(|book| text_key(&book.title));
            (title_a, text_key(&a.instance.imprint))
                .cmp(&(title_b, text_key(&b.instance.imprint)))
        });
        Ok(listings)
    }

    async fn find_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.records.read().await.book_instances.get(&id).cloned())
    }

    async fn find_instance_detail(&self, id: Uuid) -> AppResult<Option<InstanceListing>> {
        let records = self.records.read().await;
        Ok(records
            .book_instances
            .get(&id)
            .map(|instance| records.listing(instance)))
    }

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let records = self.records.read().await;
        let mut instances: Vec<BookInstance> = records
            .book_instances
            .values()
            .filter(|i| i.book_id == book_id)
            .cloned()
            .collect();
        instances.sort_by(|a, b| text_key(&a.imprint).cmp(&text_key(&b.imprint)));
        Ok(instances)
    }

    async fn count_instances(&self, status: Option<BookStatus>) -> AppResult<i64> {
        let records = self.records.read().await;
        Ok(count(
            records
                .book_instances
                .values()
                .filter(|i| status.map_or(true, |s| i.status == s))
                .count(),
        ))
    }

    async fn insert_instance(&self, instance: &BookInstance) -> AppResult<()> {
        self.records
            .write()
            .await
            .book_instances
            .insert(instance.id, instance.clone());
        Ok(())
    }

    async fn update_instance(&self, instance: &BookInstance) -> AppResult<()> {
        let mut records = self.records.write().await;
        match records.book_instances.get_mut(&instance.id) {
            Some(stored) => {
                *stored = instance.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "Book instance {} not found",
                instance.id
            ))),
        }
    }

    async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.records
            .write()
            .await
            .book_instances
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: first.into(),
            family_name: family.into(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn book(title: &str, author_id: Uuid, genre_ids: Vec<Uuid>) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: title.into(),
            summary: "summary".into(),
            isbn: "isbn".into(),
            author_id,
            genre_ids,
        }
    }

    #[tokio::test]
    async fn authors_sort_by_family_name() {
        let store = MemoryStore::new();
        for (first, family) in [("Isaac", "Asimov"), ("Frank", "Herbert"), ("Ben", "Bova")] {
            store.insert_author(&author(first, family)).await.unwrap();
        }

        let families: Vec<_> = store
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(families, vec!["Asimov", "Bova", "Herbert"]);
        assert_eq!(store.count_authors().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn listings_ignore_case_when_sorting() {
        let store = MemoryStore::new();
        let writer = author("Ann", "writer");
        store.insert_author(&writer).await.unwrap();
        store.insert_author(&author("Bob", "Austen")).await.unwrap();
        for title in ["Banana", "apple pie", "Apple pie"] {
            store.insert_book(&book(title, writer.id, vec![])).await.unwrap();
        }
        for name in ["poetry", "Drama"] {
            let genre = Genre {
                id: Uuid::new_v4(),
                name: name.into(),
            };
            store.insert_genre(&genre).await.unwrap();
        }

        let titles: Vec<_> = store
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Apple pie", "apple pie", "Banana"]);

        let families: Vec<_> = store
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(families, vec!["Austen", "writer"]);

        let names: Vec<_> = store
            .list_genres()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Drama", "poetry"]);
    }

    #[tokio::test]
    async fn book_detail_populates_references_in_order() {
        let store = MemoryStore::new();
        let herbert = author("Frank", "Herbert");
        let scifi = Genre {
            id: Uuid::new_v4(),
            name: "Science Fiction".into(),
        };
        let classic = Genre {
            id: Uuid::new_v4(),
            name: "Classic".into(),
        };
        store.insert_author(&herbert).await.unwrap();
        store.insert_genre(&scifi).await.unwrap();
        store.insert_genre(&classic).await.unwrap();
        let dune = book("Dune", herbert.id, vec![scifi.id, classic.id]);
        store.insert_book(&dune).await.unwrap();

        let detail = store.find_book_detail(dune.id).await.unwrap().unwrap();
        assert_eq!(detail.author, Some(herbert.clone()));
        assert_eq!(detail.genres, vec![scifi.clone(), classic]);
        assert_eq!(store.books_by_author(herbert.id).await.unwrap(), vec![dune.clone()]);
        assert_eq!(store.books_by_genre(scifi.id).await.unwrap(), vec![dune]);
    }

    #[tokio::test]
    async fn instance_counts_filter_by_status() {
        let store = MemoryStore::new();
        let dune = book("Dune", Uuid::new_v4(), vec![]);
        store.insert_book(&dune).await.unwrap();
        for status in [BookStatus::Available, BookStatus::Available, BookStatus::Loaned] {
            let instance = BookInstance {
                id: Uuid::new_v4(),
                book_id: dune.id,
                imprint: "Ace".into(),
                status,
                due_back: None,
            };
            store.insert_instance(&instance).await.unwrap();
        }

        assert_eq!(store.count_instances(None).await.unwrap(), 3);
        assert_eq!(
            store.count_instances(Some(BookStatus::Available)).await.unwrap(),
            2
        );
        let listings = store.list_instances().await.unwrap();
        assert_eq!(listings[0].book.as_ref().unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn update_and_delete_missing_records_are_not_found() {
        let store = MemoryStore::new();
        let ghost = author("Nobody", "Atall");

        assert!(matches!(
            store.update_author(&ghost).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_author(ghost.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn genre_lookup_ignores_case() {
        let store = MemoryStore::new();
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Fantasy".into(),
        };
        store.insert_genre(&genre).await.unwrap();

        assert_eq!(
            store.find_genre_by_name("fANTASY").await.unwrap(),
            Some(genre)
        );
        assert_eq!(store.find_genre_by_name("Horror").await.unwrap(), None);
    }
}
