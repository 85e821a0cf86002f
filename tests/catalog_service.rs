//! Catalog service tests against a hand-written in-memory store.
//!
//! The fake counts collaborator invocations so tests can assert that every
//! public lookup goes through the store's ordinal or latest query.

use comicshelf_core::{
    CatalogError, Comic, ComicCatalogService, ComicDraft, ComicImage, ComicStore, StoreError,
    StoreResult,
};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

#[derive(Default)]
struct InMemoryComicStore {
    comics: Vec<Comic>,
    ordinal_lookups: Rc<Cell<usize>>,
    latest_lookups: Rc<Cell<usize>>,
}

impl ComicStore for InMemoryComicStore {
    fn get_by_ordinal(&self, ordinal: u32) -> StoreResult<Option<Comic>> {
        self.ordinal_lookups.set(self.ordinal_lookups.get() + 1);
        Ok(self
            .comics
            .iter()
            .find(|comic| comic.ordinal == ordinal)
            .cloned())
    }

    fn get_latest(&self) -> StoreResult<Option<Comic>> {
        self.latest_lookups.set(self.latest_lookups.get() + 1);
        Ok(self
            .comics
            .iter()
            .max_by_key(|comic| comic.ordinal)
            .cloned())
    }

    fn create(&mut self, draft: &ComicDraft, image: Option<&ComicImage>) -> StoreResult<Comic> {
        let next_ordinal = self
            .comics
            .iter()
            .map(|comic| comic.ordinal)
            .max()
            .unwrap_or(0)
            + 1;
        let comic = Comic {
            key: Uuid::new_v4(),
            ordinal: next_ordinal,
            title: draft.title.clone(),
            image: image.cloned(),
            published_at: 1_700_000_000_000 + i64::from(next_ordinal),
        };
        comic.validate()?;
        self.comics.push(comic.clone());
        Ok(comic)
    }

    fn update(&mut self, comic: &Comic) -> StoreResult<Comic> {
        comic.validate()?;
        let stored = self
            .comics
            .iter_mut()
            .find(|stored| stored.ordinal == comic.ordinal)
            .ok_or(StoreError::NotFound(comic.ordinal))?;
        stored.title = comic.title.clone();
        stored.image = comic.image.clone();
        Ok(stored.clone())
    }
}

fn draft(title: &str) -> ComicDraft {
    ComicDraft {
        title: Some(title.to_string()),
    }
}

fn gif(bytes: &[u8]) -> ComicImage {
    ComicImage {
        bytes: bytes.to_vec(),
        content_type: "image/gif".to_string(),
    }
}

fn empty_service() -> ComicCatalogService<InMemoryComicStore> {
    ComicCatalogService::new(InMemoryComicStore::default())
}

#[test]
fn lookups_of_missing_ordinals_fail_not_found() {
    let mut service = empty_service();
    service.create(&draft("Ep1"), None).unwrap();

    assert!(matches!(
        service.view_by_ordinal(7),
        Err(CatalogError::ComicNotFound(7))
    ));
    assert!(matches!(
        service.image_by_ordinal(7),
        Err(CatalogError::ComicNotFound(7))
    ));
    assert!(matches!(
        service.prepare_edit(7),
        Err(CatalogError::ComicNotFound(7))
    ));
}

#[test]
fn edit_of_missing_ordinal_fails_not_found_despite_valid_payload() {
    let mut service = empty_service();

    let err = service
        .edit(9, &draft("perfectly fine title"), Some(gif(&[1])))
        .unwrap_err();
    assert!(matches!(err, CatalogError::ComicNotFound(9)));
}

#[test]
fn each_ordinal_lookup_invokes_the_store_ordinal_query_once() {
    let store = InMemoryComicStore::default();
    let ordinal_lookups = Rc::clone(&store.ordinal_lookups);
    let mut service = ComicCatalogService::new(store);
    service.create(&draft("Ep1"), None).unwrap();

    service.view_by_ordinal(1).unwrap();
    assert_eq!(ordinal_lookups.get(), 1);

    service.prepare_edit(1).unwrap();
    assert_eq!(ordinal_lookups.get(), 2);
}

#[test]
fn latest_invokes_the_store_latest_query_once_and_returns_it_unmodified() {
    let store = InMemoryComicStore::default();
    let latest_lookups = Rc::clone(&store.latest_lookups);
    let mut service = ComicCatalogService::new(store);
    service.create(&draft("Ep1"), None).unwrap();
    let newest = service.create(&draft("Ep2"), None).unwrap();

    let latest = service.latest().unwrap();

    assert_eq!(latest_lookups.get(), 1);
    assert_eq!(latest, newest);
}

#[test]
fn latest_on_empty_catalog_fails_not_found() {
    let service = empty_service();

    assert!(matches!(
        service.latest(),
        Err(CatalogError::NoComicsPublished)
    ));
}

#[test]
fn publish_and_browse_scenario() {
    let mut service = empty_service();

    let first = service.create(&draft("Ep1"), None).unwrap();
    assert_eq!(first.ordinal, 1);
    assert_eq!(first.title.as_deref(), Some("Ep1"));

    let second = service.create(&draft("Ep2"), None).unwrap();
    assert_eq!(second.ordinal, 2);

    assert_eq!(service.latest().unwrap().ordinal, 2);
    assert_eq!(service.view_by_ordinal(1).unwrap().title.as_deref(), Some("Ep1"));
    assert!(matches!(
        service.view_by_ordinal(3),
        Err(CatalogError::ComicNotFound(3))
    ));
}

#[test]
fn edit_preserves_ordinal_and_is_visible_on_subsequent_views() {
    let mut service = empty_service();
    service.create(&draft("Ep1"), None).unwrap();
    service.create(&draft("Ep2"), None).unwrap();

    let edited = service.edit(1, &draft("Ep1-revised"), None).unwrap();

    assert_eq!(edited.ordinal, 1);
    assert_eq!(edited.title.as_deref(), Some("Ep1-revised"));
    assert_eq!(
        service.view_by_ordinal(1).unwrap().title.as_deref(),
        Some("Ep1-revised")
    );
}

#[test]
fn edit_without_new_image_keeps_the_existing_one() {
    let mut service = empty_service();
    service.create(&draft("Ep1"), Some(gif(&[1, 2]))).unwrap();

    service.edit(1, &draft("Ep1-revised"), None).unwrap();

    let image = service.image_by_ordinal(1).unwrap();
    assert_eq!(image.bytes, vec![1, 2]);
    assert_eq!(image.content_type, "image/gif");
}

#[test]
fn edit_with_new_image_replaces_the_existing_one() {
    let mut service = empty_service();
    service.create(&draft("Ep1"), Some(gif(&[1, 2]))).unwrap();

    service.edit(1, &draft("Ep1"), Some(gif(&[9, 9, 9]))).unwrap();

    let image = service.image_by_ordinal(1).unwrap();
    assert_eq!(image.bytes, vec![9, 9, 9]);
}

#[test]
fn image_lookup_of_comic_without_image_fails_not_found() {
    let mut service = empty_service();
    service.create(&draft("Ep1"), None).unwrap();

    assert!(matches!(
        service.image_by_ordinal(1),
        Err(CatalogError::ComicNotFound(1))
    ));
}

#[test]
fn storage_failures_propagate_as_store_errors() {
    struct FailingStore;

    impl ComicStore for FailingStore {
        fn get_by_ordinal(&self, _ordinal: u32) -> StoreResult<Option<Comic>> {
            Err(StoreError::InvalidData("disk on fire".to_string()))
        }
        fn get_latest(&self) -> StoreResult<Option<Comic>> {
            Err(StoreError::InvalidData("disk on fire".to_string()))
        }
        fn create(&mut self, _: &ComicDraft, _: Option<&ComicImage>) -> StoreResult<Comic> {
            Err(StoreError::InvalidData("disk on fire".to_string()))
        }
        fn update(&mut self, _: &Comic) -> StoreResult<Comic> {
            Err(StoreError::InvalidData("disk on fire".to_string()))
        }
    }

    let mut service = ComicCatalogService::new(FailingStore);

    assert!(matches!(
        service.view_by_ordinal(1),
        Err(CatalogError::Store(_))
    ));
    assert!(matches!(service.latest(), Err(CatalogError::Store(_))));
    assert!(matches!(
        service.create(&draft("Ep1"), None),
        Err(CatalogError::Store(_))
    ));
}
