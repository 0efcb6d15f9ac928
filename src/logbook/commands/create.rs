use crate::backend::Backend;
use crate::envelope::Listing;
use crate::error::Result;

pub fn run(backend: &mut dyn Backend, text: &str, color: i64) -> Result<Listing> {
    backend.create_entry(text, color)?;
    backend.current()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, EntryStore};

    #[test]
    fn answers_with_full_listing() {
        let mut store = EntryStore::memory().unwrap();
        let listing = run(&mut store, "test", 0).unwrap();
        match listing {
            Listing::Entries(Some(entries)) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].text, "test");
            }
            other => panic!("unexpected listing {:?}", other),
        }

        let listing = run(&mut store, "again", 0).unwrap();
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn document_backend_creates_documents() {
        let mut store = DocumentStore::memory().unwrap();
        let listing = run(&mut store, "test", 3).unwrap();
        match listing {
            Listing::Documents(Some(docs)) => {
                assert_eq!(docs.len(), 1);
                assert_eq!(docs[0].content.meta.color, 3);
                assert!(docs[0].history.is_empty());
            }
            other => panic!("unexpected listing {:?}", other),
        }
    }
}
