use crate::backend::Backend;
use crate::envelope::Listing;
use crate::error::Result;

pub fn run(backend: &dyn Backend, query: &str) -> Result<Listing> {
    backend.search(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::{DocumentStore, EntryStore};

    #[test]
    fn finds_one_of_three() {
        let mut store = EntryStore::memory().unwrap();
        create::run(&mut store, "foo", 0).unwrap();
        create::run(&mut store, "bar", 0).unwrap();
        create::run(&mut store, "baz", 0).unwrap();

        assert_eq!(run(&store, "foo").unwrap().len(), 1);
    }

    #[test]
    fn documents_are_searchable_too() {
        let mut store = DocumentStore::memory().unwrap();
        create::run(&mut store, "foo", 0).unwrap();
        create::run(&mut store, "bar", 0).unwrap();

        let listing = run(&store, "foo").unwrap();
        assert_eq!(listing.len(), 1);
        assert!(matches!(listing, Listing::Documents(Some(_))));
    }

    #[test]
    fn blank_query_is_empty_not_an_error() {
        let mut store = EntryStore::memory().unwrap();
        create::run(&mut store, "foo", 0).unwrap();
        assert!(run(&store, "   ").unwrap().is_empty());
        assert!(run(&store, "\"*").unwrap().is_empty());
    }
}
