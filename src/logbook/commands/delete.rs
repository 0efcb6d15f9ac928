use crate::backend::Backend;
use crate::envelope::Listing;
use crate::error::Result;

pub fn run(backend: &mut dyn Backend, id: i64) -> Result<Listing> {
    backend.delete_entry(id)?;
    backend.current()
}
