use crate::backend::Backend;
use crate::envelope::Listing;
use crate::error::Result;

pub fn run(backend: &mut dyn Backend, id: i64, text: &str, color: i64) -> Result<Listing> {
    backend.update_entry(id, text, color)?;
    backend.current()
}
