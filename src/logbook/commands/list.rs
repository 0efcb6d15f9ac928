use crate::backend::Backend;
use crate::envelope::Listing;
use crate::error::Result;

pub fn run(backend: &dyn Backend) -> Result<Listing> {
    backend.current()
}
