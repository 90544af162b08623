pub mod clock;
pub mod memory;
pub mod random;
pub mod traits;

pub use clock::{Clock, FixedClock, SystemClock};
pub use memory::{
    CatalogFile, InMemoryAccommodations, InMemoryCatalog, InMemoryHistory, RecordingSink,
};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use traits::{AccommodationProvider, AssemblySink, ContentCatalog, FieldTestHistory};
