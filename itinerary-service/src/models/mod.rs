pub mod itinerary;
pub mod session;
pub mod trip;

pub use itinerary::{ErrorKind, GenerationError, GenerationOutcome, Itinerary, ERROR_MARKER};
pub use session::{Flash, FlashLevel, PlannerSession, PlannerState, SESSION_KEY};
pub use trip::{Language, TripQuery};
