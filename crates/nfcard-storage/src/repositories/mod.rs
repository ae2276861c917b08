pub mod card;

pub use card::{BlobCardRepository, CardRepository, SaveOutcome};
