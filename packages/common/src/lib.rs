pub mod choice;
pub mod dog_size;
pub mod expert_level;
pub mod gender;
pub mod paging;

pub use choice::{Choice, ParseChoiceError};
pub use dog_size::DogSize;
pub use expert_level::ExpertLevel;
pub use gender::Gender;
pub use paging::PageWindow;
