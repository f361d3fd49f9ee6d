pub mod breed;
pub mod caretaker;
pub mod dog;
pub mod dog_caretaker;
pub mod vaccination;
pub mod vaccine;
