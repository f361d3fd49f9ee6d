pub mod admin;
pub mod auth;
pub mod breed;
pub mod caretaker;
pub mod dog;
pub mod index;
pub mod vaccination;
pub mod vaccine;
