pub mod admin;
pub mod auth;
pub mod breed;
pub mod caretaker;
pub mod dog;
pub mod form;
pub mod index;
pub mod shared;
pub mod vaccination;
pub mod vaccine;
