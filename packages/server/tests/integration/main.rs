mod common;

mod auth;
mod breed;
mod caretaker;
mod vaccine;
