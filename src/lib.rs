pub mod warn;
pub mod settings;
pub mod boxed_error;
pub mod error;
pub mod names;
pub mod value;
pub mod proptype;
pub mod proptypes;
pub mod class;
pub mod node;
pub mod component;
pub mod context;
pub mod collector;
pub mod html;
pub mod todo_example;
