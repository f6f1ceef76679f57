pub mod dialog;
pub mod product;

pub use dialog::Dialog;
pub use product::Product;
