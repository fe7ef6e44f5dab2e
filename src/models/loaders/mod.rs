pub mod toml_loader;

pub use toml_loader::{load_reference_bank, select_reference_questions};
