pub mod settings;
pub mod colaboradores_loader;

pub use settings::Settings;
pub use colaboradores_loader::{Colaborador, Colaboradores, ColaboradoresError};
