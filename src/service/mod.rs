//! PokemonService: CRUD over the store with write-side validation.

mod crud;
mod validation;
pub use crud::PokemonService;
pub use validation::PokemonValidator;
