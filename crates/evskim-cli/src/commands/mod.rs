pub mod inspect;
pub mod skim;
