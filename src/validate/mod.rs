pub mod form;
pub mod ic;
