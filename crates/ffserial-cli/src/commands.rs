pub mod check;
pub mod create;
pub mod inspect;
