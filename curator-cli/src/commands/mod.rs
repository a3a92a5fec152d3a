pub mod new;
pub mod sync;
pub mod validate;
