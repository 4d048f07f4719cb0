pub mod cbr;
pub mod util;
