pub mod code_generator;
pub mod email;
pub mod password;
pub mod token;

pub use code_generator::generate_six_digit_code;
pub use email::*;
pub use password::*;
pub use token::*;
