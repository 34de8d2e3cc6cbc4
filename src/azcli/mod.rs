mod error;
mod run;
mod token;

pub use error::ErrorAzCli;
pub use token::get_access_token;
