pub mod generate;
pub mod init;
pub mod run;
pub mod validate;
