/// loading of user component sets from JSON task files
pub mod load_from_file;
/// terminal logger initialization
pub mod logger;
