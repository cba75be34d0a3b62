use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_LISTEN_ADDR: &str = "localhost:4221";
pub const DEFAULT_DIRECTORY: &str = "./files";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "harbor")]
#[command(about = "Minimal HTTP/1.1 server with echo and file routes")]
struct Args {
    /// Directory served by the /files routes
    #[arg(default_value = DEFAULT_DIRECTORY)]
    directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub directory: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Builds the config from an explicit argument list (first item is the program name).
    ///
    /// The listen address comes from the `LISTEN` environment variable.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::parse_from(args);
        let listen_addr =
            std::env::var("LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

        Self {
            listen_addr,
            directory: args.directory,
        }
    }
}
