use clap::{Arg, Command};

/// `cert` subcommand: inspect and edit the certificate cache table.
pub fn command() -> Command {
    Command::new("cert")
        .about("Manage cached TLS certificates")
        .arg(
            Arg::new("dsn")
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .env("FACEWALL_DSN")
                .required(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("get").about("Print a cached entry to stdout").arg(
                Arg::new("key")
                    .help("Cache key, normally the certificate hostname")
                    .required(true),
            ),
        )
        .subcommand(
            Command::new("put")
                .about("Store a cached entry from a file")
                .arg(
                    Arg::new("key")
                        .help("Cache key, normally the certificate hostname")
                        .required(true),
                )
                .arg(Arg::new("file").help("File to read the value from").required(true)),
        )
        .subcommand(
            Command::new("del").about("Delete a cached entry").arg(
                Arg::new("key")
                    .help("Cache key, normally the certificate hostname")
                    .required(true),
            ),
        )
}
