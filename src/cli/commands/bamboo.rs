use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("bamboo-subdomain")
                .long("bamboo-subdomain")
                .help("BambooHR company subdomain, as in https://<subdomain>.bamboohr.com")
                .env("FACEWALL_BAMBOO_SUBDOMAIN"),
        )
        .arg(
            Arg::new("bamboo-api-key")
                .long("bamboo-api-key")
                .help("BambooHR API key")
                .env("FACEWALL_BAMBOO_API_KEY"),
        )
}
