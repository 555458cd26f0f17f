use chrono::Utc;
use clap::Parser;
use log::error;
use xmpp_message::config::{Cli, Config};
use xmpp_message::inspect;

// Usage:
//   xmpp-message decode stanza.xml            # stanza -> JSON record
//   xmpp-message --pretty decode < stanza.xml
//   xmpp-message encode record.json           # JSON record -> stanza
//   xmpp-message roundtrip stanza.xml         # stanza -> canonical stanza

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Utc::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let config = Config::from(Cli::parse());
    match inspect::run(&config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}
