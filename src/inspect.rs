//! Stanza inspection behind the `xmpp-message` binary.

use crate::config::{Config, Mode};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Read;
use xmppcore::Message;

fn read_input(config: &Config) -> Result<String> {
    match &config.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

fn decode(input: &str, config: &Config) -> Result<Message> {
    let message = Message::from_xml_with(input, &config.decode_options())
        .context("failed to decode message stanza")?;
    debug!(
        "Decoded message id='{}' with {} unknown extension(s)",
        message.id(),
        message.unknown_extensions.len()
    );
    Ok(message)
}

/// Runs the configured mode and returns what should be printed.
pub fn run(config: &Config) -> Result<String> {
    let input = read_input(config)?;

    match config.mode {
        Mode::Decode => {
            let message = decode(&input, config)?;
            let json = if config.pretty {
                serde_json::to_string_pretty(&message)
            } else {
                serde_json::to_string(&message)
            };
            json.context("failed to serialize message record")
        }
        Mode::Encode => {
            let message: Message =
                serde_json::from_str(&input).context("input is not a message record")?;
            Ok(message.to_xml())
        }
        Mode::Roundtrip => {
            let message = decode(&input, config)?;
            let output = message.to_xml();
            // Compare against the input as the writer would print it, so
            // formatting whitespace and quote style do not count as changes.
            let canonical_input = xmppcore::xml::parse_str(&input)?.to_string();
            if canonical_input == output {
                info!("Round trip is byte-identical");
            } else {
                info!("Round trip reordered or normalised the stanza");
            }
            Ok(output)
        }
    }
}
