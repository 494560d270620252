use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use num_enum::FromPrimitive;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dsi_lib::constants::{LONG_PACKET_OVERHEAD, MAX_PACKET_SIZE, SHORT_PACKET_SIZE};
use dsi_lib::dump::hex_dump;
use dsi_lib::ecc::EccStatus;
use dsi_lib::{DataType, DcsRequest, DsiError, DsiHost, RawPacket, Transport, VirtualChannel, encode_long, encode_short};

mod error;
mod script;

use script::{parse_byte, parse_hex_line, parse_script};

/// Build, inspect and replay MIPI DSI command packets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long, global = true)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a short packet from one or two data bytes.
    Short {
        /// Virtual channel (0-3).
        #[arg(short, long, default_value_t = 0)]
        channel: u8,
        /// Data type code, e.g. 0x05 or 0x15.
        #[arg(short, long, value_parser = parse_byte, default_value = "0x05")]
        data_type: u8,
        /// Data bytes in hex.
        payload: String,
    },
    /// Encode a long packet.
    Long {
        /// Virtual channel (0-3).
        #[arg(short, long, default_value_t = 0)]
        channel: u8,
        /// Data type code, e.g. 0x39 or 0x29.
        #[arg(short, long, value_parser = parse_byte, default_value = "0x39")]
        data_type: u8,
        /// Payload bytes in hex.
        payload: String,
    },
    /// Encode a DCS command, choosing short or long write by its length.
    Dcs {
        /// Virtual channel (0-3).
        #[arg(short, long, default_value_t = 0)]
        channel: u8,
        /// Command and parameter bytes in hex.
        command: String,
    },
    /// Decode a packet and check its ECC and checksum.
    Decode {
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
        /// Packet bytes in hex.
        packet: String,
    },
    /// Run a file of DCS commands (one hex command per line) through a host
    /// that prints every packet it would transmit.
    Script {
        /// Virtual channel (0-3).
        #[arg(short, long, default_value_t = 0)]
        channel: u8,
        /// Script file.
        file: PathBuf,
    },
}

fn setup_logging(log_file: Option<&Path>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    // -v raises INFO to DEBUG, -vv to TRACE (packet hex dumps)
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = setup_logging(cli.log_file.as_deref(), &cli.verbose)?;

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        drop(guard);
        process::exit(1);
    }

    Ok(())
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Short {
            channel,
            data_type,
            payload,
        } => {
            let payload = parse_hex_line(&payload, 1)?;
            let mut buffer = [0u8; SHORT_PACKET_SIZE];
            let len = encode_short(&mut buffer, channel, DataType::from_primitive(data_type), &payload)
                .context("Failed to encode short packet")?;
            println!("{}", hex_dump(&buffer[..len]));
        }
        Command::Long {
            channel,
            data_type,
            payload,
        } => {
            let payload = parse_hex_line(&payload, 1)?;
            let mut buffer = vec![0u8; (payload.len() + LONG_PACKET_OVERHEAD).min(MAX_PACKET_SIZE)];
            let len = encode_long(&mut buffer, channel, DataType::from_primitive(data_type), &payload)
                .context("Failed to encode long packet")?;
            println!("{}", hex_dump(&buffer[..len]));
        }
        Command::Dcs { channel, command } => {
            let command = parse_hex_line(&command, 1)?;
            let request = DcsRequest::from_command(&command).context("Failed to dispatch DCS command")?;
            debug!(data_type = %request.data_type(), "Dispatched DCS command");
            let packet = request.to_bytes(channel).context("Failed to encode DCS command")?;
            println!("{}", hex_dump(&packet));
        }
        Command::Decode { json, packet } => {
            let bytes = Bytes::from(parse_hex_line(&packet, 1)?);
            let total = bytes.len();
            let packet = RawPacket::try_from(bytes).context("Failed to decode packet")?;
            if packet.wire_len() < total {
                info!(trailing = total - packet.wire_len(), "Ignoring bytes after the packet");
            }
            let summary = PacketSummary::from(&packet);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }
        Command::Script { channel, file } => {
            let text = fs::read_to_string(&file).with_context(|| format!("Failed to read script {:?}", file))?;
            let commands = parse_script(&text)?;
            let channel = VirtualChannel::new(channel)?;
            info!(commands = commands.len(), %channel, "Running script");

            let mut host = DsiHost::new(PrintTransport, channel);
            let sent = host.write_script(&commands).context("Script failed")?;
            info!(sent, "Script finished");
        }
    }
    Ok(())
}

/// Transport that writes each packet to stdout instead of a link.
struct PrintTransport;

impl Transport for PrintTransport {
    fn transmit(&mut self, channel: VirtualChannel, packet: &[u8]) -> Result<usize, DsiError> {
        println!("[{}] {} bytes", channel, packet.len());
        println!("{}", hex_dump(packet));
        Ok(packet.len())
    }
}

#[derive(Debug, Serialize)]
struct PacketSummary {
    virtual_channel: u8,
    data_type: DataType,
    data_type_code: u8,
    long: bool,
    length: usize,
    ecc_status: EccStatus,
    payload: String,
}

impl From<&RawPacket> for PacketSummary {
    fn from(packet: &RawPacket) -> Self {
        let data_type = packet.data_type();
        Self {
            virtual_channel: packet.virtual_channel().get(),
            data_type,
            data_type_code: data_type.code(),
            long: packet.is_long(),
            length: packet.wire_len(),
            ecc_status: packet.ecc_status(),
            payload: hex::encode(packet.payload()),
        }
    }
}

impl std::fmt::Display for PacketSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Channel:   {}", self.virtual_channel)?;
        writeln!(f, "Data type: {} ({:#04x})", self.data_type, self.data_type_code)?;
        writeln!(f, "Shape:     {}", if self.long { "long" } else { "short" })?;
        writeln!(f, "Length:    {} bytes", self.length)?;
        writeln!(f, "ECC:       {:?}", self.ecc_status)?;
        write!(f, "Payload:   {}", self.payload)
    }
}
