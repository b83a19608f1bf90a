//! Server configuration and its command-line form.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use scale_core::WireEndian;
use scale_protocol::ProtocolConfig;

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 33333;
/// Credential file used when none is given.
pub const DEFAULT_CREDENTIALS_PATH: &str = "/scale.conf";
/// Journal file used when none is given.
pub const DEFAULT_LOG_PATH: &str = "/log/scale.log";

/// Configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port to listen on. 0 picks a free port.
    pub port: u16,
    /// Credential file, one `identifier:secret` per line.
    pub credentials_path: PathBuf,
    /// Event journal file.
    pub log_path: PathBuf,
    /// Address to bind.
    pub bind_addr: IpAddr,
    /// Per-connection protocol settings.
    pub protocol: ProtocolConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            protocol: ProtocolConfig::default(),
        }
    }
}

/// Command-line arguments of the `scale-server` binary.
#[derive(Debug, Parser)]
#[command(name = "scale-server", author, version, about = "Authenticated vector sum-of-squares server", long_about = None)]
pub struct ServerArgs {
    /// Port number
    #[arg(short, long, default_value_t = DEFAULT_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// User database file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CREDENTIALS_PATH)]
    pub credentials: PathBuf,

    /// Log file
    #[arg(short = 'l', long = "log", default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Largest accepted vector, in elements
    #[arg(long, default_value_t = 1 << 24)]
    pub max_vector_len: u32,

    /// Per-read/write deadline in seconds, 0 to wait forever
    #[arg(long, default_value_t = 60)]
    pub io_timeout_secs: u64,

    /// Byte order of counts, elements and results: little, big or native
    #[arg(long, default_value_t = WireEndian::Little)]
    pub endian: WireEndian,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        let io_timeout = match args.io_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            port: args.port,
            credentials_path: args.credentials,
            log_path: args.log,
            bind_addr: args.bind,
            protocol: ProtocolConfig {
                max_vector_len: args.max_vector_len,
                io_timeout,
                endian: args.endian,
                ..ProtocolConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ServerConfig, clap::Error> {
        ServerArgs::try_parse_from(std::iter::once("scale-server").chain(args.iter().copied()))
            .map(ServerConfig::from)
    }

    #[test]
    fn test_defaults_match_cli_defaults() {
        assert_eq!(parse(&[]).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&["-p", "4000", "-c", "users.conf", "-l", "scale.log"]).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.credentials_path, PathBuf::from("users.conf"));
        assert_eq!(config.log_path, PathBuf::from("scale.log"));
    }

    #[test]
    fn test_protocol_flags() {
        let config = parse(&[
            "--max-vector-len",
            "100",
            "--io-timeout-secs",
            "0",
            "--endian",
            "big",
            "--bind",
            "127.0.0.1",
        ])
        .unwrap();
        assert_eq!(config.protocol.max_vector_len, 100);
        assert_eq!(config.protocol.io_timeout, None);
        assert_eq!(config.protocol.endian, WireEndian::Big);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_endian_choices() {
        let endian = |value: &str| parse(&["--endian", value]).unwrap().protocol.endian;
        assert_eq!(endian("native"), WireEndian::Native);
        assert_eq!(endian("LE"), WireEndian::Little);
        let err = parse(&["--endian", "middle"]).unwrap_err();
        assert!(err.to_string().contains("unknown byte order: middle"));
    }

    #[test]
    fn test_port_out_of_range() {
        assert!(parse(&["-p", "0"]).is_err());
        assert!(parse(&["-p", "65536"]).is_err());
        assert!(parse(&["-p", "abc"]).is_err());
        assert!(parse(&["-p", "65535"]).is_ok());
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"port": 5000, "log_path": "/tmp/scale.log", "protocol": {"endian": "big"}}"#,
        )
        .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_path, PathBuf::from("/tmp/scale.log"));
        assert_eq!(config.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        assert_eq!(config.protocol.endian, WireEndian::Big);
        assert_eq!(config.protocol.max_token_len, 255);
    }
}
