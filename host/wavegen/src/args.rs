use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use wavegen_common::attr::Attribute;
use wavegen_common::Channel;

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file; /etc/wavegen.toml is read if present and none is given
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Memory device to map the register block from
    #[arg(short, long)]
    pub(crate) device: Option<PathBuf>,

    /// Physical base address of the register block
    #[arg(short, long, value_parser=clap_num::maybe_hex::<u64>)]
    pub(crate) base: Option<u64>,

    /// Increase message verbosity
    #[arg(short='v', action=clap::ArgAction::Count)]
    pub(crate) verbose: u8,

    /// Silence all output
    #[arg(short, long)]
    pub(crate) quiet: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start both channels
    Run,
    /// Stop both channels
    Stop,
    /// Output a constant level
    #[command(alias = "DC")]
    Dc {
        channel: Channel,
        /// Level, in volts
        #[arg(allow_negative_numbers = true)]
        offset: f64,
    },
    /// Limit the number of periods a channel emits
    Cycles { channel: Channel, count: CycleCount },
    /// Output a sine wave
    Sine(WaveArgs),
    /// Output a sawtooth wave
    Sawtooth(WaveArgs),
    /// Output a triangle wave
    Triangle(WaveArgs),
    /// Output a square wave
    Square(WaveArgs),
    /// Print the configuration of both channels
    Status,
    /// Read or write a single attribute, in device units
    #[command(subcommand)]
    Attr(AttrCommand),
}

#[derive(clap::Args, Debug, Clone)]
pub struct WaveArgs {
    pub(crate) channel: Channel,
    /// Frequency, in hertz
    pub(crate) frequency: f64,
    /// Amplitude, in volts
    pub(crate) amplitude: f64,
    /// Offset, in volts
    #[arg(allow_negative_numbers = true)]
    pub(crate) offset: Option<f64>,
    /// Duty cycle, in percent; square waves default to 50
    #[arg(allow_negative_numbers = true)]
    pub(crate) duty_cycle: Option<f64>,
    /// Phase offset, in degrees
    #[arg(allow_negative_numbers = true)]
    pub(crate) phase_offset: Option<f64>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum AttrCommand {
    /// Print an attribute
    Show {
        channel: Channel,
        attribute: Attribute,
    },
    /// Write an attribute
    Store {
        channel: Channel,
        attribute: Attribute,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

/// Argument of `cycles`: `continuous` or a period count.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CycleCount {
    Continuous,
    Limit(u16),
}
impl CycleCount {
    /// Register value; zero runs forever.
    pub fn cycles(self) -> u16 {
        match self {
            CycleCount::Continuous => 0,
            CycleCount::Limit(n) => n,
        }
    }
}
impl FromStr for CycleCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("continuous") {
            return Ok(CycleCount::Continuous);
        }
        s.parse()
            .map(CycleCount::Limit)
            .map_err(|e| format!("expected `continuous` or a count up to {}: {e}", u16::MAX))
    }
}
impl Display for CycleCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleCount::Continuous => write!(f, "continuous"),
            CycleCount::Limit(n) => write!(f, "{n}"),
        }
    }
}
