use std::io::{self, Write};

use chroma_convert::color::ColorSpace;
use chroma_convert::css;
use chroma_convert::form::Conversion;
use chroma_convert::logging::ConsoleLogger;
use chroma_convert::terminal::{self, SwatchMode};

/// Convert one color value between hex, RGB and HSL notations.
///
/// Flags are parsed by hand; the surface is small enough not to need clap.
fn main() {
    let args: Vec<String> = std::env::args().collect();
    let cfg = match parse_args(args) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if cfg.help {
        print!("{HELP_TEXT}");
        return;
    }

    let log_level = match resolve_log_level(cfg.log_level, std::env::var("CHROMA_LOG").ok()) {
        Ok(level) => level,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };
    if log_level != LogLevel::Off {
        init_logger(log_level);
    }

    let Some(value) = cfg.value.as_deref() else {
        eprintln!("Missing color value.\n\nRun with `--help` for usage.");
        std::process::exit(2);
    };

    let space = cfg.from.unwrap_or_else(|| ColorSpace::detect(value));
    log::debug!("reading {value:?} as {space}");

    let conversion = if cfg.strict {
        match Conversion::from_text_strict(space, value) {
            Ok(conversion) => conversion,
            Err(err) => {
                eprintln!("Cannot convert `{value}` as {space}: {err}");
                std::process::exit(1);
            }
        }
    } else {
        Conversion::from_text(space, value)
    };

    if cfg.json {
        #[cfg(feature = "json")]
        println!("{}", render_json(&conversion));
        return;
    }

    print!("{}", render_report(&conversion));

    let mode = if cfg.no_swatch {
        SwatchMode::Off
    } else {
        terminal::detect_swatch_mode()
    };
    log::trace!("swatch mode: {}", mode.name());
    if mode != SwatchMode::Off
        && let Err(err) = print_swatch(&conversion, cfg.swatch_width, mode)
    {
        log::warn!("failed to draw swatch: {err}");
    }
}

fn init_logger(level: LogLevel) {
    let logger = ConsoleLogger::new()
        .level(level.to_level_filter())
        .show_path(level == LogLevel::Trace);
    if let Err(err) = logger.init() {
        eprintln!("Failed to initialize logger: {err}");
    }
}

fn print_swatch(conversion: &Conversion, width: usize, mode: SwatchMode) -> io::Result<()> {
    let mut out = io::stdout().lock();
    terminal::write_swatch(&mut out, conversion.rgb, width, mode)?;
    writeln!(out)?;
    out.flush()
}

fn render_report(conversion: &Conversion) -> String {
    format!(
        "hex   {}\nrgb   {}\nhsl   {}\nfrom  {}\n",
        conversion.hex,
        css::render_rgb(conversion.rgb),
        css::render_hsl(conversion.hsl),
        conversion.source,
    )
}

#[cfg(feature = "json")]
fn render_json(conversion: &Conversion) -> String {
    let value = serde_json::json!({
        "source": conversion.source.name(),
        "hex": conversion.hex,
        "rgb": {
            "r": conversion.rgb.r,
            "g": conversion.rgb.g,
            "b": conversion.rgb.b,
        },
        "hsl": {
            "h": conversion.hsl.h,
            "s": conversion.hsl.s,
            "l": conversion.hsl.l,
        },
        "css": {
            "rgb": css::render_rgb(conversion.rgb),
            "hsl": css::render_hsl(conversion.hsl),
            "source": conversion.css,
        },
        "valid": conversion.rgb.is_finite() && conversion.hsl.is_finite(),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "Invalid --log-level value `{value}` (expected: off|error|warn|info|debug|trace)."
            )),
        }
    }

    fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// The flag wins over `CHROMA_LOG`; an empty variable counts as unset.
fn resolve_log_level(flag: Option<LogLevel>, env: Option<String>) -> Result<LogLevel, String> {
    if let Some(level) = flag {
        return Ok(level);
    }
    match env.as_deref().map(str::trim) {
        None | Some("") => Ok(LogLevel::Off),
        Some(raw) => LogLevel::parse(raw).map_err(|_| {
            format!("Invalid CHROMA_LOG value `{raw}` (expected: off|error|warn|info|debug|trace).")
        }),
    }
}

const DEFAULT_SWATCH_WIDTH: usize = 16;

#[derive(Debug, Clone)]
struct Config {
    help: bool,
    value: Option<String>,
    from: Option<ColorSpace>,
    strict: bool,
    json: bool,
    no_swatch: bool,
    swatch_width: usize,
    log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help: false,
            value: None,
            from: None,
            strict: false,
            json: false,
            no_swatch: false,
            swatch_width: DEFAULT_SWATCH_WIDTH,
            log_level: None,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Config, String> {
    let mut iter = args.into_iter();
    // Drop binary name if present.
    let _ = iter.next();

    let mut cfg = Config::default();
    let mut positional: Vec<String> = Vec::new();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cfg.help = true,
            "--from" => {
                if cfg.from.is_some() {
                    return Err("`--from` provided more than once.".to_string());
                }
                let raw = next_value(&mut iter, "--from")?;
                let space = ColorSpace::parse(&raw).map_err(|_| {
                    format!("Invalid --from value `{raw}` (expected: hex|rgb|hsl).")
                })?;
                cfg.from = Some(space);
            }
            "--strict" => cfg.strict = true,
            "--json" => {
                if !cfg!(feature = "json") {
                    return Err(
                        "`--json` is unavailable (built without the `json` feature).".to_string(),
                    );
                }
                cfg.json = true;
            }
            "--no-swatch" => cfg.no_swatch = true,
            "--swatch-width" => {
                let raw = next_value(&mut iter, "--swatch-width")?;
                cfg.swatch_width = parse_usize_flag("--swatch-width", &raw)?;
            }
            "--log-level" => {
                let raw = next_value(&mut iter, "--log-level")?;
                cfg.log_level = Some(LogLevel::parse(&raw)?);
            }
            "--" => positional.extend(iter.by_ref()),
            flag if flag.starts_with("--") => {
                return Err(format!(
                    "Unknown flag: {arg}\n\nRun with `--help` to see valid options."
                ));
            }
            _ => positional.push(arg),
        }
    }

    // `chroma 255 136 0` reads the same as `chroma "255 136 0"`.
    if !positional.is_empty() {
        cfg.value = Some(positional.join(" "));
    }

    Ok(cfg)
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next()
        .ok_or_else(|| format!("Missing value for `{flag}`."))
}

fn parse_usize_flag(flag: &str, raw: &str) -> Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("Invalid {flag} value `{raw}` (expected a positive integer)."))?;
    if value == 0 {
        return Err(format!("Invalid {flag} value `{raw}` (expected >= 1)."));
    }
    Ok(value)
}

const HELP_TEXT: &str = r"chroma - convert colors between hex, RGB and HSL

USAGE:
    chroma [OPTIONS] <VALUE>...

VALUE:
    #ff8800, f80        hex (3, 4, 6 or 8 digits; alpha is ignored)
    rgb(255, 136, 0)    RGB, also bare `255 136 0` or `255,136,0`
    hsl(32, 100%, 50%)  HSL, also bare `32 100 50`

    Several VALUE arguments are joined with spaces.

OPTIONS:
    --from <SPACE>         Input color space: hex|rgb|hsl (default: guessed)
    --strict               Reject malformed input instead of converting it anyway
    --json                 Print the conversion as JSON (requires the `json` feature)
    --no-swatch            Never print the color swatch
    --swatch-width <N>     Swatch width in cells (default: 16)
    --log-level <LEVEL>    off|error|warn|info|debug|trace (default: off)
    -h, --help             Print this help text

ENVIRONMENT:
    CHROMA_LOG     Log level used when --log-level is not given
    NO_COLOR       Disable the swatch
    FORCE_COLOR    Draw the swatch even when stdout is not a terminal
    COLORTERM      `truecolor` or `24bit` selects a 24-bit swatch
    TERM           `dumb` disables the swatch

EXIT CODES:
    0  success
    1  --strict conversion failed
    2  usage error
";
