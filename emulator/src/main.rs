mod script;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use crossterm::tty::IsTty;
use oven_core::config::{CountdownPacing, OvenConfig};
use session::{Reply, Session};

struct Options {
    transcript: Option<PathBuf>,
    pacing: CountdownPacing,
}

fn main() -> io::Result<()> {
    let options = parse_options().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!(
            "Usage: oven-emulator [--transcript <path>] [--pacing <compounded|once-per-second>]"
        );
        process::exit(2);
    });

    let config = OvenConfig::default().with_pacing(options.pacing);
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        process::exit(2);
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let colour = stdout.is_tty();
    let mut writer = stdout.lock();
    let mut session = Session::new(config, options.transcript.as_deref())?.with_colour(colour);
    let mut line = String::new();

    let snapshot = session.snapshot();
    writeln!(
        writer,
        "Toaster oven emulator ready ({} {}, pacing {}). Type `help` for commands or `exit` to quit.",
        snapshot.state,
        snapshot.mode,
        options.pacing.label()
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        match session.handle_command(&line)? {
            Reply::Lines(responses) => {
                for response in responses {
                    writeln!(writer, "{response}")?;
                }
            }
            Reply::Exit => {
                writeln!(writer, "Session closed.")?;
                break;
            }
        }
    }

    Ok(())
}

fn parse_options() -> Result<Options, String> {
    let mut options = Options {
        transcript: None,
        pacing: CountdownPacing::default(),
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| format!("Expected value after {flag}"))
        };
        match flag.as_str() {
            "--transcript" => options.transcript = Some(PathBuf::from(value()?)),
            "--pacing" => options.pacing = parse_pacing(&value()?)?,
            other => return Err(format!("Unknown argument `{other}`")),
        }
    }
    Ok(options)
}

fn parse_pacing(tag: &str) -> Result<CountdownPacing, String> {
    [CountdownPacing::Compounded, CountdownPacing::OncePerSecond]
        .into_iter()
        .find(|pacing| pacing.label().eq_ignore_ascii_case(tag))
        .ok_or_else(|| format!("Unknown pacing `{tag}`"))
}
