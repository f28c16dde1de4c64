// Terminal surface
// Line-oriented commands driving the soundboard controller

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::audio::{AudioEngine, AudioHandle};
use crate::playback::{SoundboardController, Volume};
use crate::presets::PresetRegistry;
use crate::settings::{SoundboardSettings, SETTINGS_FILE};
use crate::view::SoundboardView;

#[derive(Debug, Parser)]
#[command(name = "moodboard", version, about = "Ambient mood soundboard")]
pub struct Cli {
    /// Settings file (defaults to ./moodboard.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory relative sound files are resolved against
    #[arg(long, value_name = "DIR")]
    pub sounds_dir: Option<PathBuf>,

    /// Starting volume, 0-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List,
    /// Mood name or 1-based index
    Select(String),
    /// 0-100
    Volume(f32),
    Mute,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let head = match parts.next() {
            Some(head) => head,
            None => return Ok(None),
        };
        let rest: Vec<&str> = parts.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List,
            "mute" | "m" => ShellCommand::Mute,
            "status" | "s" => ShellCommand::Status,
            "help" | "h" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            "select" | "play" => {
                if rest.is_empty() {
                    return Err("usage: select <mood|number>".to_string());
                }
                ShellCommand::Select(rest.join(" "))
            }
            "volume" | "vol" | "v" => {
                let value = rest
                    .first()
                    .ok_or_else(|| "usage: volume <0-100>".to_string())?;
                let percent: f32 = value
                    .parse()
                    .map_err(|_| format!("not a number: {}", value))?;
                if !(0.0..=100.0).contains(&percent) {
                    return Err(format!("volume must be 0-100, got {}", percent));
                }
                ShellCommand::Volume(percent)
            }
            _ => ShellCommand::Select(line.trim().to_string()),
        };

        Ok(Some(command))
    }
}

/// Resolve a 1-based index, an exact name, or a case-insensitive name
pub fn resolve_mood(registry: &PresetRegistry, token: &str) -> Option<String> {
    if let Ok(index) = token.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| registry.get(i))
            .map(|p| p.name.clone());
    }
    if let Some(preset) = registry.find(token) {
        return Some(preset.name.clone());
    }
    registry
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(token))
        .map(|p| p.name.clone())
}

pub fn render_text(view: &SoundboardView) -> String {
    let mut out = String::new();
    for (i, preset) in view.presets.iter().enumerate() {
        let marker = if preset.active { '>' } else { ' ' };
        out.push_str(&format!("{} {}. {} ({})\n", marker, i + 1, preset.name, preset.icon));
    }

    if let Some(waveform) = &view.waveform {
        let bars: String = waveform
            .bars
            .iter()
            .map(|bar| match bar.height_px as u32 {
                0..=11 => '▂',
                12..=15 => '▄',
                16..=19 => '▆',
                _ => '█',
            })
            .collect();
        out.push_str(&format!("  {}\n", bars));
    }

    let speaker = if view.muted { "muted" } else { "on" };
    out.push_str(&format!("Volume: {}% ({})\n", view.volume_percent, speaker));

    if let Some(status) = &view.status {
        out.push_str(&format!("{}\n{}\n", status.headline, status.hint));
    }
    out
}

const HELP: &str = "\
Commands:
  list                 show the moods
  select <mood|n>      start, stop, or switch mood (a bare name or number works too)
  volume <0-100>       set the volume
  mute                 toggle mute
  status               show the board
  quit                 leave";

const SILENT_NOTICE: &str = "No audio device: moods switch but nothing is heard.";

/// Drive `controller` from `input` until EOF or `quit`
pub fn run_session<H, R, W>(
    controller: &mut SoundboardController<H>,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    H: AudioHandle,
    R: BufRead,
    W: Write,
{
    write!(output, "{}", render_text(&controller.view()))?;

    for line in input.lines() {
        let line = line?;
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "{}", message)?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(output, "{}", HELP)?,
            ShellCommand::List | ShellCommand::Status => {
                write!(output, "{}", render_text(&controller.view()))?
            }
            ShellCommand::Mute => {
                controller.toggle_mute();
                write!(output, "{}", render_text(&controller.view()))?;
            }
            ShellCommand::Volume(percent) => match controller.set_volume_percent(percent) {
                Ok(()) => write!(output, "{}", render_text(&controller.view()))?,
                Err(e) => writeln!(output, "{}", e)?,
            },
            ShellCommand::Select(token) => {
                let result = match resolve_mood(controller.registry(), &token) {
                    Some(mood) => controller.select(&mood),
                    None => controller.select(&token),
                };
                match result {
                    Ok(_) => write!(output, "{}", render_text(&controller.view()))?,
                    Err(e) => writeln!(output, "{}", e)?,
                }
            }
        }
    }

    output.flush()
}

/// Entry point for the terminal build
pub fn main() -> anyhow::Result<()> {
    crate::init_logging();
    let cli = Cli::parse();

    let config = cli.config.unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let mut settings = SoundboardSettings::load(&config)
        .with_context(|| format!("failed to load settings from {:?}", config))?;
    if let Some(dir) = cli.sounds_dir {
        settings.sounds_dir = Some(dir);
    }
    if let Some(percent) = cli.volume {
        settings.initial_volume = percent as f32 / 100.0;
    }

    let registry = settings.registry().context("invalid mood presets")?;
    let volume = Volume::new(settings.initial_volume).context("invalid initial volume")?;
    let engine = AudioEngine::start(&settings.output);
    let mut controller = SoundboardController::mount(registry, &engine, volume);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    if !engine.is_audible() {
        writeln!(stdout, "{}", SILENT_NOTICE)?;
    }
    run_session(&mut controller, stdin.lock(), stdout)?;

    controller.unmount();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(ShellCommand::parse("   "), Ok(None));
        assert_eq!(ShellCommand::parse("ls"), Ok(Some(ShellCommand::List)));
        assert_eq!(ShellCommand::parse("MUTE"), Ok(Some(ShellCommand::Mute)));
        assert_eq!(
            ShellCommand::parse("volume 30"),
            Ok(Some(ShellCommand::Volume(30.0)))
        );
        assert_eq!(
            ShellCommand::parse("select Rain"),
            Ok(Some(ShellCommand::Select("Rain".into())))
        );
        assert_eq!(
            ShellCommand::parse("ocean"),
            Ok(Some(ShellCommand::Select("ocean".into())))
        );
    }

    #[test]
    fn rejects_bad_volume() {
        assert!(ShellCommand::parse("volume").is_err());
        assert!(ShellCommand::parse("volume loud").is_err());
        assert!(ShellCommand::parse("volume 101").is_err());
    }

    #[test]
    fn resolves_index_and_case() {
        let registry = PresetRegistry::default();
        assert_eq!(resolve_mood(&registry, "3").as_deref(), Some("Rain"));
        assert_eq!(resolve_mood(&registry, "0"), None);
        assert_eq!(resolve_mood(&registry, "7"), None);
        assert_eq!(resolve_mood(&registry, "fireplace").as_deref(), Some("Fireplace"));
        assert_eq!(resolve_mood(&registry, "Lava"), None);
    }

    #[test]
    fn session_drives_the_controller() {
        let engine = AudioEngine::detached(48000, 2);
        let mut controller =
            SoundboardController::mount(PresetRegistry::default(), &engine, Volume::default());

        let input = b"rain\nvolume 30\nmute\nlava\n2\nquit\nrain\n" as &[u8];
        let mut output = Vec::new();
        run_session(&mut controller, input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Currently playing: Rain"));
        assert!(text.contains("Volume: 30% (muted)"));
        assert!(text.contains("unknown mood: lava"));
        assert_eq!(controller.state().active_mood(), Some("Ocean"));
        assert!(controller.state().is_muted());
    }
}
