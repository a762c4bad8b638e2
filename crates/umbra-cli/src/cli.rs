//! Command-line surface over the `umbra` library.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::Style;
use umbra::{
    render_bootstrap_script, render_bootstrap_tag, should_apply_dark, ClassList, ColorMode,
    Config, DocumentRoot, FileStore, Preference, SystemSignal, ThemeResolver,
};

#[derive(Debug, Parser)]
#[command(name = "umbra", version, about = "Resolve and store the light/dark theme preference")]
pub struct Cli {
    /// Configuration file (default: <config dir>/umbra/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preference store file, overriding the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored preference, the system scheme and the resolved mode
    Show,
    /// Store a preference
    Set {
        #[arg(value_enum)]
        preference: PreferenceArg,
    },
    /// Remove the stored preference (follow the system)
    Reset,
    /// Evaluate the rule on a plain-encoded value, without reading the store or config
    Resolve {
        /// Stored value to evaluate; omit for "absent"
        #[arg(long, value_name = "VALUE")]
        stored: Option<String>,

        /// Treat the system as preferring dark
        #[arg(long)]
        system_dark: bool,
    },
    /// Print the inline bootstrap script for HTML pages
    Script {
        /// Wrap in a <script> element
        #[arg(long)]
        tag: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreferenceArg {
    Light,
    Dark,
    System,
}

impl From<PreferenceArg> for Preference {
    fn from(arg: PreferenceArg) -> Self {
        match arg {
            PreferenceArg::Light => Preference::Light,
            PreferenceArg::Dark => Preference::Dark,
            PreferenceArg::System => Preference::System,
        }
    }
}

/// Loads the configuration, applying `--store`.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(store) = &cli.store {
        config.store_path = Some(store.clone());
    }
    Ok(config)
}

/// Runs a parsed command, writing user-facing output to `out`.
pub fn run<Q: SystemSignal>(cli: &Cli, signal: Q, out: &mut dyn Write) -> Result<()> {
    // `resolve` is a pure evaluation and never reads the config file.
    let config = || load_config(cli);

    match &cli.command {
        Command::Show => show(&resolver(&config()?, signal)?, out),
        Command::Set { preference } => {
            let preference = Preference::from(*preference);
            resolver(&config()?, signal)?
                .set_preference(preference)
                .context("failed to save preference")?;
            writeln!(out, "theme preference set to {preference}")?;
            Ok(())
        }
        Command::Reset => {
            resolver(&config()?, signal)?
                .clear_preference()
                .context("failed to clear preference")?;
            writeln!(out, "theme preference cleared, following system")?;
            Ok(())
        }
        Command::Resolve {
            stored,
            system_dark,
        } => {
            let dark = should_apply_dark(stored.as_deref(), *system_dark);
            writeln!(out, "{}", ColorMode::from_dark(dark))?;
            Ok(())
        }
        Command::Script { tag } => {
            let config = config()?;
            let script = if *tag {
                render_bootstrap_tag(&config)
            } else {
                render_bootstrap_script(&config)
            }
            .context("failed to render bootstrap script")?;
            writeln!(out, "{script}")?;
            Ok(())
        }
    }
}

fn resolver<Q: SystemSignal>(config: &Config, signal: Q) -> Result<ThemeResolver<FileStore, Q>> {
    let store = config.file_store().context("no preference store location")?;
    tracing::debug!(path = %store.path().display(), "using preference store");
    Ok(ThemeResolver::new(store, signal).with_config(config))
}

fn show<Q: SystemSignal>(resolver: &ThemeResolver<FileStore, Q>, out: &mut dyn Write) -> Result<()> {
    let label = Style::new().bold();
    let stored = resolver.stored();
    let system = ColorMode::from_dark(resolver.system_prefers_dark());

    let mut root = ClassList::new();
    let mode = resolver.apply_on_load(&mut root);
    let mode_style = match mode {
        ColorMode::Dark => Style::new().magenta(),
        ColorMode::Light => Style::new().yellow(),
    };

    writeln!(out, "{} {}", label.apply_to("store:     "), resolver.store().path().display())?;
    writeln!(
        out,
        "{} {}",
        label.apply_to("stored:    "),
        stored.as_deref().unwrap_or("(unset)")
    )?;
    writeln!(out, "{} {}", label.apply_to("preference:"), resolver.preference())?;
    writeln!(out, "{} {}", label.apply_to("system:    "), system)?;
    writeln!(out, "{} {}", label.apply_to("mode:      "), mode_style.apply_to(mode))?;
    writeln!(
        out,
        "{} {}",
        label.apply_to("marker:    "),
        if root.has_marker(resolver.marker()) {
            format!("{} (applied)", resolver.marker())
        } else {
            format!("{} (not applied)", resolver.marker())
        }
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;
    use umbra::{MockSignal, PreferenceStore};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("umbra").chain(args.iter().copied())).unwrap()
    }

    fn run_to_string(args: &[&str], signal: MockSignal) -> String {
        console::set_colors_enabled(false);
        let cli = parse(args);
        let mut out = Vec::<u8>::new();
        run(&cli, signal, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Config and store paths inside `dir`, with an empty config file so the
    /// user's own configuration never leaks into a test.
    fn sandbox(dir: &TempDir) -> (String, String) {
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "").unwrap();
        (
            config.display().to_string(),
            dir.path().join("prefs.json").display().to_string(),
        )
    }

    #[test]
    fn parse_set_rejects_unknown_value() {
        assert!(Cli::try_parse_from(["umbra", "set", "sepia"]).is_err());
        assert!(matches!(
            parse(&["set", "dark"]).command,
            Command::Set {
                preference: PreferenceArg::Dark
            }
        ));
    }

    #[test]
    fn resolve_evaluates_rule() {
        let dir = TempDir::new().unwrap();
        let (config, store) = sandbox(&dir);
        let resolve = |extra: &[&str]| {
            let mut args = vec!["--config", config.as_str(), "--store", store.as_str(), "resolve"];
            args.extend_from_slice(extra);
            run_to_string(&args, MockSignal::light())
        };

        assert_eq!(resolve(&["--stored", "dark"]), "dark\n");
        assert_eq!(resolve(&["--system-dark"]), "dark\n");
        assert_eq!(resolve(&[]), "light\n");
        assert_eq!(resolve(&["--stored", "system", "--system-dark"]), "dark\n");
        assert_eq!(resolve(&["--stored", "light", "--system-dark"]), "light\n");
    }

    #[test]
    fn resolve_ignores_config() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "codec: [not, a, codec]\n").unwrap();
        let broken = broken.display().to_string();
        let missing = dir.path().join("absent.yaml").display().to_string();

        for config in [&broken, &missing] {
            let output = run_to_string(
                &["--config", config, "resolve", "--stored", "dark"],
                MockSignal::light(),
            );
            assert_eq!(output, "dark\n");
        }

        // Always the plain encoding, whatever codec a config would name.
        let json = dir.path().join("json.yaml");
        std::fs::write(&json, "codec: json\n").unwrap();
        let json = json.display().to_string();
        let output = run_to_string(
            &["--config", &json, "resolve", "--stored", "\"Dark\""],
            MockSignal::light(),
        );
        assert_eq!(output, "light\n");
    }

    #[test]
    #[serial]
    fn set_show_reset_cycle() {
        let dir = TempDir::new().unwrap();
        let (config, store) = sandbox(&dir);
        let cmd = |name: &'static str| {
            let args = ["--config", config.as_str(), "--store", store.as_str(), name];
            args.to_vec()
        };

        let mut set = cmd("set");
        set.push("dark");
        let output = run_to_string(&set, MockSignal::light());
        assert_eq!(output, "theme preference set to dark\n");
        assert_eq!(
            FileStore::new(&store).get("theme").unwrap(),
            Some("dark".to_string())
        );

        let output = run_to_string(&cmd("show"), MockSignal::light());
        assert!(output.contains("stored:     dark"));
        assert!(output.contains("system:     light"));
        assert!(output.contains("mode:       dark"));
        assert!(output.contains("dark (applied)"));

        let output = run_to_string(&cmd("reset"), MockSignal::light());
        assert!(output.contains("cleared"));

        let output = run_to_string(&cmd("show"), MockSignal::light());
        assert!(output.contains("(unset)"));
        assert!(output.contains("preference: system"));
        assert!(output.contains("mode:       light"));
        assert!(output.contains("dark (not applied)"));
    }

    #[test]
    fn config_file_drives_codec_and_script() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "codec: json\nmarker: night\n").unwrap();
        let config = config_path.display().to_string();
        let store = dir.path().join("prefs.json").display().to_string();

        run_to_string(
            &["--config", &config, "--store", &store, "set", "system"],
            MockSignal::dark(),
        );
        assert_eq!(
            FileStore::new(&store).get("theme").unwrap(),
            Some("\"System\"".to_string())
        );

        let script = run_to_string(
            &["--config", &config, "--store", &store, "script", "--tag"],
            MockSignal::dark(),
        );
        assert!(script.starts_with("<script>"));
        assert!(script.contains(r#"classList.add("night")"#));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.yaml").display().to_string();
        let cli = parse(&["--config", &missing, "show"]);
        let err = run(&cli, MockSignal::light(), &mut Vec::<u8>::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load configuration"));
    }
}
