//! Platform discovery.
//!
//! Resolves, once at startup, everything that depends on the host: which
//! player binary to run and with which arguments, and how to power off (or
//! log out of) the machine. The core receives the results as plain
//! [`CommandLine`] values and never looks at the platform itself.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use vlcbridge_core::CommandLine;

/// Host platform families with distinct discovery rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    /// Returns the platform this binary was built for.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Player
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the player executable: the override if given, else the platform default.
#[must_use]
pub fn resolve_player_executable(platform: Platform, override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    match platform {
        Platform::Windows => PathBuf::from(r"C:\Program Files\VideoLAN\VLC\vlc.exe"),
        Platform::MacOs => PathBuf::from("/Applications/VLC.app/Contents/MacOS/VLC"),
        Platform::Linux | Platform::Other => PathBuf::from("vlc"),
    }
}

/// Builds the player argument list enabling the HTTP control API on
/// `control_port` and, optionally, an RTSP listener on `streaming_port`.
#[must_use]
pub fn player_arguments(
    platform: Platform,
    control_port: u16,
    streaming_port: Option<u16>,
) -> Vec<String> {
    let mut args: Vec<String> = ["--ttl", "12", "--qt-start-minimized", "--fullscreen"]
        .into_iter()
        .map(String::from)
        .collect();
    args.push("--extraintf=luahttp".into());

    if let Some(port) = streaming_port {
        args.push("--rtsp-host=0.0.0.0".into());
        args.push(format!("--rtsp-port={}", port));
    }

    args.push("--http-host=localhost".into());
    args.push(format!("--http-port={}", control_port));
    args.extend(
        [
            "--sout-ffmpeg-strict=-2",
            "--avi-index=2",
            "--no-qt-error-dialogs",
            "--no-qt-privacy-ask",
        ]
        .into_iter()
        .map(String::from),
    );

    if platform == Platform::Windows {
        args.push("--no-qt-updates-notif".into());
    }
    args
}

/// Player version as reported by `--version`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlayerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for PlayerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extracts the version from `--version` output (`VLC version 3.0.18 Vetinari ...`).
#[must_use]
pub fn parse_player_version(output: &str) -> Option<PlayerVersion> {
    let (_, rest) = output.split_once("VLC version")?;
    let token = rest.split_whitespace().next()?;

    let mut parts = token.split('.').map(str::parse::<u32>);
    let major = parts.next()?.ok()?;
    let minor = parts.next().transpose().ok()?.unwrap_or(0);
    let patch = parts.next().transpose().ok()?.unwrap_or(0);

    Some(PlayerVersion {
        major,
        minor,
        patch,
    })
}

/// Runs `<executable> --version`. Any failure yields `0.0.0`.
pub async fn probe_player_version(executable: &Path) -> PlayerVersion {
    match tokio::process::Command::new(executable)
        .arg("--version")
        .output()
        .await
    {
        Ok(output) => parse_player_version(&String::from_utf8_lossy(&output.stdout))
            .unwrap_or_default(),
        Err(e) => {
            log::warn!(
                "[Platform] Could not run {} --version: {}",
                executable.display(),
                e
            );
            PlayerVersion::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host Shutdown
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the host shutdown command: the override if given, else the
/// platform (and on Linux, desktop environment) default.
///
/// # Errors
///
/// Fails for a blank override, or when no default exists for the platform.
pub fn resolve_shutdown_command(
    platform: Platform,
    override_command: Option<&str>,
) -> Result<CommandLine> {
    if let Some(line) = override_command {
        return match CommandLine::parse(line) {
            Some(cmd) => Ok(cmd),
            None => bail!("Shutdown command override is blank"),
        };
    }

    match platform {
        Platform::Windows => Ok(CommandLine::new("shutdown", ["-s", "-f", "-t", "0"])),
        Platform::MacOs => Ok(CommandLine::new(
            "osascript",
            ["-e", r#"tell app "System Events" to shut down"#],
        )),
        Platform::Linux => {
            let desktop = std::env::var("XDG_CURRENT_DESKTOP").ok();
            Ok(linux_shutdown_command(desktop.as_deref(), |program| {
                which::which(program).is_ok()
            }))
        }
        Platform::Other => bail!(
            "No default shutdown command for this platform; set shutdown_command or VLCBRIDGE_SHUTDOWN_COMMAND"
        ),
    }
}

/// Picks the logout/power-off call for a Linux desktop environment.
fn linux_shutdown_command(
    desktop: Option<&str>,
    installed: impl Fn(&str) -> bool,
) -> CommandLine {
    const KDE_LOGOUT: [&str; 6] = [
        "org.kde.ksmserver",
        "/KSMServer",
        "org.kde.KSMServerInterface.logout",
        "0",
        "2",
        "2",
    ];

    match desktop {
        Some("KDE") if installed("qdbus-qt4") => CommandLine::new("qdbus-qt4", KDE_LOGOUT),
        Some("KDE") if installed("qdbus") => CommandLine::new("qdbus", KDE_LOGOUT),
        Some("GNOME") => CommandLine::new(
            "dbus-send",
            [
                "--session",
                "--type=method_call",
                "--print-reply",
                "--dest=org.gnome.SessionManager",
                "/org/gnome/SessionManager",
                "org.gnome.SessionManager.RequestShutdown",
            ],
        ),
        // LXDE, XFCE and anything unrecognised.
        _ => CommandLine::new(
            "dbus-send",
            [
                "--system",
                "--print-reply",
                "--dest=org.freedesktop.ConsoleKit",
                "/org/freedesktop/ConsoleKit/Manager",
                "org.freedesktop.ConsoleKit.Manager.Stop",
            ],
        ),
    }
}
