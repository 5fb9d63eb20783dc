use regex::Regex;
use std::{
    io,
    process::{Command, Stdio},
};
use thiserror::Error;

const MINIMUM_FFMPEG_MAJOR_VERSION: u32 = 4;

#[derive(Debug)]
pub struct FfmpegVersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub is_compatible: bool,
}

#[derive(Debug)]
pub struct ToolCheckResult {
    pub ffmpeg_available: bool,
    pub ffmpeg_version: Option<FfmpegVersionInfo>,
    pub ytdlp_available: bool,
    pub ytdlp_version: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "ffmpeg v{found_major}.{found_minor} is too old, minimum supported is v{minimum_major}.0. Use --ignore-tool-versions to bypass."
    )]
    FfmpegTooOld {
        found_major: u32,
        found_minor: u32,
        minimum_major: u32,
    },
    #[error("Could not parse ffmpeg version from output. Use --ignore-tool-versions to bypass.")]
    VersionParseError,
    #[error("Could not run `ffmpeg -version` to check version.")]
    VersionCheckFailed,
    #[error("`{0}` command not found. Please ensure it is installed and in your PATH.")]
    CommandNotFound(String),
    #[error("`{tool}` failed: {context}")]
    CommandFailed { tool: String, context: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),
}

/// Run an external tool, silencing its output unless debug is set.
/// A non-zero exit code is an error carrying the full argument list.
pub fn run_tool(program: &str, args: &[&str], debug: bool) -> Result<(), ToolError> {
    let mut command = Command::new(program);
    command.args(args);

    if !debug {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = command.status().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ToolError::CommandNotFound(program.to_string())
        } else {
            ToolError::Io(e)
        }
    })?;
    if !status.success() {
        return Err(ToolError::CommandFailed {
            tool: program.to_string(),
            context: args.join(" "),
        });
    }
    Ok(())
}

pub fn check_ffmpeg_version(ignore_check: bool) -> Result<(), ToolError> {
    if ignore_check {
        return Ok(());
    }

    let output = Command::new("ffmpeg").arg("-version").output()?;
    if !output.status.success() {
        return Err(ToolError::VersionCheckFailed);
    }

    let version_info = String::from_utf8_lossy(&output.stdout);
    let re = Regex::new(r"ffmpeg version (\d+)\.(\d+)")?;

    if let Some(caps) = re.captures(&version_info) {
        let major: u32 = caps
            .get(1)
            .ok_or(ToolError::VersionParseError)?
            .as_str()
            .parse()?;
        let minor: u32 = caps
            .get(2)
            .ok_or(ToolError::VersionParseError)?
            .as_str()
            .parse()?;

        if major >= MINIMUM_FFMPEG_MAJOR_VERSION {
            Ok(())
        } else {
            Err(ToolError::FfmpegTooOld {
                found_major: major,
                found_minor: minor,
                minimum_major: MINIMUM_FFMPEG_MAJOR_VERSION,
            })
        }
    } else {
        Err(ToolError::VersionParseError)
    }
}

pub fn check_dependency(cmd: &str, version_arg: &str) -> Result<(), ToolError> {
    match Command::new(cmd)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                Err(ToolError::CommandNotFound(cmd.to_string()))
            } else {
                Err(ToolError::CommandFailed {
                    tool: cmd.to_string(),
                    context: e.to_string(),
                })
            }
        }
    }
}

pub fn check_tool_installation() -> ToolCheckResult {
    let mut result = ToolCheckResult {
        ffmpeg_available: false,
        ffmpeg_version: None,
        ytdlp_available: false,
        ytdlp_version: None,
        error: None,
    };

    // Check if ffmpeg is available
    match Command::new("ffmpeg").arg("-version").output() {
        Ok(output) => {
            if output.status.success() {
                result.ffmpeg_available = true;

                let version_info = String::from_utf8_lossy(&output.stdout);
                let re = Regex::new(r"ffmpeg version (\d+)\.(\d+)(?:\.(\d+))?").unwrap();

                if let Some(caps) = re.captures(&version_info) {
                    let major: u32 = caps
                        .get(1)
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(0);
                    let minor: u32 = caps
                        .get(2)
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(0);
                    let patch: u32 = caps.get(3).map_or(0, |m| m.as_str().parse().unwrap_or(0));

                    result.ffmpeg_version = Some(FfmpegVersionInfo {
                        major,
                        minor,
                        patch,
                        is_compatible: major >= MINIMUM_FFMPEG_MAJOR_VERSION,
                    });
                }
            }
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                result.error = Some("ffmpeg not found in PATH".to_string());
            } else {
                result.error = Some(format!("Failed to check ffmpeg: {}", e));
            }
        }
    }

    // Check if yt-dlp is available; its version is a plain release date
    match Command::new("yt-dlp").arg("--version").output() {
        Ok(output) => {
            if output.status.success() {
                result.ytdlp_available = true;
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !version.is_empty() {
                    result.ytdlp_version = Some(version);
                }
            }
        }
        Err(_) => {
            result.ytdlp_available = false;
        }
    }

    result
}
