//! YouTube URL validation and the yt-dlp subprocess plumbing behind the
//! search, metadata, and download operations.
//!
//! The extractor is deliberately a thin wrapper: every operation maps to one
//! yt-dlp invocation whose JSON output is decoded with permissive structs, so
//! older or unusual videos with sparse metadata still parse.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tokio::process::{Child, Command};

/// Returns true when the input plausibly points at a YouTube video.
///
/// This is a bare substring match on the two known hosts, not a URL grammar
/// check. It guards the endpoints against obviously wrong input; anything
/// that passes is still subject to the extractor's own validation.
pub fn is_video_url(input: &str) -> bool {
    input.contains("youtube.com") || input.contains("youtu.be")
}

/// Single entry from a `ytsearch` dump. Everything except `id` is optional
/// because extraction results vary between videos.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: Option<String>,
    pub fulltitle: Option<String>,
    pub duration_string: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailEntry {
    pub url: Option<String>,
}

impl SearchHit {
    /// Preferred display title, falling back to the video id when the
    /// extractor returned nothing usable.
    pub fn display_title(&self) -> &str {
        self.fulltitle
            .as_deref()
            .or(self.title.as_deref())
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.id)
    }

    /// First thumbnail in the extractor's list that actually carries a URL.
    pub fn primary_thumbnail(&self) -> Option<&str> {
        self.thumbnails.iter().find_map(|thumb| thumb.url.as_deref())
    }
}

/// Subset of `yt-dlp --dump-single-json` needed to drive a download.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: Option<String>,
    pub fulltitle: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatEntry>,
}

/// One downloadable format from the info dump. `ext` doubles as the container
/// extension when resolving output filenames.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatEntry {
    pub format_id: Option<String>,
    pub ext: Option<String>,
}

impl VideoInfo {
    /// Same fallback chain as [`SearchHit::display_title`].
    pub fn display_title(&self) -> &str {
        self.fulltitle
            .as_deref()
            .or(self.title.as_deref())
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.id)
    }
}

/// Handle on the yt-dlp executable shared by every request.
///
/// The struct only remembers which program to invoke, so tests can point it
/// at a stub script instead of the real extractor.
#[derive(Debug, Clone)]
pub struct Extractor {
    program: PathBuf,
}

impl Extractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> Command {
        Command::new(&self.program)
    }

    /// Runs `yt-dlp --version` to fail loudly at startup when the extractor
    /// is missing instead of erroring on the first request.
    pub async fn ensure_available(&self) -> Result<()> {
        let program = self.program.display();
        let status = self
            .command()
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(_) => bail!("{program} is installed but returned a failure status"),
            Err(err) => bail!("{program} is not installed or not in PATH: {err}"),
        }
    }

    /// Searches YouTube for the query (usually the raw video URL) and returns
    /// the first hit.
    pub async fn search_first(&self, query: &str) -> Result<SearchHit> {
        let output = self
            .command()
            .arg("--dump-json")
            .arg("--skip-download")
            .arg("--no-warnings")
            .arg("--no-progress")
            .arg(format!("ytsearch1:{query}"))
            .output()
            .await
            .with_context(|| format!("searching for {query}"))?;

        if !output.status.success() {
            bail!("search command failed for {query} (status {})", output.status);
        }

        let raw = String::from_utf8(output.stdout).context("parsing search output as UTF-8")?;
        // yt-dlp emits one JSON document per line; a single-result search
        // still ends with a newline.
        let line = raw
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| anyhow!("search returned no results for {query}"))?;

        serde_json::from_str(line).context("deserializing search JSON")
    }

    /// Fetches the full info dump, including the format list, for a video
    /// URL.
    pub async fn fetch_video_info(&self, url: &str) -> Result<VideoInfo> {
        let output = self
            .command()
            .arg("--dump-single-json")
            .arg("--skip-download")
            .arg("--no-warnings")
            .arg("--no-progress")
            .arg(url)
            .output()
            .await
            .with_context(|| format!("fetching metadata for {url}"))?;

        if !output.status.success() {
            bail!("metadata command failed for {url} (status {})", output.status);
        }

        let raw = String::from_utf8(output.stdout).context("parsing metadata JSON as UTF-8")?;
        serde_json::from_str(&raw).context("deserializing metadata JSON")
    }

    /// Starts the media transfer for one format into `output_path`.
    ///
    /// The returned child is not awaited here; the caller decides whether to
    /// wait or detach.
    pub fn spawn_format_download(
        &self,
        url: &str,
        format_id: &str,
        output_path: &Path,
    ) -> Result<Child> {
        self.command()
            .arg("--format")
            .arg(format_id)
            .arg("--output")
            .arg(output_path.as_os_str())
            .arg("--no-warnings")
            .arg("--no-progress")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("starting download of {url}"))
    }
}
