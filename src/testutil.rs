//! Test-only stand-ins for the yt-dlp executable.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Installs a stub yt-dlp in `dir` that answers version probes, searches,
/// info dumps, and format downloads with canned data. Returns the script
/// path so tests can hand it to an `Extractor`.
pub(crate) fn install_ytdlp_stub(dir: &Path) -> PathBuf {
    let script = r#"#!/usr/bin/env bash
set -euo pipefail
prev=""
output=""
for arg in "$@"; do
    if [[ "$prev" == "--output" ]]; then
        output="$arg"
    fi
    prev="$arg"
done
if [[ " $* " == *" --version "* ]]; then
    echo "2026.01.01"
    exit 0
fi
if [[ " $* " == *" --dump-single-json "* ]]; then
cat <<'JSON'
{
  "id": "alpha",
  "title": "Alpha Title",
  "fulltitle": "Alpha Title",
  "formats": [
    { "format_id": "137", "ext": "mp4" },
    { "format_id": "251", "ext": "webm" }
  ]
}
JSON
exit 0
fi
if [[ " $* " == *" --dump-json "* ]]; then
echo '{"id": "alpha", "title": "Alpha Title", "duration_string": "1:02:03", "thumbnails": [{"url": "https://img.example/alpha/1.jpg"}, {"url": "https://img.example/alpha/2.jpg"}]}'
exit 0
fi
if [[ " $* " == *" --format "* ]]; then
    printf 'media-bytes' > "${output}"
    exit 0
fi
exit 0
"#;
    write_script(dir, script)
}

/// Installs a stub that always fails, for exercising the collapsed error
/// responses.
pub(crate) fn install_failing_stub(dir: &Path) -> PathBuf {
    write_script(dir, "#!/usr/bin/env bash\nexit 1\n")
}

fn write_script(dir: &Path, script: &str) -> PathBuf {
    let script_path = dir.join("yt-dlp");
    fs::write(&script_path, script).expect("writing yt-dlp stub");
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&script_path)
            .expect("reading stub metadata")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script_path, perms).expect("marking stub executable");
    }
    script_path
}
