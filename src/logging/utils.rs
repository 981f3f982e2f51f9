//! Helpers for the run log: where it lives and how colour is removed.
use std::path::PathBuf;

/// Run log for `command`: `$XDG_CACHE_HOME/linkbuild/<command>.log`, or
/// under `~/.cache` when `XDG_CACHE_HOME` is unset.
///
/// Creates the directory. Returns `None` if no location is available.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| crate::config::home_dir().ok().map(|home| home.join(".cache")))?;
    let dir = cache.join("linkbuild");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(command).with_extension("log"))
}

/// Remove ANSI CSI sequences (`ESC [ … final-byte`) from `s`.
///
/// A lone `ESC` not followed by `[` is dropped.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut pieces = s.split('\x1b');
    let mut out = pieces.next().unwrap_or_default().to_string();
    for piece in pieces {
        let visible = piece.strip_prefix('[').map_or(piece, |sequence| {
            sequence
                .find(|c: char| ('@'..='~').contains(&c))
                .and_then(|end| sequence.get(end + 1..))
                .unwrap_or_default()
        });
        out.push_str(visible);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_keeps_plain_text() {
        assert_eq!(strip_ansi("✔ symlink a.js out/a.js"), "✔ symlink a.js out/a.js");
    }

    #[test]
    fn strip_ansi_removes_summary_colours() {
        assert_eq!(
            strip_ansi("2 targets: \x1b[32m1 ok\x1b[0m, \x1b[31m1 failed\x1b[0m"),
            "2 targets: 1 ok, 1 failed"
        );
    }

    #[test]
    fn strip_ansi_handles_bold_and_cursor_sequences() {
        assert_eq!(strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[2Kdone"), "==> done");
    }

    #[test]
    fn strip_ansi_drops_unterminated_sequence() {
        assert_eq!(strip_ansi("ok\x1b[31"), "ok");
        assert_eq!(strip_ansi("a\x1bb"), "ab");
    }
}
