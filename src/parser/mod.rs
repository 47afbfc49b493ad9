mod default_site;


use std::collections::BTreeMap;

/// Parsed site: relative file path -> UTF-8 file body.
///
/// A BTreeMap keeps iteration (and therefore on-disk write order and
/// test fixtures) deterministic.
pub type SiteFiles = BTreeMap<String, String>;

/// Substrings that announce a new file in a model response, checked
/// case-insensitively. Ordered longest first so a line containing
/// `filename:` is never split on the shorter `file:`.
const FILE_MARKERS: [&str; 5] = ["<!-- file:", "filename:", "// file:", "# file:", "file:"];

/// Scanner state: either between files or accumulating lines for one.
enum ScanState {
    NoFile,
    InFile { name: String, lines: Vec<String> },
}

/// Split a raw model response into named files.
///
/// The scan walks the response line by line. A marker line opens a new
/// file (committing the previous one), fenced-code delimiters are
/// dropped while a file is open, and everything else is appended
/// verbatim. Lines before the first marker are discarded. Repeated
/// markers for the same name overwrite earlier content.
///
/// When no marker is recognized anywhere, the response degrades to a
/// synthetic three-file default site instead of failing.
pub fn parse_response(response: &str) -> SiteFiles {
    let mut files = SiteFiles::new();
    let mut state = ScanState::NoFile;

    for line in response.lines() {
        if let Some(name) = extract_file_name(line) {
            commit(&mut files, &mut state);
            state = ScanState::InFile {
                name,
                lines: Vec::new(),
            };
            continue;
        }

        match &mut state {
            // Preamble and prose outside any file are dropped.
            ScanState::NoFile => {}
            ScanState::InFile { lines, .. } => {
                if is_fence_line(line) {
                    continue;
                }
                lines.push(line.to_string());
            }
        }
    }

    commit(&mut files, &mut state);

    if files.is_empty() {
        return default_site::build(response);
    }

    files
}

/// Commit the currently open file, if any, into the map.
/// Files with an empty buffer are dropped, matching the scan contract.
fn commit(files: &mut SiteFiles, state: &mut ScanState) {
    if let ScanState::InFile { name, lines } = std::mem::replace(state, ScanState::NoFile) {
        if !lines.is_empty() {
            files.insert(name, lines.join("\n"));
        }
    }
}

/// Extract the announced file name from a marker line, or None when the
/// line is ordinary content.
///
/// The name is taken from the lower-cased line, so keys are always
/// lower-case; any trailing `-->` from HTML-comment markers is stripped.
/// The name may be empty ("File:" with nothing after it); callers
/// filter such keys before they reach the filesystem.
fn extract_file_name(line: &str) -> Option<String> {
    let lower = line.to_lowercase();
    for marker in FILE_MARKERS {
        if let Some(idx) = lower.find(marker) {
            let name = lower[idx + marker.len()..]
                .trim()
                .trim_end_matches("-->")
                .trim()
                .to_string();
            return Some(name);
        }
    }
    None
}

/// A fenced-code-block delimiter line (``` after trimming), with or
/// without a language tag.
fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with("```")
}
