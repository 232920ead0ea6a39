use crate::error::{Error, ErrorKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Assembly text after `include` expansion, kept line by line so diagnostics
/// and the listing can point back into it.
#[derive(Debug)]
pub struct Source {
    path: PathBuf,
    lines: Vec<String>,
}

impl Source {
    /// Read a file and splice every `include` in place. Included files are
    /// deduplicated by canonical path, so mutual inclusion terminates.
    pub fn load(path: &str) -> Result<Source, Error> {
        let lines = read_lines(Path::new(path)).map_err(ErrorKind::bare)?;
        let mut source = Source {
            path: PathBuf::from(path),
            lines,
        };
        let mut included: Vec<PathBuf> = vec![absolute(Path::new(path))];

        let mut idx = 0;
        while idx < source.lines.len() {
            let line = strip_comment(&source.lines[idx]).trim();
            let Some(rest) = line.strip_prefix("include") else {
                idx += 1;
                continue;
            };
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                // an identifier that merely begins with "include"
                idx += 1;
                continue;
            }
            let file = rest.trim();
            if file.is_empty() {
                return Err(ErrorKind::IncludeSyntax.at(idx));
            }
            let file = file.to_string();

            let original = source.lines[idx].clone();
            source.lines[idx] = format!("; -> {}", original);
            let canonical = absolute(Path::new(&file));
            if included.contains(&canonical) {
                source
                    .lines
                    .insert(idx + 1, "; -> ignored since already included".to_string());
                idx += 2;
                continue;
            }
            included.push(canonical);

            let mut spliced = read_lines(Path::new(&file)).map_err(|e| e.at(idx))?;
            spliced.push(format!("; -> end of included file \"{}\"", file));
            let tail = source.lines.split_off(idx + 1);
            source.lines.extend(spliced);
            source.lines.extend(tail);
            idx += 1;
        }
        Ok(source)
    }

    /// Build a source from in-memory text. Used by tests.
    pub fn from_lines(name: &str, text: &str) -> Source {
        Source {
            path: PathBuf::from(name),
            lines: text.lines().map(String::from).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().map(|(i, l)| (i, l.as_str()))
    }

    /// Sibling path with the extension swapped, e.g. `foo.asm` -> `foo.lst`.
    pub fn output_name(&self, ext: &str) -> String {
        self.path.with_extension(ext).display().to_string()
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Everything from the first `;` onward is commentary.
pub fn strip_comment(line: &str) -> &str {
    match line.split_once(';') {
        Some((head, _)) => head,
        None => line,
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, ErrorKind> {
    let text = fs::read_to_string(path)
        .map_err(|e| ErrorKind::FileOpen(path.display().to_string(), e))?;
    Ok(text.lines().map(String::from).collect())
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_stripped() {
        assert_eq!(strip_comment("nop ; idle"), "nop ");
        assert_eq!(strip_comment("; whole line"), "");
        assert_eq!(strip_comment("mov a 1"), "mov a 1");
    }

    #[test]
    fn output_name_swaps_extension() {
        let s = Source::from_lines("dir/prog.asm", "");
        assert_eq!(s.output_name("bin"), "dir/prog.bin");
        assert_eq!(s.output_name("ecm"), "dir/prog.ecm");
    }
}
