use std::panic::Location;

/// Name sent when no call site could be resolved.
pub const UNKNOWN_CLASS: &str = "UnknownClass";

/// Best-effort description of the code that issued a logging call.
///
/// Captured through `#[track_caller]` on the public logging methods, so
/// [`Location::caller`] inside the client points at application code
/// rather than at this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub class_name: String,
    pub method_name: String,
    pub line: u32,
}

impl Caller {
    /// Explicit call site, for callers that know better than the
    /// source location.
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>, line: u32) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            line,
        }
    }

    /// Sentinel used whenever extraction fails.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_CLASS, UNKNOWN_CLASS, 0)
    }

    /// Location of whoever called into the current `#[track_caller]` chain.
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    /// Derive a symbolic name from a source location.
    ///
    /// Rust has no stable way to name the enclosing function, so the
    /// method name repeats the module-like class name.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::from_file_line(location.file(), location.line())
    }

    pub fn from_file_line(file: &str, line: u32) -> Self {
        match symbolic_name(file) {
            Some(name) if line > 0 => Self::new(name.clone(), name, line),
            _ => Self::unknown(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.line == 0 && self.class_name == UNKNOWN_CLASS
    }
}

/// Turn `src/handlers/user.rs` into `handlers::user`.
fn symbolic_name(file: &str) -> Option<String> {
    let normalized = file.replace('\\', "/");
    let relative = match normalized.rfind("/src/") {
        Some(idx) => &normalized[idx + "/src/".len()..],
        None => normalized.strip_prefix("src/").unwrap_or(&normalized),
    };
    let stem = relative.strip_suffix(".rs").unwrap_or(relative);

    let mut segments: Vec<&str> = stem
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    if segments.len() > 1 && matches!(segments.last().copied(), Some("mod" | "lib" | "main")) {
        segments.pop();
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("::"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_src_prefix_and_extension() {
        let caller = Caller::from_file_line("src/handlers/user.rs", 42);
        assert_eq!(caller.class_name, "handlers::user");
        assert_eq!(caller.method_name, "handlers::user");
        assert_eq!(caller.line, 42);
    }

    #[test]
    fn collapses_mod_files() {
        assert_eq!(Caller::from_file_line("src/handlers/mod.rs", 3).class_name, "handlers");
        assert_eq!(Caller::from_file_line("src/main.rs", 3).class_name, "main");
    }

    #[test]
    fn uses_last_src_segment_of_absolute_paths() {
        let caller =
            Caller::from_file_line("/home/me/.cargo/registry/src/index/foo-1.0.0/src/bar.rs", 7);
        assert_eq!(caller.class_name, "bar");
    }

    #[test]
    fn keeps_test_directories() {
        assert_eq!(Caller::from_file_line("tests/client.rs", 1).class_name, "tests::client");
        assert_eq!(Caller::from_file_line("tests\\client.rs", 1).class_name, "tests::client");
    }

    #[test]
    fn falls_back_to_sentinel() {
        assert!(Caller::from_file_line("", 10).is_unknown());
        assert!(Caller::from_file_line("src/", 10).is_unknown());
        assert!(Caller::from_file_line("src/app.rs", 0).is_unknown());
    }

    #[test]
    fn here_points_at_this_file() {
        let caller = Caller::here();
        assert_eq!(caller.class_name, "caller");
        assert!(caller.line > 0);
    }
}
