//! Terminal output for the `bookshelf-server` subcommands.
//!
//! Every line goes through [`Output`]. With `--no-color` the symbols are
//! replaced by bracketed tags so logs and CI output stay greppable.

use owo_colors::OwoColorize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Done,
    Caution,
    Failed,
    Kept,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Status::Done => "[OK]",
            Status::Caution => "[WARN]",
            Status::Failed => "[ERROR]",
            Status::Kept => "[KEPT]",
        }
    }

    fn symbol(self) -> String {
        match self {
            Status::Done => "✓".green().bold().to_string(),
            Status::Caution => "⚠".yellow().bold().to_string(),
            Status::Failed => "✗".red().bold().to_string(),
            Status::Kept => "○".yellow().to_string(),
        }
    }
}

pub struct Output {
    colored: bool,
}

impl Output {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn line(&self, status: Status, message: &str) -> String {
        if self.colored {
            format!("  {} {}", status.symbol(), message)
        } else {
            format!("  {} {}", status.tag(), message)
        }
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.line(Status::Done, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.line(Status::Caution, message));
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.line(Status::Failed, message));
    }

    /// Heading for `init`, naming the directory being scaffolded.
    pub fn init_banner(&self, target: &Path) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let target = target.display().to_string();
        if self.colored {
            println!(
                "\n  {} {} {} {}\n",
                "Bookshelf".bright_cyan().bold(),
                version.dimmed(),
                "init".bold(),
                target.bright_white()
            );
        } else {
            println!("\n  Bookshelf {} init {}\n", version, target);
        }
    }

    /// A file `init` wrote.
    pub fn wrote(&self, path: &str) {
        println!("{}", self.line(Status::Done, &format!("wrote {}", path)));
    }

    /// A file `init` left untouched.
    pub fn kept(&self, path: &str, reason: &str) {
        println!(
            "{}",
            self.line(Status::Kept, &format!("kept {} ({})", path, reason))
        );
    }

    /// Shell commands to run next, followed by an optional tip.
    pub fn next_steps(&self, commands: &[&str], tip: Option<&str>) {
        println!();
        for cmd in commands {
            if self.colored {
                println!("    {}", format!("$ {}", cmd).bright_cyan());
            } else {
                println!("    $ {}", cmd);
            }
        }
        if let Some(tip) = tip {
            if self.colored {
                println!("\n  {}", tip.dimmed().italic());
            } else {
                println!("\n  [TIP] {}", tip);
            }
        }
    }

    /// Titled two-column table with the keys padded to one width.
    pub fn table(&self, title: &str, rows: &[(&str, String)]) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }

        let width = key_width(rows);
        for (key, value) in rows {
            let key = format!("{:<width$}", key, width = width);
            if self.colored {
                println!("    {}  {}", key.dimmed(), value.bright_white());
            } else {
                println!("    {}  {}", key, value);
            }
        }
    }
}

fn key_width(rows: &[(&str, String)]) -> usize {
    rows.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_use_tags() {
        let output = Output::new(false);
        assert_eq!(output.line(Status::Done, "ready"), "  [OK] ready");
        assert_eq!(output.line(Status::Failed, "boom"), "  [ERROR] boom");
        assert_eq!(output.line(Status::Kept, "x"), "  [KEPT] x");
    }

    #[test]
    fn test_colored_lines_drop_tags() {
        let line = Output::new(true).line(Status::Caution, "careful");
        assert!(line.ends_with("careful"));
        assert!(!line.contains("[WARN]"));
    }

    #[test]
    fn test_key_width_is_longest_key() {
        let rows = [("listen", String::new()), ("book ownership", String::new())];
        assert_eq!(key_width(&rows), "book ownership".len());
        assert_eq!(key_width(&[]), 0);
    }

    #[test]
    fn test_output_methods_no_panic() {
        for output in [Output::new(false), Output::new(true)] {
            output.init_banner(Path::new("."));
            output.success("test success");
            output.warning("test warning");
            output.error("test error");
            output.wrote("bookshelf.toml");
            output.kept(".env.example", "already exists");
            output.next_steps(&["bookshelf-server"], Some("tip"));
            output.table("Configuration", &[("listen", "127.0.0.1:5000".to_string())]);
        }
    }
}
